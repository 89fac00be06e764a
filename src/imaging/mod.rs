//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate (PNG, JPEG) |
//! | **Strip layout** | pure calculations (`scale_resize`, `plan_layout`) |
//! | **Composite** | `image::imageops::overlay` |
//! | **Flood fill / trim** | [`RustBackend`] pixel loops |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and offset math (unit testable)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
pub mod rust_backend;

pub use backend::{BackendError, Color, ImageBackend, Raster};
pub use calculations::{
    CalculationError, LayoutPlan, ScaledSize, SizeSpec, plan_layout, scale_resize, target_height,
};
pub use operations::{AssembleError, BackgroundRemoval, assemble, plan_strip, remove_background, trim};
pub use rust_backend::{RustBackend, supported_input_extensions};
