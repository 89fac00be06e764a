//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the narrow capability set every pass needs:
//! decode, encode, blank canvas, exact resize, alpha composite, corner pixel
//! lookup, border padding, flood fill and transparent trim. Layout math never
//! touches pixels; it only sees [`Raster`] dimensions.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Anything with pixel dimensions.
pub trait Raster {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Trait for image processing backends.
///
/// Every pass goes through this trait, so the pass logic can be exercised
/// with a recording mock and no real pixels.
pub trait ImageBackend: Sync {
    type Image: Raster + Send;

    /// Read and decode an image file.
    fn decode(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Encode an image with its alpha channel. The format follows the extension.
    fn encode(&self, image: &Self::Image, path: &Path) -> Result<(), BackendError>;

    /// Fully transparent image of the given size.
    fn blank(&self, width: u32, height: u32) -> Self::Image;

    /// Resample to exactly `width` x `height`, ignoring aspect ratio.
    fn resize_exact(&self, image: &Self::Image, width: u32, height: u32) -> Self::Image;

    /// Alpha-composite `image` over `canvas` with its top-left corner at `(x, y)`.
    /// Parts falling outside the canvas are clipped.
    fn composite(&self, canvas: &mut Self::Image, image: &Self::Image, x: i64, y: i64);

    /// Color at `(x, y)`.
    fn pixel(&self, image: &Self::Image, x: u32, y: u32) -> Color;

    /// Surround the image with a `size` px frame of `color`.
    fn add_border(&self, image: &Self::Image, size: u32, color: Color) -> Self::Image;

    /// Remove `size` px from every edge.
    fn shave(&self, image: &Self::Image, size: u32) -> Self::Image;

    /// Make every pixel 4-connected to `(0, 0)` whose color is within
    /// `tolerance` (0.0–1.0) of `color` fully transparent.
    fn flood_fill_from_corner(&self, image: Self::Image, color: Color, tolerance: f64)
    -> Self::Image;

    /// Crop to the bounding box of the non-transparent pixels.
    fn trim_transparent_border(&self, image: &Self::Image) -> Self::Image;
}
