//! # spritestrip
//!
//! Batch image prep for sprite-sheet-like composites. A run takes a folder of
//! PNG/JPEG images and performs one of three passes:
//!
//! ```text
//! 1. Remove background   in/*.jpg|png  →  out/*.png   (corner color flood-filled away)
//! 2. Trim                in/*.png      →  out/*.png   (transparent edges cropped)
//! 3. Assemble            in/*.png      →  strip.png   (one overlapping horizontal strip)
//! ```
//!
//! The passes are meant to be chained by hand: remove backgrounds, trim the
//! results, then assemble the trimmed images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Input folder validation, image discovery and ordering, output naming |
//! | [`passes`] | Runs one pass end to end and reports progress events |
//! | [`imaging`] | Layout math, the backend trait, and the `image`-crate backend |
//! | [`config`] | Optional `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting for progress events |
//!
//! # Design Decisions
//!
//! ## Layout Is Pure
//!
//! The strip layout (common height, per-image widths, overlap offsets) is
//! computed by [`imaging::plan_layout`] from dimensions alone, before any
//! pixel is drawn. The draw loop only consumes the resulting
//! [`imaging::LayoutPlan`].
//!
//! ## File-Name Order Is Draw Order
//!
//! Images are sorted by file name, and the assemble pass draws them in that
//! order. Later images cover earlier ones where they overlap, so renaming a
//! file changes the picture.
//!
//! ## PNG Everywhere On Output
//!
//! Every pass writes PNG because every pass produces or keeps transparency.
//! JPEG inputs are renamed to `.png` on the way out.

pub mod config;
pub mod imaging;
pub mod output;
pub mod passes;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
