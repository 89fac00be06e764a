//! Shared test utilities for the spritestrip test suite.
//!
//! Writes small synthetic PNG/JPEG files so tests never depend on checked-in
//! fixtures.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_png(&tmp.path().join("a.png"), &RgbaImage::from_pixel(4, 4, opaque(255, 0, 0)));
//! write_jpeg(&tmp.path().join("b.jpg"), 200, 150);
//! ```

use image::{ImageEncoder, Rgba, RgbaImage, RgbImage};
use std::path::Path;

/// Fully opaque RGBA pixel.
pub fn opaque(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Save an RGBA image as PNG.
pub fn write_png(path: &Path, image: &RgbaImage) {
    image.save(path).unwrap();
}

/// Write a gradient JPEG of the given dimensions.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
