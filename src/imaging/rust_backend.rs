//! Pure Rust image processing backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Encode → PNG | `image::RgbaImage::save` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Composite | `image::imageops::overlay` (straight alpha over) |
//! | Border / shave | `image::imageops::replace` / `crop_imm` |
//! | Flood fill | queue-based 4-connected fill (below) |
//! | Trim | alpha bounding box + `crop_imm` |
//!
//! Every image is held as 8-bit RGBA so that transparency survives each step.

use super::backend::{BackendError, Color, ImageBackend, Raster};
use image::imageops::{self, FilterType};
use image::{ImageReader, Rgba, RgbaImage};
use std::collections::VecDeque;
use std::path::Path;

/// Extensions picked up from the input folder. Matched case-insensitively.
const INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Returns the image file extensions accepted as input.
pub fn supported_input_extensions() -> &'static [&'static str] {
    INPUT_EXTENSIONS
}

/// Backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Raster for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(Rgba([r, g, b, a]): Rgba<u8>) -> Self {
        Color { r, g, b, a }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Distance between two colors, normalized to 0.0–1.0 over all four channels.
fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> f64 {
    let sum: f64 = a
        .0
        .iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    (sum / 4.0).sqrt() / 255.0
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the content, so a PNG saved as `.jpg` still loads.
fn load_image(path: &Path) -> Result<RgbaImage, BackendError> {
    let decode_err = |source| BackendError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    Ok(reader.decode().map_err(decode_err)?.to_rgba8())
}

impl ImageBackend for RustBackend {
    type Image = RgbaImage;

    fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        load_image(path)
    }

    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError> {
        image.save(path).map_err(|source| BackendError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn blank(&self, width: u32, height: u32) -> RgbaImage {
        RgbaImage::new(width, height)
    }

    fn resize_exact(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        imageops::resize(image, width, height, FilterType::Lanczos3)
    }

    fn composite(&self, canvas: &mut RgbaImage, image: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(canvas, image, x, y);
    }

    fn pixel(&self, image: &RgbaImage, x: u32, y: u32) -> Color {
        (*image.get_pixel(x, y)).into()
    }

    fn add_border(&self, image: &RgbaImage, size: u32, color: Color) -> RgbaImage {
        let mut framed = RgbaImage::from_pixel(
            image.width() + 2 * size,
            image.height() + 2 * size,
            color.into(),
        );
        imageops::replace(&mut framed, image, size as i64, size as i64);
        framed
    }

    fn shave(&self, image: &RgbaImage, size: u32) -> RgbaImage {
        let (w, h) = image.dimensions();
        let x = size.min(w.saturating_sub(1));
        let y = size.min(h.saturating_sub(1));
        let width = w.saturating_sub(2 * size).max(1);
        let height = h.saturating_sub(2 * size).max(1);
        imageops::crop_imm(image, x, y, width, height).to_image()
    }

    fn flood_fill_from_corner(
        &self,
        mut image: RgbaImage,
        color: Color,
        tolerance: f64,
    ) -> RgbaImage {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return image;
        }
        let target: Rgba<u8> = color.into();
        let clear = Rgba([0, 0, 0, 0]);
        let mut visited = vec![false; w as usize * h as usize];
        let mut queue = VecDeque::from([(0u32, 0u32)]);
        visited[0] = true;

        while let Some((x, y)) = queue.pop_front() {
            if color_distance(*image.get_pixel(x, y), target) > tolerance {
                continue;
            }
            image.put_pixel(x, y, clear);

            let neighbors = [
                (x.checked_sub(1), Some(y)),
                ((x + 1 < w).then_some(x + 1), Some(y)),
                (Some(x), y.checked_sub(1)),
                (Some(x), (y + 1 < h).then_some(y + 1)),
            ];
            for (nx, ny) in neighbors {
                let (Some(nx), Some(ny)) = (nx, ny) else {
                    continue;
                };
                let idx = ny as usize * w as usize + nx as usize;
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        image
    }

    fn trim_transparent_border(&self, image: &RgbaImage) -> RgbaImage {
        let bounds = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] > 0)
            .fold(None, |acc: Option<(u32, u32, u32, u32)>, (x, y, _)| {
                Some(match acc {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                })
            });

        match bounds {
            Some((x0, y0, x1, y1)) => {
                imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
            }
            // Nothing visible: keep a single transparent pixel
            None => RgbaImage::new(1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{opaque, write_jpeg, write_png};

    const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// White image with a red square at `(x, y)` of side `side`.
    fn red_square_on_white(w: u32, h: u32, x: u32, y: u32, side: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |px, py| {
            if px >= x && px < x + side && py >= y && py < y + side {
                opaque(255, 0, 0)
            } else {
                opaque(255, 255, 255)
            }
        })
    }

    #[test]
    fn supported_extensions_are_png_and_jpeg() {
        assert_eq!(supported_input_extensions(), &["png", "jpg", "jpeg"]);
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn decode_nonexistent_file_names_path() {
        let err = RustBackend::new()
            .decode(Path::new("/nonexistent/image.png"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
        assert!(err.to_string().contains("/nonexistent/image.png"));
    }

    #[test]
    fn decode_garbage_names_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = RustBackend::new().decode(&path).unwrap_err();
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn encode_png_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 40]));

        let backend = RustBackend::new();
        backend.encode(&img, &path).unwrap();

        let back = backend.decode(&path).unwrap();
        assert_eq!(back.dimensions(), (4, 3));
        assert_eq!(*back.get_pixel(2, 1), Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn encode_into_missing_directory_errors() {
        let img = RgbaImage::new(2, 2);
        let result = RustBackend::new().encode(&img, Path::new("/nonexistent/dir/out.png"));
        assert!(matches!(result, Err(BackendError::Encode { .. })));
    }

    #[test]
    fn decode_png_written_by_helper() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_png(&path, &RgbaImage::from_pixel(7, 9, opaque(1, 2, 3)));
        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(*img.get_pixel(6, 8), opaque(1, 2, 3));
    }

    #[test]
    fn blank_is_fully_transparent() {
        let canvas = RustBackend::new().blank(5, 4);
        assert_eq!(canvas.dimensions(), (5, 4));
        assert!(canvas.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn resize_exact_ignores_aspect() {
        let img = RgbaImage::from_pixel(100, 50, opaque(0, 0, 255));
        let resized = RustBackend::new().resize_exact(&img, 30, 90);
        assert_eq!(resized.dimensions(), (30, 90));
    }

    #[test]
    fn composite_later_image_occludes_earlier() {
        let backend = RustBackend::new();
        let mut canvas = backend.blank(10, 2);
        let red = RgbaImage::from_pixel(6, 2, opaque(255, 0, 0));
        let blue = RgbaImage::from_pixel(6, 2, opaque(0, 0, 255));

        backend.composite(&mut canvas, &red, 0, 0);
        backend.composite(&mut canvas, &blue, 4, 0);

        assert_eq!(*canvas.get_pixel(3, 0), opaque(255, 0, 0));
        assert_eq!(*canvas.get_pixel(4, 0), opaque(0, 0, 255));
        assert_eq!(*canvas.get_pixel(5, 1), opaque(0, 0, 255));
    }

    #[test]
    fn composite_transparent_pixels_show_what_is_below() {
        let backend = RustBackend::new();
        let mut canvas = RgbaImage::from_pixel(4, 1, opaque(255, 0, 0));
        let clear = RgbaImage::new(4, 1);
        backend.composite(&mut canvas, &clear, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), opaque(255, 0, 0));
    }

    #[test]
    fn composite_clips_outside_canvas() {
        let backend = RustBackend::new();
        let mut canvas = backend.blank(4, 4);
        let img = RgbaImage::from_pixel(4, 4, opaque(0, 255, 0));
        backend.composite(&mut canvas, &img, 2, 0);
        assert_eq!(canvas.get_pixel(1, 0)[3], 0);
        assert_eq!(*canvas.get_pixel(3, 3), opaque(0, 255, 0));
    }

    #[test]
    fn border_then_shave_restores_original() {
        let backend = RustBackend::new();
        let img = red_square_on_white(8, 6, 2, 2, 2);
        let framed = backend.add_border(&img, 5, WHITE);
        assert_eq!(framed.dimensions(), (18, 16));
        assert_eq!(*framed.get_pixel(0, 0), opaque(255, 255, 255));

        let shaved = backend.shave(&framed, 5);
        assert_eq!(shaved, img);
    }

    #[test]
    fn shave_larger_than_image_keeps_one_pixel() {
        let img = RgbaImage::new(4, 4);
        let shaved = RustBackend::new().shave(&img, 10);
        assert_eq!(shaved.dimensions(), (1, 1));
    }

    #[test]
    fn flood_fill_clears_connected_background() {
        let backend = RustBackend::new();
        let img = red_square_on_white(10, 10, 3, 3, 4);
        let filled = backend.flood_fill_from_corner(img, WHITE, 0.5);

        assert_eq!(filled.get_pixel(0, 0)[3], 0);
        assert_eq!(filled.get_pixel(9, 9)[3], 0);
        assert_eq!(*filled.get_pixel(4, 4), opaque(255, 0, 0));
    }

    #[test]
    fn flood_fill_keeps_enclosed_background() {
        // A red ring around a white center: the center is not reachable.
        let img = RgbaImage::from_fn(9, 9, |x, y| {
            let ring = (2..=6).contains(&x)
                && (2..=6).contains(&y)
                && (x == 2 || x == 6 || y == 2 || y == 6);
            if ring {
                opaque(255, 0, 0)
            } else {
                opaque(255, 255, 255)
            }
        });
        let filled = RustBackend::new().flood_fill_from_corner(img, WHITE, 0.1);
        assert_eq!(filled.get_pixel(0, 0)[3], 0);
        assert_eq!(*filled.get_pixel(4, 4), opaque(255, 255, 255));
    }

    #[test]
    fn flood_fill_tolerance_controls_reach() {
        let img = RgbaImage::from_fn(4, 1, |x, _| {
            if x < 2 {
                opaque(255, 255, 255)
            } else {
                opaque(235, 235, 235)
            }
        });
        let backend = RustBackend::new();

        let strict = backend.flood_fill_from_corner(img.clone(), WHITE, 0.01);
        assert_eq!(strict.get_pixel(1, 0)[3], 0);
        assert_eq!(strict.get_pixel(2, 0)[3], 255);

        let loose = backend.flood_fill_from_corner(img, WHITE, 0.2);
        assert_eq!(loose.get_pixel(3, 0)[3], 0);
    }

    #[test]
    fn trim_crops_to_visible_pixels() {
        let mut img = RgbaImage::new(10, 8);
        img.put_pixel(2, 3, opaque(1, 1, 1));
        img.put_pixel(6, 5, Rgba([1, 1, 1, 10]));

        let trimmed = RustBackend::new().trim_transparent_border(&img);
        assert_eq!(trimmed.dimensions(), (5, 3));
        assert_eq!(*trimmed.get_pixel(0, 0), opaque(1, 1, 1));
    }

    #[test]
    fn trim_fully_transparent_yields_single_pixel() {
        let trimmed = RustBackend::new().trim_transparent_border(&RgbaImage::new(10, 10));
        assert_eq!(trimmed.dimensions(), (1, 1));
    }

    #[test]
    fn trim_opaque_image_is_unchanged() {
        let img = RgbaImage::from_pixel(3, 3, opaque(9, 9, 9));
        assert_eq!(RustBackend::new().trim_transparent_border(&img), img);
    }

    #[test]
    fn color_distance_bounds() {
        assert_eq!(color_distance(opaque(0, 0, 0), opaque(0, 0, 0)), 0.0);
        assert!((color_distance(Rgba([0, 0, 0, 0]), Rgba([255, 255, 255, 255])) - 1.0).abs() < 1e-12);
    }
}
