//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take
//! configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Color, ImageBackend, Raster};
use super::calculations::{CalculationError, LayoutPlan, plan_layout};
use crate::config::{AssembleConfig, BackgroundConfig};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("No images to assemble")]
    EmptyInput,
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Outcome of background removal for one image.
#[derive(Debug)]
pub enum BackgroundRemoval<I> {
    /// The corner color was flood-filled away.
    Removed { image: I, color: Color },
    /// The top-left pixel is already transparent; image returned untouched.
    Skipped(I),
}

impl<I> BackgroundRemoval<I> {
    pub fn into_image(self) -> I {
        match self {
            Self::Removed { image, .. } | Self::Skipped(image) => image,
        }
    }
}

/// Flood-fill the background color away, seeded from the top-left corner.
///
/// The image is first framed with `border` px of the corner color so the fill
/// can travel around the whole edge, then the frame is shaved off again.
pub fn remove_background<B: ImageBackend>(
    backend: &B,
    image: B::Image,
    config: &BackgroundConfig,
) -> BackgroundRemoval<B::Image> {
    let color = backend.pixel(&image, 0, 0);
    if color.is_transparent() {
        return BackgroundRemoval::Skipped(image);
    }

    let tolerance = config.fuzz / 100.0;
    let image = if config.border == 0 {
        backend.flood_fill_from_corner(image, color, tolerance)
    } else {
        let framed = backend.add_border(&image, config.border, color);
        let filled = backend.flood_fill_from_corner(framed, color, tolerance);
        backend.shave(&filled, config.border)
    };

    BackgroundRemoval::Removed { image, color }
}

/// Crop away transparent edges.
pub fn trim<B: ImageBackend>(backend: &B, image: &B::Image) -> B::Image {
    backend.trim_transparent_border(image)
}

/// Plan the strip for a set of decoded images.
pub fn plan_strip<I: Raster>(
    images: &[I],
    config: &AssembleConfig,
) -> Result<LayoutPlan, AssembleError> {
    let dimensions: Vec<(u32, u32)> = images.iter().map(Raster::dimensions).collect();
    plan_layout(&dimensions, config.min_height, config.overlap)?.ok_or(AssembleError::EmptyInput)
}

/// Stitch images left to right into one overlapping strip.
///
/// All images are scaled to a common height; each one overlaps the previous
/// by `config.overlap` of the previous image's scaled width. Images are drawn
/// in order, so later images cover earlier ones where they overlap.
pub fn assemble<B: ImageBackend>(
    backend: &B,
    images: &[B::Image],
    config: &AssembleConfig,
) -> Result<B::Image, AssembleError> {
    let plan = plan_strip(images, config)?;
    debug!(
        "strip layout: {}x{}, widths {:?}, offsets {:?}",
        plan.canvas_width, plan.canvas_height, plan.widths, plan.offsets
    );

    let mut canvas = backend.blank(plan.canvas_width, plan.canvas_height);
    for (i, image) in images.iter().enumerate() {
        let scaled = backend.resize_exact(image, plan.widths[i], plan.canvas_height);
        backend.composite(&mut canvas, &scaled, plan.draw_x(i), 0);
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, MockImage, RecordedOp};

    fn composites(ops: &[RecordedOp]) -> Vec<(String, i64)> {
        ops.iter()
            .filter_map(|op| match op {
                RecordedOp::Composite { name, x, .. } => Some((name.clone(), *x)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn assemble_empty_is_rejected() {
        let backend = MockBackend::new();
        let result = assemble(&backend, &[], &AssembleConfig::default());
        assert!(matches!(result, Err(AssembleError::EmptyInput)));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn assemble_single_image() {
        let backend = MockBackend::new();
        let canvas = assemble(
            &backend,
            &[MockImage::new("a", 100, 200)],
            &AssembleConfig::default(),
        )
        .unwrap();

        assert_eq!(canvas.dimensions(), (100, 200));
        assert_eq!(composites(&backend.get_operations()), vec![("a".into(), 0)]);
    }

    #[test]
    fn assemble_two_images_overlap_by_45_percent() {
        let backend = MockBackend::new();
        let images = [MockImage::new("a", 100, 200), MockImage::new("b", 100, 200)];
        let canvas = assemble(&backend, &images, &AssembleConfig::default()).unwrap();

        assert_eq!(canvas.dimensions(), (155, 200));
        assert_eq!(
            composites(&backend.get_operations()),
            vec![("a".into(), 0), ("b".into(), 55)]
        );
    }

    #[test]
    fn assemble_scales_to_common_height_before_drawing() {
        let backend = MockBackend::new();
        let images = [
            MockImage::new("tall", 300, 300),
            MockImage::new("short", 150, 150),
            MockImage::new("huge", 1000, 500),
        ];
        let canvas = assemble(&backend, &images, &AssembleConfig::default()).unwrap();
        assert_eq!(canvas.height(), 200);

        let resizes: Vec<RecordedOp> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Resize { .. }))
            .collect();
        assert_eq!(
            resizes,
            vec![
                RecordedOp::Resize {
                    name: "tall".into(),
                    width: 200,
                    height: 200
                },
                RecordedOp::Resize {
                    name: "short".into(),
                    width: 200,
                    height: 200
                },
                RecordedOp::Resize {
                    name: "huge".into(),
                    width: 400,
                    height: 200
                },
            ]
        );
    }

    #[test]
    fn assemble_draws_in_input_order_after_blank_canvas() {
        let backend = MockBackend::new();
        let images = [
            MockImage::new("c", 100, 200),
            MockImage::new("a", 100, 200),
            MockImage::new("b", 100, 200),
        ];
        assemble(&backend, &images, &AssembleConfig::default()).unwrap();

        let ops = backend.get_operations();
        assert!(matches!(ops[0], RecordedOp::Blank { width: 210, height: 200 }));
        let order: Vec<String> = composites(&ops).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn assemble_respects_configured_overlap_and_floor() {
        let backend = MockBackend::new();
        let config = AssembleConfig {
            overlap: 0.5,
            min_height: 100,
        };
        let images = [MockImage::new("a", 100, 100), MockImage::new("b", 100, 100)];
        let canvas = assemble(&backend, &images, &config).unwrap();
        assert_eq!(canvas.dimensions(), (150, 100));
        assert_eq!(composites(&backend.get_operations())[1], ("b".into(), 50));
    }

    #[test]
    fn remove_background_pads_fills_and_shaves() {
        let backend = MockBackend::new();
        let white = Color {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        };
        let result = remove_background(
            &backend,
            MockImage::new("a", 40, 30),
            &BackgroundConfig::default(),
        );

        let BackgroundRemoval::Removed { image, color } = result else {
            panic!("expected removal");
        };
        assert_eq!(color, white);
        assert_eq!(image.dimensions(), (40, 30));
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::AddBorder {
                    size: 5,
                    color: white
                },
                RecordedOp::FloodFill {
                    color: white,
                    tolerance: 0.5
                },
                RecordedOp::Shave(5),
            ]
        );
    }

    #[test]
    fn remove_background_without_border_fills_directly() {
        let backend = MockBackend::new();
        let config = BackgroundConfig {
            fuzz: 10.0,
            border: 0,
        };
        remove_background(&backend, MockImage::new("a", 4, 4), &config);
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], RecordedOp::FloodFill { tolerance, .. } if tolerance == 0.1));
    }

    #[test]
    fn remove_background_skips_transparent_corner() {
        let backend = MockBackend::new();
        let img = MockImage::new("a", 4, 4).with_corner(Color::TRANSPARENT);
        let result = remove_background(&backend, img.clone(), &BackgroundConfig::default());

        assert!(matches!(&result, BackgroundRemoval::Skipped(_)));
        assert_eq!(result.into_image(), img);
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn trim_delegates_to_backend() {
        let backend = MockBackend::new();
        trim(&backend, &MockImage::new("a", 4, 4));
        assert_eq!(backend.get_operations(), vec![RecordedOp::Trim("a".into())]);
    }
}
