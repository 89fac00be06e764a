//! Pure calculation functions for strip dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Rounding is half away from zero (`f64::round`) everywhere a fractional
//! pixel count becomes an integer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// A partial target size. Exactly one field must be set.
///
/// # Examples
/// ```
/// # use spritestrip::imaging::{SizeSpec, scale_resize};
/// let size = scale_resize(400, 300, &SizeSpec::height(150)).unwrap();
/// assert_eq!((size.width, size.height), (200, 150));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeSpec {
    pub scale: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SizeSpec {
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }
}

/// Fully resolved size: the scale factor and both output dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSize {
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

fn round_px(value: f64) -> u32 {
    value.round() as u32
}

fn checked_scale(scale: f64) -> Result<f64, CalculationError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(CalculationError::InvalidArguments(format!(
            "scale must be a positive finite number, got {scale}"
        )))
    }
}

/// Resolve a [`SizeSpec`] against a source size, preserving aspect ratio.
///
/// # Arguments
/// * `source_width`, `source_height` - Original image dimensions
/// * `spec` - Exactly one of scale, width or height
///
/// # Returns
/// * The scale factor and the resulting `(width, height)`. Fails with
///   [`CalculationError::InvalidArguments`] when zero or several fields are
///   set, or when the derived scale is not a positive finite number (which
///   covers zero source dimensions).
pub fn scale_resize(
    source_width: u32,
    source_height: u32,
    spec: &SizeSpec,
) -> Result<ScaledSize, CalculationError> {
    match (spec.scale, spec.width, spec.height) {
        (Some(scale), None, None) => {
            let scale = checked_scale(scale)?;
            Ok(ScaledSize {
                scale,
                width: round_px(source_width as f64 * scale),
                height: round_px(source_height as f64 * scale),
            })
        }
        (None, None, Some(height)) => {
            let scale = checked_scale(height as f64 / source_height as f64)?;
            Ok(ScaledSize {
                scale,
                width: round_px(source_width as f64 * scale),
                height,
            })
        }
        (None, Some(width), None) => {
            let scale = checked_scale(width as f64 / source_width as f64)?;
            Ok(ScaledSize {
                scale,
                width,
                height: round_px(source_height as f64 * scale),
            })
        }
        _ => Err(CalculationError::InvalidArguments(
            "exactly one of scale, width or height must be given".into(),
        )),
    }
}

/// Where every image of a strip goes, computed once before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Scaled width of each image, in input order.
    pub widths: Vec<u32>,
    /// Left edge of each image on the canvas. Fractional; rounded when drawn.
    pub offsets: Vec<f64>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl LayoutPlan {
    /// Integer draw position of image `index`.
    pub fn draw_x(&self, index: usize) -> i64 {
        self.offsets[index].round() as i64
    }
}

/// Common strip height: the smallest source height, floored at `min_height`.
///
/// Returns `None` for an empty slice.
pub fn target_height(dimensions: &[(u32, u32)], min_height: u32) -> Option<u32> {
    dimensions
        .iter()
        .map(|&(_, h)| h)
        .min()
        .map(|smallest| smallest.max(min_height))
}

/// Lay out images left to right, each overlapping the previous one by
/// `overlap` of the previous image's scaled width.
///
/// # Arguments
/// * `dimensions` - Source `(width, height)` of each image, in draw order
/// * `min_height` - Floor for the common height
/// * `overlap` - Fraction of the previous width to overlap (`0.45` by default)
///
/// # Returns
/// * `Ok(None)` for an empty input, otherwise the plan.
pub fn plan_layout(
    dimensions: &[(u32, u32)],
    min_height: u32,
    overlap: f64,
) -> Result<Option<LayoutPlan>, CalculationError> {
    let Some(height) = target_height(dimensions, min_height) else {
        return Ok(None);
    };

    let widths = dimensions
        .iter()
        .map(|&(w, h)| scale_resize(w, h, &SizeSpec::height(height)).map(|s| s.width.max(1)))
        .collect::<Result<Vec<u32>, _>>()?;

    let (offsets, total, _) = widths.iter().fold(
        (Vec::with_capacity(widths.len()), 0.0_f64, None::<u32>),
        |(mut offsets, total, previous), &width| match previous {
            None => {
                offsets.push(0.0);
                (offsets, width as f64, Some(width))
            }
            Some(previous) => {
                let overlap_amount = previous as f64 * overlap;
                offsets.push(total - overlap_amount);
                (offsets, total + width as f64 - overlap_amount, Some(width))
            }
        },
    );

    let canvas_width = total.round().max(1.0);
    if canvas_width > u32::MAX as f64 {
        return Err(CalculationError::InvalidArguments(format!(
            "strip width {total} does not fit a canvas"
        )));
    }

    Ok(Some(LayoutPlan {
        widths,
        offsets,
        canvas_width: canvas_width as u32,
        canvas_height: height,
    }))
}
