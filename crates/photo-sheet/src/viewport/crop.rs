//! Crop region derivation
//!
//! Both frame strategies share one algorithm: the frame rectangle is mapped
//! back through the pan/zoom transform into unscaled container space,
//! intersected with the visible image content, and finally expressed as a
//! fraction of the natural image.

use crate::constants::NORMALIZED_EPSILON;
use crate::types::ValidationError;

use super::frame::FrameSpec;
use super::geometry::{Point, Rect, Size};
use super::ViewportState;

/// A crop rectangle normalized to the natural image dimensions
///
/// `x`, `y`, `width` and `height` lie in `[0, 1]` so the collaborator can map
/// them onto source pixels regardless of the container that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub natural_width: u32,
    pub natural_height: u32,
    pub zoom: f64,
}

impl CropRegion {
    /// Check the rectangle is non-degenerate and lies inside the image.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidCrop("non-finite coordinate".into()));
        }
        if self.natural_width == 0 || self.natural_height == 0 {
            return Err(ValidationError::ImageNotLoaded);
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ValidationError::InvalidCrop("empty crop area".into()));
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(ValidationError::InvalidCrop("crop starts outside the image".into()));
        }
        if self.x + self.width > 1.0 + NORMALIZED_EPSILON
            || self.y + self.height > 1.0 + NORMALIZED_EPSILON
        {
            return Err(ValidationError::InvalidCrop("crop extends past the image".into()));
        }
        Ok(())
    }

    /// Crop rectangle in natural image pixels (x, y, width, height)
    pub fn pixel_rect(&self) -> (f64, f64, f64, f64) {
        let w = self.natural_width as f64;
        let h = self.natural_height as f64;
        (self.x * w, self.y * h, self.width * w, self.height * h)
    }

    /// Width / height of the crop measured in source pixels
    pub fn pixel_aspect_ratio(&self) -> f64 {
        let (_, _, w, h) = self.pixel_rect();
        w / h
    }
}

/// Derive the crop region for a viewport over an image of `natural` size.
pub fn compute_crop_region(
    frame: &FrameSpec,
    state: &ViewportState,
    natural: Size,
) -> Result<CropRegion, ValidationError> {
    if !natural.is_valid() {
        return Err(ValidationError::ImageNotLoaded);
    }
    if !state.container.is_valid() || state.zoom <= 0.0 {
        return Err(ValidationError::InvalidCrop("viewport has no area".into()));
    }

    let container = state.container;
    let origin = frame.transform_origin(container);
    let to_content = |p: Point| origin + (p - origin - state.pan) * (1.0 / state.zoom);

    let frame_rect = frame.frame_rect(container);
    let min = to_content(frame_rect.min());
    let max = to_content(frame_rect.max());
    let frame_in_content = Rect::new(min.x, min.y, max.x - min.x, max.y - min.y);

    let content = frame
        .content_rect(container, natural)
        .ok_or_else(|| ValidationError::InvalidCrop("image is not visible".into()))?;
    let visible = frame_in_content
        .intersect(&content)
        .ok_or_else(|| ValidationError::InvalidCrop("frame does not cover the image".into()))?;

    let image = frame.base_image_rect(container, natural);
    let x = clamp_unit((visible.x - image.x) / image.width);
    let y = clamp_unit((visible.y - image.y) / image.height);
    let width = (visible.width / image.width).min(1.0 - x);
    let height = (visible.height / image.height).min(1.0 - y);

    let region = CropRegion {
        x,
        y,
        width,
        height,
        natural_width: natural.width.round() as u32,
        natural_height: natural.height.round() as u32,
        zoom: state.zoom,
    };
    region.validate()?;
    Ok(region)
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
