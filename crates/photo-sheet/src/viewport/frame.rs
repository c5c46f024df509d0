//! Crop frame definitions
//!
//! A frame fixes the aspect ratio of the crop and decides how the source
//! image sits inside the container before any pan or zoom is applied.

use crate::constants::*;
use crate::layout::Product;

use super::geometry::{Point, Rect, Size};

/// How the crop frame relates to the draggable image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CropStrategy {
    /// The frame is the whole container. The image covers the container,
    /// scales from the top-left corner, and panning is clamped so no empty
    /// space is revealed.
    CoverFill,
    /// A smaller aspect-locked frame is centered in a larger canvas. The
    /// image is fitted inside the canvas, scales from the canvas center,
    /// and may be panned freely.
    FixedFrame,
}

/// Aspect ratio, zoom range and strategy of one crop frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameSpec {
    /// Width / height of the crop
    pub aspect_ratio: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub strategy: CropStrategy,
}

impl FrameSpec {
    /// Identity photo frame (3.5 × 4.5)
    pub fn passport() -> Self {
        Self {
            aspect_ratio: PASSPORT_ASPECT_RATIO,
            zoom_min: PASSPORT_ZOOM_MIN,
            zoom_max: PASSPORT_ZOOM_MAX,
            strategy: CropStrategy::FixedFrame,
        }
    }

    /// Caption print frame (2.3 × 2.5)
    pub fn polaroid() -> Self {
        Self {
            aspect_ratio: POLAROID_ASPECT_RATIO,
            zoom_min: POLAROID_ZOOM_MIN,
            zoom_max: POLAROID_ZOOM_MAX,
            strategy: CropStrategy::CoverFill,
        }
    }

    pub fn for_product(product: Product) -> Self {
        match product {
            Product::Passport => Self::passport(),
            Product::Polaroid => Self::polaroid(),
        }
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    /// The container the frame is displayed in.
    ///
    /// A cover-fill frame is the container, so its container is shrunk to the
    /// frame aspect ratio. A fixed frame leaves the canvas as given.
    pub fn fit_container(&self, available: Size) -> Size {
        match self.strategy {
            CropStrategy::CoverFill => fit_aspect(available, self.aspect_ratio),
            CropStrategy::FixedFrame => available,
        }
    }

    /// Frame rectangle in container coordinates.
    pub fn frame_rect(&self, container: Size) -> Rect {
        match self.strategy {
            CropStrategy::CoverFill => Rect::from_size(container),
            CropStrategy::FixedFrame => {
                let mut width = (container.width * FIXED_FRAME_FRACTION).min(FIXED_FRAME_MAX_WIDTH);
                let mut height = width / self.aspect_ratio;
                let max_height = container.height * FIXED_FRAME_FRACTION;
                if height > max_height {
                    height = max_height;
                    width = height * self.aspect_ratio;
                }
                Rect::centered(container.center(), Size::new(width, height))
            }
        }
    }

    /// Point that stays fixed while the image is scaled.
    pub fn transform_origin(&self, container: Size) -> Point {
        match self.strategy {
            CropStrategy::CoverFill => Point::ZERO,
            CropStrategy::FixedFrame => container.center(),
        }
    }

    /// Scale from natural image pixels to container pixels at zoom 1.
    pub fn base_scale(&self, container: Size, natural: Size) -> f64 {
        let sx = container.width / natural.width;
        let sy = container.height / natural.height;
        match self.strategy {
            CropStrategy::CoverFill => sx.max(sy),
            CropStrategy::FixedFrame => sx.min(sy),
        }
    }

    /// Where the whole image lies in container coordinates at zoom 1.
    ///
    /// For cover-fill the image overflows the container on one axis.
    pub fn base_image_rect(&self, container: Size, natural: Size) -> Rect {
        let scale = self.base_scale(container, natural);
        Rect::centered(
            container.center(),
            Size::new(natural.width * scale, natural.height * scale),
        )
    }

    /// The part of the image that can ever appear at zoom 1.
    ///
    /// Cover-fill images are clipped to the container box.
    pub fn content_rect(&self, container: Size, natural: Size) -> Option<Rect> {
        self.base_image_rect(container, natural)
            .intersect(&Rect::from_size(container))
    }
}

/// Largest size with the given aspect ratio that fits in `available`.
fn fit_aspect(available: Size, aspect_ratio: f64) -> Size {
    if available.aspect_ratio() > aspect_ratio {
        Size::new(available.height * aspect_ratio, available.height)
    } else {
        Size::new(available.width, available.width / aspect_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_frame_keeps_aspect() {
        let frame = FrameSpec::passport();
        for container in [Size::new(600.0, 500.0), Size::new(300.0, 800.0), Size::new(1000.0, 200.0)] {
            let rect = frame.frame_rect(container);
            assert!((rect.width / rect.height - PASSPORT_ASPECT_RATIO).abs() < 1e-9);
            assert!(rect.x >= 0.0 && rect.right() <= container.width);
            assert!(rect.y >= 0.0 && rect.bottom() <= container.height);
        }
    }

    #[test]
    fn test_cover_fill_container_matches_frame() {
        let frame = FrameSpec::polaroid();
        let container = frame.fit_container(Size::new(460.0, 600.0));
        assert!((container.aspect_ratio() - POLAROID_ASPECT_RATIO).abs() < 1e-9);
        assert_eq!(container.width, 460.0);
    }

    #[test]
    fn test_cover_fill_image_covers_container() {
        let frame = FrameSpec::polaroid();
        let container = Size::new(460.0, 500.0);
        let image = frame.base_image_rect(container, Size::new(1200.0, 1600.0));
        assert!(image.x <= 0.0 && image.right() >= container.width);
        assert!(image.y <= 0.0 && image.bottom() >= container.height);
    }
}
