use crate::constants::ZOOM_STEP;
use crate::types::ValidationError;

use super::crop::{CropRegion, compute_crop_region};
use super::frame::{CropStrategy, FrameSpec};
use super::geometry::{Point, Size};

/// Pan and zoom of the image inside its container
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub zoom: f64,
    /// Translation applied to the image, in container pixels
    pub pan: Point,
    pub container: Size,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    anchor: Point,
    pan_at_start: Point,
}

/// Turns pointer input into a stable crop region.
///
/// The engine holds no rendering state: the display layer feeds it pointer
/// positions in container pixels and reads [`ViewportState`] back to draw.
#[derive(Debug, Clone)]
pub struct ViewportEngine {
    frame: FrameSpec,
    state: ViewportState,
    natural: Option<Size>,
    drag: Option<DragState>,
    zoom_step: f64,
}

impl ViewportEngine {
    pub fn new(frame: FrameSpec, container: Size) -> Self {
        Self {
            frame,
            state: ViewportState {
                zoom: frame.clamp_zoom(1.0),
                pan: Point::ZERO,
                container: frame.fit_container(container),
            },
            natural: None,
            drag: None,
            zoom_step: ZOOM_STEP,
        }
    }

    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    pub fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Signal that the image finished loading and report its natural size.
    pub fn set_natural_size(&mut self, width: u32, height: u32) {
        self.natural = (width > 0 && height > 0).then(|| Size::new(width as f64, height as f64));
    }

    pub fn is_loaded(&self) -> bool {
        self.natural.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Set the zoom, keeping the point under the container center in place.
    pub fn on_zoom_change(&mut self, new_zoom: f64) {
        if new_zoom.is_nan() {
            return;
        }
        let old_zoom = self.state.zoom;
        let new_zoom = self.frame.clamp_zoom(new_zoom);

        let anchor = self.state.container.center() - self.frame.transform_origin(self.state.container);
        let ratio = new_zoom / old_zoom;
        self.state.pan = anchor - (anchor - self.state.pan) * ratio;
        self.state.zoom = new_zoom;
        self.clamp_pan();
    }

    pub fn zoom_in(&mut self) {
        self.on_zoom_change(self.state.zoom + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.on_zoom_change(self.state.zoom - self.zoom_step);
    }

    pub fn can_zoom_in(&self) -> bool {
        self.state.zoom < self.frame.zoom_max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.state.zoom > self.frame.zoom_min
    }

    /// Back to zoom 1 (within limits) with no pan.
    pub fn reset(&mut self) {
        self.drag = None;
        self.state.zoom = self.frame.clamp_zoom(1.0);
        self.state.pan = Point::ZERO;
        self.clamp_pan();
    }

    // =========================================================================
    // Drag
    // =========================================================================

    pub fn on_drag_start(&mut self, pointer: Point) {
        self.drag = Some(DragState {
            anchor: pointer - self.state.pan,
            pan_at_start: self.state.pan,
        });
    }

    pub fn on_drag_move(&mut self, pointer: Point) {
        let Some(drag) = self.drag else {
            return;
        };
        self.state.pan = pointer - drag.anchor;
        self.clamp_pan();
    }

    pub fn on_drag_end(&mut self) {
        self.drag = None;
    }

    /// Abort the drag and restore the pan it started from.
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.state.pan = drag.pan_at_start;
        }
    }

    /// Cover-fill frames may never reveal space outside the image.
    fn clamp_pan(&mut self) {
        if self.frame.strategy != CropStrategy::CoverFill {
            return;
        }
        let container = self.state.container;
        let zoom = self.state.zoom;
        let min_x = -(container.width * zoom - container.width).max(0.0);
        let min_y = -(container.height * zoom - container.height).max(0.0);
        self.state.pan.x = self.state.pan.x.clamp(min_x, 0.0);
        self.state.pan.y = self.state.pan.y.clamp(min_y, 0.0);
    }

    // =========================================================================
    // Crop
    // =========================================================================

    /// Derive the crop region for the current view.
    ///
    /// Fails with [`ValidationError::ImageNotLoaded`] until
    /// [`set_natural_size`](Self::set_natural_size) has been called.
    pub fn compute_crop_region(&self) -> Result<CropRegion, ValidationError> {
        let natural = self.natural.ok_or(ValidationError::ImageNotLoaded)?;
        compute_crop_region(&self.frame, &self.state, natural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_keeps_center_for_cover_fill() {
        let mut engine = ViewportEngine::new(FrameSpec::polaroid(), Size::new(460.0, 500.0));
        engine.on_zoom_change(2.0);
        // Container center (230, 250) maps to content (115, 125) at zoom 2.
        assert!((engine.state().pan.x + 230.0).abs() < 1e-9);
        assert!((engine.state().pan.y + 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_scales_pan_for_fixed_frame() {
        let mut engine = ViewportEngine::new(FrameSpec::passport(), Size::new(600.0, 500.0));
        engine.on_drag_start(Point::new(100.0, 100.0));
        engine.on_drag_move(Point::new(80.0, 90.0));
        engine.on_drag_end();
        engine.on_zoom_change(2.0);
        assert_eq!(engine.state().pan, Point::new(-40.0, -20.0));
    }

    #[test]
    fn test_infinite_zoom_clamps_and_nan_is_ignored() {
        let mut engine = ViewportEngine::new(FrameSpec::passport(), Size::new(600.0, 500.0));
        engine.on_zoom_change(f64::INFINITY);
        assert_eq!(engine.state().zoom, engine.frame().zoom_max);
        engine.on_zoom_change(f64::NEG_INFINITY);
        assert_eq!(engine.state().zoom, engine.frame().zoom_min);
        engine.on_zoom_change(f64::NAN);
        assert_eq!(engine.state().zoom, engine.frame().zoom_min);
        assert!(engine.state().pan.x.is_finite());
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut engine = ViewportEngine::new(FrameSpec::passport(), Size::new(600.0, 500.0));
        engine.on_drag_move(Point::new(50.0, 50.0));
        assert_eq!(engine.state().pan, Point::ZERO);
    }

    #[test]
    fn test_cancel_restores_pan() {
        let mut engine = ViewportEngine::new(FrameSpec::passport(), Size::new(600.0, 500.0));
        engine.on_drag_start(Point::new(10.0, 10.0));
        engine.on_drag_move(Point::new(60.0, 40.0));
        engine.cancel_drag();
        assert_eq!(engine.state().pan, Point::ZERO);
        assert!(!engine.is_dragging());
    }
}
