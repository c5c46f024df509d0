//! Pointer capture for the lifetime of a drag
//!
//! While a drag is active the display layer needs pointer-move and release
//! listeners on the whole window, not just on the image. [`DragScope`]
//! acquires them when the drag starts and releases them when the drag ends,
//! is cancelled, or the scope is dropped.

use super::engine::ViewportEngine;
use super::geometry::Point;

/// Something that can install and remove global pointer listeners
pub trait PointerListenerHost {
    /// Handle returned on attach and required to detach again
    type Token;

    fn attach(&mut self) -> Self::Token;

    fn detach(&mut self, token: Self::Token);
}

/// Headless hosts have no listeners to manage.
impl PointerListenerHost for () {
    type Token = ();

    fn attach(&mut self) {}

    fn detach(&mut self, _token: ()) {}
}

/// An active drag holding global pointer listeners
pub struct DragScope<'a, H: PointerListenerHost> {
    engine: &'a mut ViewportEngine,
    host: &'a mut H,
    token: Option<H::Token>,
}

impl<'a, H: PointerListenerHost> DragScope<'a, H> {
    /// Start a drag at `pointer` and attach the listeners.
    pub fn begin(engine: &'a mut ViewportEngine, host: &'a mut H, pointer: Point) -> Self {
        engine.on_drag_start(pointer);
        let token = host.attach();
        log::debug!("Pointer listeners attached for drag");
        Self {
            engine,
            host,
            token: Some(token),
        }
    }

    pub fn move_to(&mut self, pointer: Point) {
        self.engine.on_drag_move(pointer);
    }

    pub fn engine(&self) -> &ViewportEngine {
        &*self.engine
    }

    /// Finish the drag, keeping the current pan.
    pub fn end(mut self) {
        self.engine.on_drag_end();
        self.release();
    }

    /// Abort the drag and return to the pan it started from.
    pub fn cancel(mut self) {
        self.engine.cancel_drag();
        self.release();
    }

    fn release(&mut self) {
        if let Some(token) = self.token.take() {
            self.host.detach(token);
            log::debug!("Pointer listeners detached");
        }
    }
}

impl<H: PointerListenerHost> Drop for DragScope<'_, H> {
    fn drop(&mut self) {
        if self.token.is_some() {
            self.engine.on_drag_end();
            self.release();
        }
    }
}
