//! Interactive viewport and crop engine
//!
//! This module turns drag and zoom input into a normalized crop region:
//! - Frame definitions (aspect ratio, zoom range, crop strategy)
//! - Pan/zoom state and pointer handling
//! - Crop derivation shared by every frame strategy
//! - Scoped pointer capture for drags

mod crop;
mod drag;
mod engine;
mod frame;
mod geometry;

pub use crop::*;
pub use drag::*;
pub use engine::*;
pub use frame::*;
pub use geometry::*;
