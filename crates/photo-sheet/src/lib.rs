pub mod caption;
pub mod collab;
pub mod constants;
pub mod layout;
mod options;
mod types;
mod upload;
pub mod viewport;
pub mod workflow;

pub use caption::{CaptionError, CaptionSet, FontId, validate_set};
pub use collab::*;
pub use layout::{PaperLayoutSpec, PaperType, Product, cell_rects, layout_for};
pub use options::*;
pub use types::*;
pub use upload::*;
pub use viewport::{CropRegion, CropStrategy, FrameSpec, Point, Size, ViewportEngine, ViewportState};
pub use workflow::*;
