//! Layout calculation for print sheets
//!
//! This module handles the geometric description of each product:
//! - Product table (grid, sheet size, orientation, spacing)
//! - Cell bounds for local previews

mod grid;
mod types;

pub use grid::*;
pub use types::*;
