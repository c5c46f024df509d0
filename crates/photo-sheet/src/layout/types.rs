//! Layout data types for sheet composition
//!
//! These types describe the fixed print products and the grid geometry
//! shared by local previews and the compositing request.

use std::fmt;
use std::str::FromStr;

use crate::types::{Orientation, SheetError};

/// Print products, each with one fixed sheet layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PaperType {
    /// 8 identity photos on a 6×4 in landscape sheet
    PassportStandard,
    /// 12 identity photos on a 4×6 in portrait sheet
    PassportCustom,
    /// 2 caption-bearing prints on a 6×4 in landscape sheet
    Polaroid,
}

impl PaperType {
    pub const ALL: &[Self] = &[Self::PassportStandard, Self::PassportCustom, Self::Polaroid];

    /// Identifier sent to the collaborator
    pub fn layout_key(self) -> &'static str {
        match self {
            PaperType::PassportStandard => "standard",
            PaperType::PassportCustom => "custom",
            PaperType::Polaroid => "polaroid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaperType::PassportStandard => "Passport Standard",
            PaperType::PassportCustom => "Passport Custom",
            PaperType::Polaroid => "Polaroid",
        }
    }

    /// Whether prints of this type carry caption text
    pub fn has_captions(self) -> bool {
        matches!(self, PaperType::Polaroid)
    }

    pub fn product(self) -> Product {
        match self {
            PaperType::PassportStandard | PaperType::PassportCustom => Product::Passport,
            PaperType::Polaroid => Product::Polaroid,
        }
    }
}

/// Product family chosen at paper type selection; decides the route
/// through the workflow and the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Product {
    /// Identity photos with enhancement and a selectable sheet layout
    Passport,
    /// Caption prints with a fixed two-up sheet
    Polaroid,
}

impl Product {
    /// Paper type used until the user picks a layout
    pub fn default_paper_type(self) -> PaperType {
        match self {
            Product::Passport => PaperType::PassportStandard,
            Product::Polaroid => PaperType::Polaroid,
        }
    }

    /// Paper types the user can choose between
    pub fn paper_types(self) -> &'static [PaperType] {
        match self {
            Product::Passport => &[PaperType::PassportStandard, PaperType::PassportCustom],
            Product::Polaroid => &[PaperType::Polaroid],
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Passport => write!(f, "passport"),
            Product::Polaroid => write!(f, "polaroid"),
        }
    }
}

impl fmt::Display for PaperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layout_key())
    }
}

impl FromStr for PaperType {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "passport-standard" => Ok(PaperType::PassportStandard),
            "custom" | "passport-custom" => Ok(PaperType::PassportCustom),
            "polaroid" | "caption" => Ok(PaperType::Polaroid),
            other => Err(SheetError::Config(format!("Unknown paper type: {other}"))),
        }
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: u32,
    /// Column index (0 = leftmost column)
    pub col: u32,
}

impl GridPosition {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A rectangular area in sheet pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate (exclusive)
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate (exclusive)
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Grid geometry for one print product
///
/// Computed from the fixed product table, never stored. The same value
/// drives local previews and the compositing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaperLayoutSpec {
    pub paper_type: PaperType,
    /// Number of rows in the photo grid
    pub rows: u32,
    /// Number of columns in the photo grid
    pub cols: u32,
    /// Width of each photo in pixels
    pub cell_width_px: u32,
    /// Height of each photo in pixels
    pub cell_height_px: u32,
    pub sheet_width_px: u32,
    pub sheet_height_px: u32,
    pub dpi: u32,
    pub orientation: Orientation,
    /// Space between neighbouring photos
    pub gap_px: u32,
    /// Space between the grid and the sheet edge
    pub margin_px: u32,
}

impl PaperLayoutSpec {
    /// Total number of photos on the sheet
    pub fn photo_count(&self) -> u32 {
        self.rows * self.cols
    }

    pub fn layout_key(&self) -> &'static str {
        self.paper_type.layout_key()
    }

    /// Sheet size in inches (width, height)
    pub fn sheet_size_inches(&self) -> (f64, f64) {
        (
            self.sheet_width_px as f64 / self.dpi as f64,
            self.sheet_height_px as f64 / self.dpi as f64,
        )
    }

    /// Width of one grid slot (cell plus its share of the gap)
    pub fn slot_width_px(&self) -> u32 {
        (self.sheet_width_px - 2 * self.margin_px) / self.cols
    }

    /// Height of one grid slot (cell plus its share of the gap)
    pub fn slot_height_px(&self) -> u32 {
        (self.sheet_height_px - 2 * self.margin_px) / self.rows
    }
}
