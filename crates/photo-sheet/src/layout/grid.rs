//! Sheet grid calculation
//!
//! Maps each print product to its grid and computes where every photo
//! lands on the sheet.

use crate::constants::{SHEET_DPI, inches_to_px};
use crate::types::Orientation;

use super::{GridPosition, PaperLayoutSpec, PaperType, PixelRect};

// =============================================================================
// Product Table
// =============================================================================

/// Fixed description of a product before pixel sizes are derived
struct ProductGrid {
    cols: u32,
    rows: u32,
    /// Sheet edges in inches (short, long)
    sheet_inches: (f64, f64),
    orientation: Orientation,
    gap_px: u32,
    margin_px: u32,
}

fn product_grid(paper_type: PaperType) -> ProductGrid {
    match paper_type {
        PaperType::PassportStandard => ProductGrid {
            cols: 4,
            rows: 2,
            sheet_inches: (4.0, 6.0),
            orientation: Orientation::Landscape,
            gap_px: 3,
            margin_px: 0,
        },
        PaperType::PassportCustom => ProductGrid {
            cols: 3,
            rows: 4,
            sheet_inches: (4.0, 6.0),
            orientation: Orientation::Portrait,
            gap_px: 3,
            margin_px: 0,
        },
        // Spaced layout: white borders around each print leave room to cut.
        PaperType::Polaroid => ProductGrid {
            cols: 2,
            rows: 1,
            sheet_inches: (4.0, 6.0),
            orientation: Orientation::Landscape,
            gap_px: 60,
            margin_px: 30,
        },
    }
}

// =============================================================================
// Layout Creation
// =============================================================================

/// Grid geometry for a paper type at the fixed sheet resolution.
pub fn layout_for(paper_type: PaperType) -> PaperLayoutSpec {
    let grid = product_grid(paper_type);
    let (short, long) = grid.sheet_inches;
    let (width_in, height_in) = grid.orientation.apply(short, long);

    let sheet_width_px = inches_to_px(width_in);
    let sheet_height_px = inches_to_px(height_in);

    let slot_width = (sheet_width_px - 2 * grid.margin_px) / grid.cols;
    let slot_height = (sheet_height_px - 2 * grid.margin_px) / grid.rows;

    PaperLayoutSpec {
        paper_type,
        rows: grid.rows,
        cols: grid.cols,
        cell_width_px: slot_width - grid.gap_px,
        cell_height_px: slot_height - grid.gap_px,
        sheet_width_px,
        sheet_height_px,
        dpi: SHEET_DPI,
        orientation: grid.orientation,
        gap_px: grid.gap_px,
        margin_px: grid.margin_px,
    }
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Calculate the pixel bounds of the photo at the given grid position.
///
/// The photo is centered within its slot, so half of the gap falls on
/// each side.
pub fn cell_bounds(layout: &PaperLayoutSpec, pos: GridPosition) -> PixelRect {
    let slot_width = layout.slot_width_px();
    let slot_height = layout.slot_height_px();

    let x = layout.margin_px + pos.col * slot_width + (slot_width - layout.cell_width_px) / 2;
    let y = layout.margin_px + pos.row * slot_height + (slot_height - layout.cell_height_px) / 2;

    PixelRect::new(x, y, layout.cell_width_px, layout.cell_height_px)
}

/// Bounds of every photo on the sheet in row-major order.
pub fn cell_rects(layout: &PaperLayoutSpec) -> Vec<PixelRect> {
    let mut rects = Vec::with_capacity(layout.photo_count() as usize);
    for row in 0..layout.rows {
        for col in 0..layout.cols {
            rects.push(cell_bounds(layout, GridPosition::new(row, col)));
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_sheet_pixels() {
        let layout = layout_for(PaperType::PassportStandard);
        assert_eq!(layout.sheet_width_px, 1800);
        assert_eq!(layout.sheet_height_px, 1200);
        assert_eq!(layout.cell_width_px, 447);
        assert_eq!(layout.cell_height_px, 597);
    }

    #[test]
    fn test_polaroid_margins_respected() {
        let layout = layout_for(PaperType::Polaroid);
        let rects = cell_rects(&layout);
        assert_eq!(rects.len(), 2);
        for rect in &rects {
            assert!(rect.x >= layout.margin_px);
            assert!(rect.right() <= layout.sheet_width_px - layout.margin_px);
            assert!(rect.y >= layout.margin_px);
            assert!(rect.bottom() <= layout.sheet_height_px - layout.margin_px);
        }
    }

    #[test]
    fn test_cells_do_not_overlap() {
        for &paper in PaperType::ALL {
            let rects = cell_rects(&layout_for(paper));
            for (i, a) in rects.iter().enumerate() {
                for b in rects.iter().skip(i + 1) {
                    assert!(!a.overlaps(b), "{paper}: {a:?} overlaps {b:?}");
                }
            }
        }
    }
}
