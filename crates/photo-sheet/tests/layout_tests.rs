use photo_sheet::layout::*;
use photo_sheet::*;

#[test]
fn test_standard_layout() {
    let layout = layout_for(PaperType::PassportStandard);
    assert_eq!((layout.cols, layout.rows), (4, 2));
    assert_eq!(layout.photo_count(), 8);
    assert_eq!(layout.sheet_size_inches(), (6.0, 4.0));
    assert_eq!(layout.orientation, Orientation::Landscape);
    assert_eq!(layout.dpi, 300);
    assert_eq!(layout.gap_px, 3);
    assert_eq!(layout.layout_key(), "standard");
}

#[test]
fn test_custom_layout() {
    let layout = layout_for(PaperType::PassportCustom);
    assert_eq!((layout.cols, layout.rows), (3, 4));
    assert_eq!(layout.photo_count(), 12);
    assert_eq!(layout.sheet_size_inches(), (4.0, 6.0));
    assert_eq!(layout.orientation, Orientation::Portrait);
    assert_eq!(layout.cell_width_px, 1200 / 3 - 3);
    assert_eq!(layout.cell_height_px, 1800 / 4 - 3);
}

#[test]
fn test_polaroid_layout() {
    let layout = layout_for(PaperType::Polaroid);
    assert_eq!((layout.cols, layout.rows), (2, 1));
    assert_eq!(layout.margin_px, 30);
    assert_eq!(layout.gap_px, 60);
    assert_eq!(layout.cell_width_px, (1800 - 60) / 2 - 60);
    assert_eq!(layout.cell_height_px, 1200 - 60 - 60);
}

#[test]
fn test_cells_fit_sheet_without_overlap() {
    for &paper_type in PaperType::ALL {
        let layout = layout_for(paper_type);
        let rects = cell_rects(&layout);
        assert_eq!(rects.len() as u32, layout.photo_count());
        for (i, a) in rects.iter().enumerate() {
            assert!(a.right() <= layout.sheet_width_px);
            assert!(a.bottom() <= layout.sheet_height_px);
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{paper_type}: {a:?} overlaps {b:?}");
            }
        }
    }
}

#[test]
fn test_cell_bounds_centered_in_slot() {
    let layout = layout_for(PaperType::PassportStandard);
    let first = cell_bounds(&layout, GridPosition::new(0, 0));
    assert_eq!(first.x, 1);
    let second = cell_bounds(&layout, GridPosition::new(0, 1));
    assert_eq!(second.x - first.right(), layout.gap_px);
}

#[test]
fn test_paper_type_parsing() {
    assert_eq!("standard".parse::<PaperType>().unwrap(), PaperType::PassportStandard);
    assert_eq!("Passport-Custom".parse::<PaperType>().unwrap(), PaperType::PassportCustom);
    assert_eq!("caption".parse::<PaperType>().unwrap(), PaperType::Polaroid);
    assert!(matches!(
        "a4".parse::<PaperType>(),
        Err(SheetError::Config(msg)) if msg.contains("a4")
    ));
}

#[test]
fn test_products() {
    assert_eq!(PaperType::PassportCustom.product(), Product::Passport);
    assert_eq!(PaperType::Polaroid.product(), Product::Polaroid);
    assert!(PaperType::Polaroid.has_captions());
    assert_eq!(Product::Polaroid.paper_types(), &[PaperType::Polaroid]);
    for &paper_type in Product::Passport.paper_types() {
        assert_eq!(paper_type.product(), Product::Passport);
    }
}
