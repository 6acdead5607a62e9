//! # Sheet Tests
//!
//! End-to-end checks of sheet planning and PDF output.

use labelsheet::layout::{Geometry, SheetLayout};
use labelsheet::render::{self, calibration, sheet};
use pretty_assertions::assert_eq;

fn codes(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("T-{:06}", i)).collect()
}

#[test]
fn test_two_sheets_plus_one() {
    let layout = SheetLayout::letter_7x9();
    let per_page = layout.labels_per_page();

    let rendered = render::render(&codes(per_page * 2 + 1), 1, &layout).unwrap();
    assert_eq!(rendered.pages, 3);
    assert_eq!(rendered.labels, per_page * 2 + 1);

    let plan = sheet::plan(&codes(per_page * 2 + 1), 1, &layout).unwrap();
    assert_eq!(plan.pages.last().map(Vec::len), Some(1));
}

#[test]
fn test_page_count_formula() {
    let layout = SheetLayout::letter_7x9();
    let per_page = layout.labels_per_page();

    for (n, start) in [(1, 1), (63, 1), (64, 1), (10, 60), (4, 60), (200, 17)] {
        let plan = sheet::plan(&codes(n), start, &layout).unwrap();
        let expected = (start - 1 + n).div_ceil(per_page);
        assert_eq!(plan.page_count(), expected, "n={} start={}", n, start);
        assert_eq!(plan.label_count(), n);
    }
}

#[test]
fn test_every_label_inside_its_cell() {
    let layout = SheetLayout::letter_7x9();
    let plan = sheet::plan(&codes(63), 1, &layout).unwrap();

    for p in plan.placements() {
        assert!(p.qr.x >= p.cell.x && p.qr.right() <= p.cell.right());
        assert!(p.qr.y >= p.cell.y && p.qr.top() <= p.cell.top());
        let text = p.text.unwrap();
        assert!(text.baseline < p.cell.top());
    }
}

#[test]
fn test_placements_follow_geometry() {
    let layout = SheetLayout::letter_7x9();
    let geometry = Geometry::LETTER_7X9;
    let plan = sheet::plan(&codes(20), 3, &layout).unwrap();

    for p in plan.placements() {
        assert_eq!(p.cell, geometry.cell(p.position));
        assert_eq!(p.position, p.global_index % 63);
    }
}

#[test]
fn test_custom_grid() {
    let mut layout = SheetLayout::letter_7x9();
    layout.name = "letter-2x3".into();
    layout.geometry = Geometry {
        cols: 2,
        rows: 3,
        label_width: 200.0,
        label_height: 200.0,
        margin_left: 50.0,
        margin_top: 50.0,
        gap_x: 12.0,
        gap_y: 20.0,
        ..Geometry::LETTER_7X9
    };
    assert!(layout.validate().is_ok());

    let rendered = render::render(&codes(7), 1, &layout).unwrap();
    assert_eq!(rendered.pages, 2);
    assert!(rendered.pdf.starts_with(b"%PDF"));
}

#[test]
fn test_calibration_grid_is_single_page_pdf() {
    let layout = SheetLayout::letter_7x9();
    let grid = calibration::render_grid(&layout).unwrap();

    assert!(grid.pdf.starts_with(b"%PDF"));
    assert_eq!(grid.pages, 1);
    assert_eq!(grid.positions, layout.labels_per_page());
    assert_eq!(grid.positions, 63);
}
