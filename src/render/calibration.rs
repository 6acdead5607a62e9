//! # Calibration Grid
//!
//! One-page alignment sheet for checking a layout against real label stock.
//!
//! For every position the sheet shows:
//! - the label's bounding rectangle
//! - a crosshair through the label center
//! - the 1-based position number, centered in the cell
//!
//! Print it on plain paper, hold it against a label sheet in front of a light,
//! and adjust margins, gaps or offsets until the rectangles match. Uses only
//! the layout; never the ledger.

use super::pdf::PdfCanvas;
use crate::error::LabelError;
use crate::layout::SheetLayout;

const DIGIT_HALF_HEIGHT_EM: f32 = 0.3;

/// Parameters for the calibration grid.
#[derive(Debug, Clone)]
pub struct Params {
    /// Crosshair arm length as a fraction of the shorter label side. Default: 0.25
    pub crosshair_ratio: f32,
    /// Position number size in points. Default: 9
    pub number_size: f32,
    /// Outline stroke width in points. Default: 0.5
    pub stroke_width: f32,
    /// Crosshair gray level (0 = black). Default: 0.5
    pub crosshair_gray: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            crosshair_ratio: 0.25,
            number_size: 9.0,
            stroke_width: 0.5,
            crosshair_gray: 0.5,
        }
    }
}

/// A rendered calibration grid.
#[derive(Debug, Clone)]
pub struct CalibrationSheet {
    pub pdf: Vec<u8>,
    pub pages: usize,
    /// Number of positions drawn
    pub positions: usize,
}

/// Render the calibration grid with default parameters.
pub fn render_grid(layout: &SheetLayout) -> Result<CalibrationSheet, LabelError> {
    render_grid_with(layout, &Params::default())
}

pub fn render_grid_with(
    layout: &SheetLayout,
    params: &Params,
) -> Result<CalibrationSheet, LabelError> {
    layout.geometry.validate()?;

    let geometry = &layout.geometry;
    let canvas = PdfCanvas::new(
        "Calibration Grid",
        geometry.page_width,
        geometry.page_height,
    )?;

    let arm = geometry.label_width.min(geometry.label_height) * params.crosshair_ratio;
    let dx = layout.style.offset_x;
    let dy = layout.style.offset_y;

    let mut positions = 0;
    for position in 0..geometry.labels_per_page() {
        let cell = geometry.cell(position).translate(dx, dy);
        let center = cell.center();

        canvas.set_stroke(0.0, params.stroke_width);
        canvas.rect_outline(&cell);

        canvas.set_stroke(params.crosshair_gray, params.stroke_width);
        canvas.line(center.x - arm, center.y, center.x + arm, center.y);
        canvas.line(center.x, center.y - arm, center.x, center.y + arm);

        // Courier digits are about 0.6 em tall; drop the baseline by half of that.
        let label = (position + 1).to_string();
        canvas.text_centered(
            &label,
            params.number_size,
            center.x,
            center.y - params.number_size * DIGIT_HALF_HEIGHT_EM,
        );
        positions += 1;
    }

    let pages = canvas.pages();
    let pdf = canvas.finish()?;
    tracing::info!(
        layout = %layout.name,
        positions,
        bytes = pdf.len(),
        "rendered calibration grid"
    );
    Ok(CalibrationSheet {
        pdf,
        pages,
        positions,
    })
}
