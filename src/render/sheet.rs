//! # Sheet Renderer
//!
//! Places one QR label per code on consecutive grid positions and writes the
//! result as a multi-page PDF.
//!
//! ## Pagination
//!
//! ```text
//! offset       = start_position - 1
//! global_index = offset + i
//! page         = global_index / labels_per_page
//! position     = global_index % labels_per_page
//! ```
//!
//! The first page exists before anything is placed. A new page starts when a
//! code lands on position 0 and it is not the first code, so a partially used
//! sheet can be finished by starting at its first free position.
//!
//! ## Label Composition
//!
//! ```text
//! ┌──────────────┐ ─┬─ top_padding
//! │   T-000042   │ ─┼─ text_band
//! │              │ ─┼─ text_gap
//! │   ▛▀▀▀▀▀▜    │  │
//! │   ▌ QR  ▐    │  │  qr side = what is left
//! │   ▙▄▄▄▄▄▟    │  │
//! │              │ ─┴─ bottom_padding
//! └──────────────┘
//! ```
//!
//! The planning step is pure; only [`render`] touches the QR encoder and PDF
//! writer.

use serde::Serialize;

use super::pdf::PdfCanvas;
use super::qr;
use crate::error::LabelError;
use crate::layout::{LabelStyle, Rect, SheetLayout};

/// Where a code's text goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextPlacement {
    pub center_x: f32,
    pub baseline: f32,
    pub size: f32,
}

/// One label on the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub code: String,
    pub global_index: usize,
    pub page: usize,
    pub position: usize,
    /// Label cell before offsets
    pub cell: Rect,
    /// QR square, offsets applied
    pub qr: Rect,
    pub text: Option<TextPlacement>,
}

/// Pure placement plan for a sheet run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPlan {
    pub pages: Vec<Vec<Placement>>,
}

impl SheetPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn label_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.pages.iter().flatten()
    }
}

/// Rendered PDF plus a summary.
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    pub pdf: Vec<u8>,
    pub pages: usize,
    pub labels: usize,
}

/// Compute the QR and text positions inside `cell`.
pub fn compose(cell: &Rect, style: &LabelStyle) -> (Rect, Option<TextPlacement>) {
    let side = style.qr_side(cell.width, cell.height);

    let qr = Rect {
        x: cell.x + (cell.width - side) / 2.0,
        y: cell.y + style.bottom_padding,
        width: side,
        height: side,
    }
    .translate(style.offset_x, style.offset_y);

    let text = style.show_text.then(|| TextPlacement {
        center_x: qr.center().x,
        baseline: qr.top() + style.text_gap,
        size: style.font_size,
    });

    (qr, text)
}

/// Validate the request and lay out every code.
pub fn plan<S: AsRef<str>>(
    codes: &[S],
    start_position: usize,
    layout: &SheetLayout,
) -> Result<SheetPlan, LabelError> {
    if codes.is_empty() {
        return Err(LabelError::validation("no codes to render"));
    }

    let per_page = layout.labels_per_page();
    if start_position == 0 || start_position > per_page {
        return Err(LabelError::validation(format!(
            "start position must be between 1 and {}, got {}",
            per_page, start_position
        )));
    }

    let offset = start_position - 1;
    let mut pages: Vec<Vec<Placement>> = vec![Vec::new()];

    for (i, code) in codes.iter().enumerate() {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(LabelError::validation(format!("code #{} is blank", i + 1)));
        }

        let global_index = offset + i;
        let page = global_index / per_page;
        let position = global_index % per_page;

        if position == 0 && i != 0 {
            pages.push(Vec::new());
        }
        debug_assert_eq!(page, pages.len() - 1);

        let cell = layout.geometry.cell(position);
        let (qr, text) = compose(&cell, &layout.style);

        if let Some(current) = pages.last_mut() {
            current.push(Placement {
                code: code.to_string(),
                global_index,
                page,
                position,
                cell,
                qr,
                text,
            });
        }
    }

    Ok(SheetPlan { pages })
}

/// Render `codes` onto label sheets starting at the 1-based `start_position`.
pub fn render<S: AsRef<str>>(
    codes: &[S],
    start_position: usize,
    layout: &SheetLayout,
) -> Result<RenderedSheet, LabelError> {
    layout.validate()?;
    let plan = plan(codes, start_position, layout)?;

    let geometry = &layout.geometry;
    let style = &layout.style;
    let mut canvas = PdfCanvas::new("Label Sheet", geometry.page_width, geometry.page_height)?;

    for (page_index, page) in plan.pages.iter().enumerate() {
        if page_index > 0 {
            canvas.add_page();
        }

        for placement in page {
            let raster = qr::encode(
                &placement.code,
                style.error_correction,
                style.module_pixels,
                false,
            )?;
            canvas.image(raster.image(), &placement.qr);

            if let Some(text) = placement.text {
                canvas.text_centered(&placement.code, text.size, text.center_x, text.baseline);
            }
        }
    }

    let pages = canvas.pages();
    let labels = plan.label_count();
    let pdf = canvas.finish()?;

    tracing::info!(
        layout = %layout.name,
        labels,
        pages,
        start_position,
        bytes = pdf.len(),
        "rendered label sheet"
    );

    Ok(RenderedSheet { pdf, pages, labels })
}

// ============================================================================
// TESTS
// ============================================================================
