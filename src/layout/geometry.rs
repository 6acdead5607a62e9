//! # Sheet Geometry
//!
//! Pure mapping from a label's position on a sheet to page coordinates.
//!
//! All lengths are PDF points (72 per inch). `y` grows upward from the
//! bottom edge of the page, while rows are counted from the top:
//!
//! ```text
//!  page_height ┬───────────────────────────────────┐
//!              │ margin_top                         │
//!              │   ┌─────┐ gap_x ┌─────┐            │
//!     row 0    │   │  0  │       │  1  │  ...       │
//!              │   └─────┘       └─────┘            │
//!              │    gap_y                           │
//!              │   ┌─────┐       ┌─────┐            │
//!     row 1    │   │cols │       │     │  ...       │
//!              │   └─────┘       └─────┘            │
//!            0 └───────────────────────────────────┘
//!               margin_left
//! ```
//!
//! Every position is computed directly from its index, never by stepping from
//! a neighbour, so results are bit-for-bit stable across calls.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Slack allowed when checking that the grid fits on the page.
const FIT_EPSILON: f32 = 0.01;

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Same rectangle moved by `(dx, dy)`.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Label grid on one physical sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub page_width: f32,
    pub page_height: f32,
    pub label_width: f32,
    pub label_height: f32,
    pub cols: u32,
    pub rows: u32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub gap_x: f32,
    pub gap_y: f32,
}

impl Geometry {
    /// # US Letter, 7 × 9 one-inch labels
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Page | 8.5" × 11" (612 × 792 pt) |
    /// | Label | 1" × 1" (72 pt) |
    /// | Gaps | 1/8" (9 pt) both ways |
    /// | Side margins | 3/8" (27 pt) |
    /// | Top/bottom margins | 1/2" (36 pt) |
    pub const LETTER_7X9: Self = Self {
        page_width: 612.0,
        page_height: 792.0,
        label_width: 72.0,
        label_height: 72.0,
        cols: 7,
        rows: 9,
        margin_left: 27.0,
        margin_top: 36.0,
        gap_x: 9.0,
        gap_y: 9.0,
    };

    #[inline]
    pub fn labels_per_page(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Horizontal center-to-center spacing.
    #[inline]
    pub fn pitch_x(&self) -> f32 {
        self.label_width + self.gap_x
    }

    /// Vertical center-to-center spacing.
    #[inline]
    pub fn pitch_y(&self) -> f32 {
        self.label_height + self.gap_y
    }

    /// Bottom-left corner of the label at `position`, for a page of height
    /// `page_height`.
    ///
    /// `row 0` is the topmost row; the `(row + 1) * label_height` term
    /// converts it to the bottom-up PDF axis.
    pub fn position_to_xy(&self, position: usize, page_height: f32) -> Point {
        let cols = self.cols.max(1) as usize;
        let col = (position % cols) as f32;
        let row = (position / cols) as f32;

        let x = self.margin_left + col * (self.label_width + self.gap_x);
        let y = page_height - self.margin_top - (row + 1.0) * self.label_height - row * self.gap_y;

        Point::new(x, y)
    }

    /// Bottom-left corner of the label at `position` on this page size.
    pub fn origin(&self, position: usize) -> Point {
        self.position_to_xy(position, self.page_height)
    }

    /// Bounding rectangle of the label at `position`.
    pub fn cell(&self, position: usize) -> Rect {
        let origin = self.origin(position);
        Rect {
            x: origin.x,
            y: origin.y,
            width: self.label_width,
            height: self.label_height,
        }
    }

    /// Reject grids that are empty, degenerate, or spill off the page.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(LabelError::validation("grid needs at least one column and one row"));
        }

        let lengths = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("label_width", self.label_width),
            ("label_height", self.label_height),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(LabelError::validation(format!("{} must be positive", name)));
            }
        }

        let spacing = [
            ("margin_left", self.margin_left),
            ("margin_top", self.margin_top),
            ("gap_x", self.gap_x),
            ("gap_y", self.gap_y),
        ];
        for (name, value) in spacing {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LabelError::validation(format!("{} must not be negative", name)));
            }
        }

        let used_width = self.margin_left
            + self.cols as f32 * self.label_width
            + (self.cols - 1) as f32 * self.gap_x;
        if used_width > self.page_width + FIT_EPSILON {
            return Err(LabelError::validation(format!(
                "grid is {:.1}pt wide but the page is only {:.1}pt",
                used_width, self.page_width
            )));
        }

        let used_height = self.margin_top
            + self.rows as f32 * self.label_height
            + (self.rows - 1) as f32 * self.gap_y;
        if used_height > self.page_height + FIT_EPSILON {
            return Err(LabelError::validation(format!(
                "grid is {:.1}pt tall but the page is only {:.1}pt",
                used_height, self.page_height
            )));
        }

        Ok(())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::LETTER_7X9
    }
}

// ============================================================================
// TESTS
// ============================================================================
