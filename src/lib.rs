//! # labelsheet - Sequential Code Allocation and QR Label Sheets
//!
//! labelsheet issues short, never-reused identifier codes (`T-006519`) and
//! prints them as QR labels on a fixed sheet grid. It provides:
//!
//! - **Allocation**: per-prefix monotonic numbering backed by an append-only SQLite ledger
//! - **Geometry**: exact, position-indexed placement on a label grid
//! - **Rendering**: multi-page QR label sheets and a calibration grid, as PDF
//! - **Server**: a small HTTP API over the above
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use labelsheet::{
//!     allocator::{Allocator, AllocatorConfig},
//!     layout::SheetLayout,
//!     ledger::SqliteLedger,
//!     render,
//! };
//!
//! // Open the ledger and allocate a batch
//! let ledger = Arc::new(SqliteLedger::open("labels.db")?);
//! let allocator = Allocator::new(ledger, AllocatorConfig::default());
//! let codes: Vec<String> = allocator
//!     .allocate("T", 3)?
//!     .iter()
//!     .map(|c| c.to_string())
//!     .collect();
//!
//! // Lay them out starting at the first label of a fresh sheet
//! let sheet = render::render(&codes, 1, &SheetLayout::letter_7x9())?;
//! std::fs::write("labels.pdf", sheet.pdf)?;
//!
//! # Ok::<(), labelsheet::error::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`code`] | Prefix, width and code formatting |
//! | [`allocator`] | Validated, atomic block allocation |
//! | [`ledger`] | Durable record of issued codes |
//! | [`layout`] | Sheet geometry and layout profiles |
//! | [`render`] | QR rasters, label sheets, calibration grid |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod allocator;
pub mod code;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use allocator::Allocator;
pub use code::Code;
pub use error::LabelError;
pub use layout::SheetLayout;
