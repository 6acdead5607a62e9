//! # Rendering Module
//!
//! Turns codes and layouts into printable output.
//!
//! ## Modules
//!
//! - [`qr`]: QR symbol rasters
//! - [`sheet`]: Multi-page label sheets
//! - [`calibration`]: Single-page alignment grid
//! - [`pdf`]: Drawing surface shared by both PDF renderers
//!
//! Nothing here reads or writes the ledger, so renders may run in parallel.

pub mod calibration;
pub mod pdf;
pub mod qr;
pub mod sheet;

pub use calibration::{CalibrationSheet, render_grid};
pub use qr::EcLevel;
pub use sheet::{RenderedSheet, SheetPlan, render};
