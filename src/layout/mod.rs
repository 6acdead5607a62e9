//! # Layout Module
//!
//! Label-stock descriptions.
//!
//! ## Modules
//!
//! - [`geometry`]: Position → page coordinate mapping
//! - [`profile`]: Named, serializable layout profiles

pub mod geometry;
pub mod profile;

pub use geometry::{Geometry, Point, Rect};
pub use profile::{LabelStyle, SheetLayout};
