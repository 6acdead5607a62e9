//! # Layout Profiles
//!
//! A profile couples a sheet [`Geometry`] with the per-label [`LabelStyle`]
//! used when placing QR codes and text.
//!
//! Profiles are plain serde structures, so a deployment can keep its tuned
//! label stock in a JSON file:
//!
//! ```json
//! {
//!   "name": "shop-labels",
//!   "geometry": { "page_width": 612, "page_height": 792, "label_width": 72,
//!                 "label_height": 72, "cols": 7, "rows": 9, "margin_left": 27,
//!                 "margin_top": 36, "gap_x": 9, "gap_y": 9 },
//!   "style": { "offset_x": 1.5, "offset_y": -0.5 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::geometry::Geometry;
use crate::error::LabelError;
use crate::render::qr::EcLevel;

/// Per-label composition settings (points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Space reserved above the text band
    pub top_padding: f32,
    /// Height of the code text band
    pub text_band: f32,
    /// Space between the text band and the QR symbol
    pub text_gap: f32,
    /// Space reserved below the QR symbol
    pub bottom_padding: f32,
    /// Code text size
    pub font_size: f32,
    /// Print the code text above the QR symbol
    pub show_text: bool,
    pub error_correction: EcLevel,
    /// Raster pixels per QR module
    pub module_pixels: u32,
    /// Uniform shift applied to every placed element, for printer feed drift
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            top_padding: 4.0,
            text_band: 8.0,
            text_gap: 2.0,
            bottom_padding: 4.0,
            font_size: 7.0,
            show_text: true,
            error_correction: EcLevel::M,
            module_pixels: 8,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl LabelStyle {
    /// Side of the QR square inside a `width` × `height` cell.
    pub fn qr_side(&self, width: f32, height: f32) -> f32 {
        let vertical =
            height - self.top_padding - self.text_band - self.text_gap - self.bottom_padding;
        vertical.min(width)
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), LabelError> {
        let reserved = [
            self.top_padding,
            self.text_band,
            self.text_gap,
            self.bottom_padding,
        ];
        if reserved.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
            return Err(LabelError::validation("label paddings must not be negative"));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(LabelError::validation("font_size must be positive"));
        }
        if !(self.offset_x.is_finite() && self.offset_y.is_finite()) {
            return Err(LabelError::validation("offsets must be finite"));
        }
        if self.module_pixels == 0 {
            return Err(LabelError::validation("module_pixels must be at least 1"));
        }
        if self.qr_side(geometry.label_width, geometry.label_height) <= 0.0 {
            return Err(LabelError::validation(
                "label paddings leave no room for the QR code",
            ));
        }
        Ok(())
    }
}

/// A named label-stock configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub name: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub style: LabelStyle,
}

impl SheetLayout {
    /// Name of the default built-in profile.
    pub const DEFAULT_NAME: &'static str = "letter-7x9";

    /// US Letter, 7 × 9 one-inch labels.
    pub fn letter_7x9() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            geometry: Geometry::LETTER_7X9,
            style: LabelStyle::default(),
        }
    }

    #[inline]
    pub fn labels_per_page(&self) -> usize {
        self.geometry.labels_per_page()
    }

    /// List all built-in profiles.
    pub fn built_in() -> Vec<Self> {
        vec![Self::letter_7x9()]
    }

    /// Look up a built-in profile by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        Self::built_in()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Load and validate a profile from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let layout: Self = serde_json::from_str(&text).map_err(|e| {
            LabelError::validation(format!("invalid layout file {}: {}", path.display(), e))
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Resolve a CLI/HTTP layout argument.
    ///
    /// Formats:
    /// - a built-in name (`"letter-7x9"`)
    /// - a path to a JSON profile (anything ending in `.json`)
    pub fn resolve(spec: &str) -> Result<Self, LabelError> {
        if let Some(layout) = Self::by_name(spec) {
            return Ok(layout);
        }
        if spec.trim().to_ascii_lowercase().ends_with(".json") {
            return Self::from_json_file(spec.trim());
        }

        let names: Vec<String> = Self::built_in().into_iter().map(|p| p.name).collect();
        Err(LabelError::validation(format!(
            "unknown layout '{}'. Use one of [{}] or a .json profile",
            spec,
            names.join(", ")
        )))
    }

    pub fn validate(&self) -> Result<(), LabelError> {
        self.geometry.validate()?;
        self.style.validate(&self.geometry)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::letter_7x9()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_qr_side() {
        let layout = SheetLayout::letter_7x9();
        // 72 - 4 - 8 - 2 - 4
        assert_eq!(layout.style.qr_side(72.0, 72.0), 54.0);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_qr_side_limited_by_width() {
        let style = LabelStyle::default();
        assert_eq!(style.qr_side(40.0, 200.0), 40.0);
    }

    #[test]
    fn test_by_name() {
        assert!(SheetLayout::by_name("LETTER-7X9").is_some());
        assert!(SheetLayout::by_name("a4-3x8").is_none());
        assert!(SheetLayout::resolve("a4-3x8").is_err());
    }

    #[test]
    fn test_style_leaves_no_room() {
        let mut layout = SheetLayout::letter_7x9();
        layout.style.top_padding = 60.0;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_json_profile() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "name": "drifty",
                "geometry": {{
                    "page_width": 612, "page_height": 792,
                    "label_width": 72, "label_height": 72,
                    "cols": 7, "rows": 9,
                    "margin_left": 27, "margin_top": 36,
                    "gap_x": 9, "gap_y": 9
                }},
                "style": {{ "offset_x": 1.5, "show_text": false }}
            }}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let layout = SheetLayout::resolve(&path).unwrap();
        assert_eq!(layout.name, "drifty");
        assert_eq!(layout.style.offset_x, 1.5);
        assert!(!layout.style.show_text);
        // Unspecified style fields fall back to defaults.
        assert_eq!(layout.style.text_band, 8.0);
        assert_eq!(layout.geometry, Geometry::LETTER_7X9);
    }
}
