//! # QR Encoder
//!
//! Thin adapter over the `qrcode` crate that produces 8-bit grayscale rasters.
//!
//! ## Error Correction Levels
//!
//! | Level | Recovery | Notes |
//! |-------|----------|-------|
//! | L | ~7% | Smallest symbol |
//! | M | ~15% | Default, good for clean label stock |
//! | Q | ~25% | Textured or curved surfaces |
//! | H | ~30% | Labels expected to get scuffed |
//!
//! Output is deterministic for a given text, level and `qrcode` version.

use image::{GrayImage, ImageFormat, Luma};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::LabelError;

/// QR error correction level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Width of the quiet zone in modules when one is requested.
pub const QUIET_ZONE_MODULES: usize = 4;

/// Encoded QR symbol as a grayscale raster (0 = black, 255 = white).
#[derive(Debug, Clone)]
pub struct QrRaster {
    /// Modules per side, excluding any quiet zone
    pub modules: usize,
    image: GrayImage,
}

impl QrRaster {
    /// Side length in pixels (the raster is square).
    pub fn side(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Encode the raster as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let mut png_bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| LabelError::Render(format!("PNG encoding failed: {}", e)))?;
        Ok(png_bytes)
    }
}

/// Encode `text` as a QR symbol, `module_pixels` pixels per module.
///
/// ## Example
///
/// ```
/// use labelsheet::render::qr::{encode, EcLevel};
///
/// let raster = encode("T-000001", EcLevel::M, 4, false).unwrap();
/// assert_eq!(raster.side() as usize, raster.modules * 4);
/// ```
pub fn encode(
    text: &str,
    level: EcLevel,
    module_pixels: u32,
    quiet_zone: bool,
) -> Result<QrRaster, LabelError> {
    let code = qrcode::QrCode::with_error_correction_level(text.as_bytes(), level.into())
        .map_err(|e| LabelError::Render(format!("QR code generation failed for '{}': {}", text, e)))?;

    let cell = module_pixels.max(1) as usize;
    let modules = code.width();
    let border = if quiet_zone { QUIET_ZONE_MODULES } else { 0 };
    let side = (modules + border * 2) * cell;

    let mut image = GrayImage::from_pixel(side as u32, side as u32, Luma([255u8]));

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] != qrcode::Color::Dark {
                continue;
            }
            for cy in 0..cell {
                for cx in 0..cell {
                    let px = (border + qx) * cell + cx;
                    let py = (border + qy) * cell + cy;
                    image.put_pixel(px as u32, py as u32, Luma([0u8]));
                }
            }
        }
    }

    Ok(QrRaster { modules, image })
}

/// Encode `text` straight to PNG bytes.
pub fn encode_png(
    text: &str,
    level: EcLevel,
    module_pixels: u32,
    quiet_zone: bool,
) -> Result<Vec<u8>, LabelError> {
    encode(text, level, module_pixels, quiet_zone)?.to_png()
}

// ============================================================================
// TESTS
// ============================================================================
