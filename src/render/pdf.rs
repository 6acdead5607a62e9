//! Minimal drawing surface over `printpdf`.
//!
//! Callers work in PDF points with a bottom-left origin, the same units as
//! [`Geometry`](crate::layout::Geometry); conversion to `printpdf`'s
//! millimetres happens here only.

use image::GrayImage;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Px, Rgb,
};

use crate::error::LabelError;
use crate::layout::Rect;

/// Millimetres per PDF point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Courier glyphs all advance 600/1000 em.
const COURIER_ADVANCE_EM: f32 = 0.6;

const LAYER_NAME: &str = "Labels";

#[inline]
fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

/// Width of `text` set in Courier at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * COURIER_ADVANCE_EM
}

/// A document being drawn, one page at a time.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    page_width: f32,
    page_height: f32,
    pages: usize,
}

impl PdfCanvas {
    /// Start a document whose first page already exists.
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Result<Self, LabelError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(page_width), mm(page_height), LAYER_NAME);
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(BuiltinFont::CourierBold)
            .map_err(|e| LabelError::Render(format!("failed to load font: {}", e)))?;

        Ok(Self {
            doc,
            layer,
            font,
            page_width,
            page_height,
            pages: 1,
        })
    }

    /// Append a page and direct further drawing to it.
    pub fn add_page(&mut self) {
        let (page, layer) =
            self.doc
                .add_page(mm(self.page_width), mm(self.page_height), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Set stroke gray level (0 = black, 1 = white) and width in points.
    pub fn set_stroke(&self, gray: f32, width: f32) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
        self.layer.set_outline_thickness(width);
    }

    pub fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let points = vec![
            (printpdf::Point::new(mm(x1), mm(y1)), false),
            (printpdf::Point::new(mm(x2), mm(y2)), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    pub fn rect_outline(&self, rect: &Rect) {
        let points = vec![
            (printpdf::Point::new(mm(rect.x), mm(rect.y)), false),
            (printpdf::Point::new(mm(rect.right()), mm(rect.y)), false),
            (printpdf::Point::new(mm(rect.right()), mm(rect.top())), false),
            (printpdf::Point::new(mm(rect.x), mm(rect.top())), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    /// Draw text with its baseline starting at `(x, y)`.
    pub fn text(&self, text: &str, size: f32, x: f32, y: f32) {
        self.layer.use_text(text, size, mm(x), mm(y), &self.font);
    }

    /// Draw text horizontally centered on `center_x`.
    pub fn text_centered(&self, text: &str, size: f32, center_x: f32, baseline: f32) {
        let x = center_x - text_width(text, size) / 2.0;
        self.text(text, size, x, baseline);
    }

    /// Place a grayscale raster so that it fills `rect` (assumed square).
    pub fn image(&self, raster: &GrayImage, rect: &Rect) {
        let (width, height) = raster.dimensions();

        let image = Image::from(ImageXObject {
            width: Px(width as usize),
            height: Px(height as usize),
            color_space: ColorSpace::Greyscale,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: raster.as_raw().clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // printpdf sizes images as pixels / dpi inches.
        let dpi = width as f32 * 72.0 / rect.width;

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(rect.x)),
                translate_y: Some(mm(rect.y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    /// Serialize the finished document.
    pub fn finish(self) -> Result<Vec<u8>, LabelError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| LabelError::Render(format!("failed to write PDF: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("T-000001", 10.0), 48.0);
        assert_eq!(text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_pages_and_output() {
        let mut canvas = PdfCanvas::new("test", 612.0, 792.0).unwrap();
        canvas.set_stroke(0.0, 0.5);
        canvas.rect_outline(&Rect {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        });
        canvas.add_page();
        canvas.text_centered("1", 8.0, 100.0, 100.0);
        assert_eq!(canvas.pages(), 2);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
