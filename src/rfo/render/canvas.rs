//! Direct canvas drawing at fixed coordinates.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use super::common::{draw_logo, pdf_safe_text, pt, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};
use super::{DocumentRenderer, RenderError, RenderedReport};
use crate::rfo::logo::Logo;
use crate::rfo::report::ReportDocument;

const MARGIN_X: f32 = 50.0;
const FIELD_X: f32 = 70.0;
const TITLE_X: f32 = 200.0;
const BOTTOM_MARGIN: f32 = 50.0;
const FIELD_LEADING: f32 = 18.0;
const SECTION_GAP: f32 = 10.0;

/// Renders the report the way a plain canvas script would: logo top-left,
/// title, a rule, then `Label: value` lines grouped by section.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasRenderer;

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Canvas {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, pt(PAGE_WIDTH_PT), pt(PAGE_HEIGHT_PT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_PT - 120.0,
        })
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_MARGIN {
            let (page, layer) = self
                .doc
                .add_page(pt(PAGE_WIDTH_PT), pt(PAGE_HEIGHT_PT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_PT - BOTTOM_MARGIN;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(pdf_safe_text(text), size, pt(x), pt(y), font);
    }

    fn rule(&self, y: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(pt(MARGIN_X), pt(y)), false),
                (Point::new(pt(PAGE_WIDTH_PT - MARGIN_X), pt(y)), false),
            ],
            is_closed: false,
        });
    }
}

impl DocumentRenderer for CanvasRenderer {
    fn render(
        &self,
        document: &ReportDocument,
        logo: Option<&Logo>,
    ) -> Result<RenderedReport, RenderError> {
        let mut canvas = Canvas::new(&document.title)?;

        if let Some(logo) = logo {
            draw_logo(&canvas.layer, logo, MARGIN_X, PAGE_HEIGHT_PT - 80.0, 100.0, 60.0)?;
        }

        canvas.text(&document.title, 18.0, TITLE_X, PAGE_HEIGHT_PT - 50.0, true);
        canvas.rule(PAGE_HEIGHT_PT - 90.0);

        for section in &document.sections {
            canvas.ensure_room(20.0 + FIELD_LEADING);
            canvas.text(&section.title, 14.0, MARGIN_X, canvas.y, true);
            canvas.y -= 20.0;

            for field in &section.fields {
                let mut lines = field.value.lines();
                let first = lines.next().unwrap_or("");

                canvas.ensure_room(FIELD_LEADING);
                canvas.text(&format!("{}: {}", field.label, first), 12.0, FIELD_X, canvas.y, false);
                canvas.y -= FIELD_LEADING;

                for continuation in lines {
                    canvas.ensure_room(FIELD_LEADING);
                    canvas.text(continuation, 12.0, FIELD_X + 10.0, canvas.y, false);
                    canvas.y -= FIELD_LEADING;
                }
            }
            canvas.y -= SECTION_GAP;
        }

        let pdf = canvas
            .doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        log::debug!("Canvas renderer produced {} bytes", pdf.len());
        Ok(RenderedReport::new(pdf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfo::report::ReportSection;

    #[test]
    fn test_renders_pdf_bytes() {
        let document = ReportDocument {
            title: "Reason For Outage (RFO) Report".to_string(),
            sections: vec![ReportSection::new("Informasi Pelanggan")
                .field("Nama Pelanggan", "PT Sinar Jaya")
                .field("Alamat Link", "Jl. Sudirman\nJakarta")],
        };

        let rendered = CanvasRenderer.render(&document, None).unwrap();
        assert_eq!(rendered.filename, "RFO_Report.pdf");
        assert!(rendered.pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_long_report_paginates() {
        let mut section = ReportSection::new("Informasi Gangguan");
        for i in 0..120 {
            section = section.field(format!("Baris {i}"), "nilai");
        }
        let document = ReportDocument {
            title: "RFO".to_string(),
            sections: vec![section],
        };

        let rendered = CanvasRenderer.render(&document, None).unwrap();
        assert!(rendered.pdf.starts_with(b"%PDF-"));
    }
}
