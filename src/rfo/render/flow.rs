//! Table layout: sections flow down the page as bordered label/value grids,
//! long values wrap, pages break as needed, and the sign-off section becomes
//! a signature block.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

use super::common::{
    draw_logo, pdf_safe_text, pt, today_indonesian, wrap_text, PAGE_HEIGHT_PT, PAGE_WIDTH_PT,
};
use super::{DocumentRenderer, RenderError, RenderedReport};
use crate::rfo::logo::Logo;
use crate::rfo::report::{ReportDocument, ReportSection, SECTION_SIGN_OFF};

const MARGIN: f32 = 50.0;
const LABEL_WIDTH: f32 = 150.0;
const FONT_SIZE: f32 = 10.0;
const LEADING: f32 = 13.0;
const CELL_PADDING: f32 = 4.0;
const HEADING_HEIGHT: f32 = 18.0;
const SIGNATURE_SPACE: f32 = 55.0;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct FlowRenderer {
    /// Text printed under the title; defaults to today's date in Indonesian.
    pub print_date: Option<String>,
}

struct Page {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn shade() -> Color {
    Color::Rgb(Rgb::new(0.88, 0.90, 0.93, None))
}

fn chars_for(width: f32) -> usize {
    ((width - 2.0 * CELL_PADDING) / (FONT_SIZE * AVG_GLYPH_WIDTH)).floor() as usize
}

/// Table rows that fit below a section heading on an empty page.
fn max_rows_per_page() -> usize {
    let usable = PAGE_HEIGHT_PT - 2.0 * MARGIN - HEADING_HEIGHT - 2.0 * CELL_PADDING;
    ((usable / LEADING).floor() as usize).max(1)
}

impl Page {
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
        layer.set_outline_thickness(0.5);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_PT - MARGIN,
        })
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(pt(PAGE_WIDTH_PT), pt(PAGE_HEIGHT_PT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.layer.set_outline_thickness(0.5);
            self.y = PAGE_HEIGHT_PT - MARGIN;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(pdf_safe_text(text), size, pt(x), pt(y), font);
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(pt(x1), pt(y1)), false),
                (Point::new(pt(x2), pt(y2)), false),
            ],
            is_closed: false,
        });
    }

    fn boxed(&self, x: f32, y_top: f32, width: f32, height: f32) {
        let y_bottom = y_top - height;
        self.layer.add_line(Line {
            points: vec![
                (Point::new(pt(x), pt(y_top)), false),
                (Point::new(pt(x + width), pt(y_top)), false),
                (Point::new(pt(x + width), pt(y_bottom)), false),
                (Point::new(pt(x), pt(y_bottom)), false),
            ],
            is_closed: true,
        });
    }

    fn content_width() -> f32 {
        PAGE_WIDTH_PT - 2.0 * MARGIN
    }

    fn header(
        &mut self,
        title: &str,
        print_date: &str,
        logo: Option<&Logo>,
    ) -> Result<(), RenderError> {
        let mut title_x = MARGIN;
        let mut header_height = 40.0;

        if let Some(logo) = logo {
            let drawn = draw_logo(&self.layer, logo, MARGIN, self.y - 50.0, 80.0, 50.0)?;
            title_x = MARGIN + 95.0;
            header_height = drawn.max(header_height);
        }

        self.text(title, 16.0, title_x, self.y - 20.0, true);
        self.text(&format!("Dicetak: {}", print_date), 9.0, title_x, self.y - 35.0, false);

        self.y -= header_height + 8.0;
        self.line(MARGIN, self.y, PAGE_WIDTH_PT - MARGIN, self.y);
        self.y -= 16.0;
        Ok(())
    }

    fn section_heading(&mut self, title: &str) {
        self.ensure_room(HEADING_HEIGHT + LEADING + 2.0 * CELL_PADDING);
        let top = self.y;

        self.layer.set_fill_color(shade());
        self.layer.add_rect(Rect::new(
            pt(MARGIN),
            pt(top - HEADING_HEIGHT),
            pt(PAGE_WIDTH_PT - MARGIN),
            pt(top),
        ));
        self.layer.set_fill_color(black());
        self.boxed(MARGIN, top, Self::content_width(), HEADING_HEIGHT);
        self.text(title, 11.0, MARGIN + CELL_PADDING, top - 13.0, true);
        self.y -= HEADING_HEIGHT;
    }

    fn table(&mut self, section: &ReportSection) {
        self.section_heading(&section.title);

        let value_width = Self::content_width() - LABEL_WIDTH;
        for field in &section.fields {
            let labels = wrap_text(&field.label, chars_for(LABEL_WIDTH));
            let values = wrap_text(&field.value, chars_for(value_width));
            let rows = labels.len().max(values.len());

            // A row taller than a page is split into page-sized chunks.
            for start in (0..rows).step_by(max_rows_per_page()) {
                let end = (start + max_rows_per_page()).min(rows);
                let height = (end - start) as f32 * LEADING + 2.0 * CELL_PADDING;

                if self.y - height < MARGIN {
                    self.ensure_room(height);
                    self.section_heading(&format!("{} (lanjutan)", section.title));
                }

                let top = self.y;
                self.boxed(MARGIN, top, LABEL_WIDTH, height);
                self.boxed(MARGIN + LABEL_WIDTH, top, value_width, height);

                let first_baseline = top - CELL_PADDING - FONT_SIZE;
                for (row, i) in (start..end).enumerate() {
                    let y = first_baseline - row as f32 * LEADING;
                    if let Some(label) = labels.get(i) {
                        self.text(label, FONT_SIZE, MARGIN + CELL_PADDING, y, true);
                    }
                    if let Some(value) = values.get(i) {
                        self.text(value, FONT_SIZE, MARGIN + LABEL_WIDTH + CELL_PADDING, y, false);
                    }
                }

                self.y -= height;
            }
        }
        self.y -= 14.0;
    }

    fn signature_block(&mut self, section: &ReportSection) {
        if section.fields.is_empty() {
            return;
        }
        self.ensure_room(HEADING_HEIGHT + SIGNATURE_SPACE + 2.0 * LEADING + 10.0);
        self.text(&section.title, 11.0, MARGIN, self.y - 12.0, true);
        self.y -= HEADING_HEIGHT + 6.0;

        let column = Self::content_width() / section.fields.len() as f32;
        let top = self.y;
        for (i, field) in section.fields.iter().enumerate() {
            let x = MARGIN + i as f32 * column;
            let line_y = top - LEADING - SIGNATURE_SPACE;
            self.text(&field.label, FONT_SIZE, x, top - FONT_SIZE, false);
            self.line(x, line_y, x + column - 30.0, line_y);
            let name = field.value.lines().next().unwrap_or("");
            self.text(name, FONT_SIZE, x, line_y - LEADING, true);
        }
        self.y = top - 2.0 * LEADING - SIGNATURE_SPACE - 10.0;
    }
}

impl DocumentRenderer for FlowRenderer {
    fn render(
        &self,
        document: &ReportDocument,
        logo: Option<&Logo>,
    ) -> Result<RenderedReport, RenderError> {
        let print_date = self.print_date.clone().unwrap_or_else(today_indonesian);

        let mut page = Page::new(&document.title)?;
        page.header(&document.title, &print_date, logo)?;

        for section in &document.sections {
            if section.title == SECTION_SIGN_OFF {
                page.signature_block(section);
            } else {
                page.table(section);
            }
        }

        let pdf = page
            .doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        log::debug!("Flow renderer produced {} bytes", pdf.len());
        Ok(RenderedReport::new(pdf))
    }
}
