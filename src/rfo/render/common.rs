//! Shared helpers for the renderers: dates, text shaping and logo embedding.

use std::io::Cursor;
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfLayerReference, Pt};

use super::RenderError;
use crate::rfo::logo::{Logo, LogoFormat};

/// A4 in points.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

const LOGO_DPI: f32 = 300.0;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Format a date in Indonesian (e.g., "30 Desember 2025").
pub fn format_indonesian_date(date: NaiveDate) -> String {
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} {} {}", date.day(), month, date.year())
}

pub fn today_indonesian() -> String {
    format_indonesian_date(Local::now().date_naive())
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Convert points to printpdf millimetres.
pub fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

/// The built-in PDF fonts only cover Latin-1; anything else becomes `?`.
pub fn pdf_safe_text(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\t' => ' ',
            c if (c as u32) < 0x20 => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap by character count. Explicit newlines are kept.
pub fn wrap_text(value: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in value.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            // Hard-split words longer than a whole line.
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(head);
            }
            if word.is_empty() {
                continue;
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Draw `logo` with its lower-left corner at (`x`, `y`) points, scaled to fit
/// within `max_width` x `max_height` points. Returns the drawn height.
pub fn draw_logo(
    layer: &PdfLayerReference,
    logo: &Logo,
    x: f32,
    y: f32,
    max_width: f32,
    max_height: f32,
) -> Result<f32, RenderError> {
    let image = decode_logo(&logo.data, logo.format)?;

    let native_w = image.image.width.0 as f32 * 72.0 / LOGO_DPI;
    let native_h = image.image.height.0 as f32 * 72.0 / LOGO_DPI;
    if native_w <= 0.0 || native_h <= 0.0 {
        return Err(RenderError::Logo("logo has zero size".to_string()));
    }

    let scale = (max_width / native_w).min(max_height / native_h);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pt(x)),
            translate_y: Some(pt(y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(LOGO_DPI),
            ..Default::default()
        },
    );

    Ok(native_h * scale)
}

/// Decode logo bytes into an image printpdf can embed.
pub fn decode_logo(data: &[u8], format: LogoFormat) -> Result<Image, RenderError> {
    let reader = Cursor::new(data);
    let image = match format {
        LogoFormat::Png => {
            let decoder = PngDecoder::new(reader).map_err(|e| RenderError::Logo(e.to_string()))?;
            Image::try_from(decoder)
        }
        LogoFormat::Jpeg => {
            let decoder =
                JpegDecoder::new(reader).map_err(|e| RenderError::Logo(e.to_string()))?;
            Image::try_from(decoder)
        }
    };
    image.map_err(|e| RenderError::Logo(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indonesian_date() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        assert_eq!(format_indonesian_date(date), "30 Desember 2025");
    }

    #[test]
    fn test_escape_typst_string() {
        assert_eq!(escape_typst_string("a \"b\"\nc\\"), r#"a \"b\"\nc\\"#);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("kabel fiber optik putus di dekat tiang", 12);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(lines.join(" "), "kabel fiber optik putus di dekat tiang");
    }

    #[test]
    fn test_wrap_text_keeps_newlines_and_splits_long_words() {
        let lines = wrap_text("baris satu\nABCDEFGHIJ", 4);
        assert_eq!(lines, ["bari", "s", "satu", "ABCD", "EFGH", "IJ"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10), [""]);
    }

    #[test]
    fn test_pdf_safe_text() {
        assert_eq!(pdf_safe_text("Café\t✓"), "Café ?");
    }
}
