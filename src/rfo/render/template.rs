//! Typst template rendering.
//!
//! The report data is serialized as a Typst dictionary, prepended to the
//! template from `static/rfo_report.typ`, written to a temporary directory
//! together with the logo, and compiled with the `typst` CLI.

use std::fmt::Write as _;
use std::fs;
use std::process::Command;

use tempfile::{tempdir, TempDir};

use super::common::{escape_typst_string, get_static_dir, today_indonesian};
use super::{DocumentRenderer, RenderError, RenderedReport};
use crate::rfo::logo::Logo;
use crate::rfo::report::{ReportDocument, SECTION_SIGN_OFF};

pub const TEMPLATE_FILE: &str = "rfo_report.typ";
const OUTPUT_FILE: &str = "rfo_report.pdf";

pub struct TemplateRenderer {
    template: String,
    typst_bin: String,
    /// Overrides the print date (defaults to today, in Indonesian).
    pub print_date: Option<String>,
}

impl TemplateRenderer {
    /// Load the bundled template.
    pub fn new(typst_bin: impl Into<String>) -> Result<Self, RenderError> {
        let template_path = get_static_dir().join(TEMPLATE_FILE);
        let template = fs::read_to_string(&template_path).map_err(RenderError::TemplateIo)?;
        Ok(Self::with_template(template, typst_bin))
    }

    pub fn with_template(template: impl Into<String>, typst_bin: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            typst_bin: typst_bin.into(),
            print_date: None,
        }
    }

    /// Complete Typst source: data binding followed by the template body.
    pub fn typst_source(
        &self,
        document: &ReportDocument,
        logo_file: Option<&str>,
        tanggal: &str,
    ) -> String {
        let mut src = String::from("#let rfo = (\n");
        let _ = writeln!(src, "  title: \"{}\",", escape_typst_string(&document.title));
        let _ = writeln!(src, "  tanggal: \"{}\",", escape_typst_string(tanggal));
        match logo_file {
            Some(name) => {
                let _ = writeln!(src, "  logo: \"{}\",", escape_typst_string(name));
            }
            None => src.push_str("  logo: none,\n"),
        }
        let _ = writeln!(src, "  sign_off: \"{}\",", escape_typst_string(SECTION_SIGN_OFF));

        src.push_str("  sections: (\n");
        for section in &document.sections {
            let _ = writeln!(
                src,
                "    (title: \"{}\", fields: (",
                escape_typst_string(&section.title)
            );
            for field in &section.fields {
                let _ = writeln!(
                    src,
                    "      (\"{}\", \"{}\"),",
                    escape_typst_string(&field.label),
                    escape_typst_string(&field.value)
                );
            }
            src.push_str("    )),\n");
        }
        src.push_str("  ),\n)\n\n");

        src.push_str(&self.template);
        src
    }
}

impl DocumentRenderer for TemplateRenderer {
    fn render(
        &self,
        document: &ReportDocument,
        logo: Option<&Logo>,
    ) -> Result<RenderedReport, RenderError> {
        let tanggal = self.print_date.clone().unwrap_or_else(today_indonesian);

        let temp_dir = tempdir().map_err(RenderError::TempDir)?;

        let logo_file = match logo {
            Some(logo) => {
                let name = logo.file_name();
                fs::write(temp_dir.path().join(&name), &logo.data)
                    .map_err(RenderError::WriteTypst)?;
                Some(name)
            }
            None => None,
        };

        let source = self.typst_source(document, logo_file.as_deref(), &tanggal);
        fs::write(temp_dir.path().join(TEMPLATE_FILE), source).map_err(RenderError::WriteTypst)?;

        let pdf = compile_typst_to_pdf(&self.typst_bin, &temp_dir)?;
        log::debug!("Typst renderer produced {} bytes", pdf.len());
        Ok(RenderedReport::new(pdf))
    }
}

/// Run `typst compile` inside `temp_dir` and read the resulting PDF.
fn compile_typst_to_pdf(typst_bin: &str, temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
    let typ_path = temp_dir.path().join(TEMPLATE_FILE);
    let output_path = temp_dir.path().join(OUTPUT_FILE);

    let output = Command::new(typst_bin)
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .output()
        .map_err(RenderError::TypstIo)?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        log::error!(
            "typst compile failed ({}): {}",
            code,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Err(RenderError::TypstExit(code));
    }

    fs::read(&output_path).map_err(RenderError::ReadPdf)
}
