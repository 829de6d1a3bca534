//! Upload validation with user-facing messages in Indonesian.
//!
//! Report fields are free text and are not validated here; only the logo
//! upload is checked before a report is rendered.

use std::fmt;

use super::logo::LogoFormat;
use super::render::common::decode_logo;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn unsupported_logo(field: &str, filename: &str) -> Self {
        Self::new(
            field,
            format!("Format logo '{}' tidak didukung", filename),
        )
        .with_suggestion("Gunakan file PNG, JPG, atau JPEG")
    }

    pub fn empty_logo(field: &str) -> Self {
        Self::new(field, "File logo kosong").with_suggestion("Unggah ulang file logo")
    }

    pub fn logo_content_mismatch(field: &str, format: LogoFormat) -> Self {
        Self::new(
            field,
            format!("Isi file logo bukan gambar {}", format.label()),
        )
        .with_suggestion("Pastikan ekstensi file sesuai dengan isi gambar")
    }

    pub fn undecodable_logo(field: &str, reason: &str) -> Self {
        Self::new(field, format!("File logo tidak dapat dibaca: {}", reason))
            .with_suggestion("Simpan ulang gambar sebagai PNG atau JPEG standar")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validasi gagal: {} kesalahan ditemukan",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

/// Check the extension of an uploaded logo. Returns the detected format.
pub fn validate_logo_filename(
    filename: &str,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<LogoFormat> {
    match LogoFormat::from_filename(filename) {
        Some(format) => Some(format),
        None => {
            errors.add(ValidationError::unsupported_logo(field, filename));
            None
        }
    }
}

/// Check that the bytes are non-empty, carry the magic number of `format`
/// and decode as an image.
pub fn validate_logo_bytes(
    data: &[u8],
    format: LogoFormat,
    field: &str,
    errors: &mut ValidationErrors,
) {
    if data.is_empty() {
        errors.add(ValidationError::empty_logo(field));
        return;
    }
    if LogoFormat::sniff(data) != Some(format) {
        errors.add(ValidationError::logo_content_mismatch(field, format));
        return;
    }
    if let Err(e) = decode_logo(data, format) {
        errors.add(ValidationError::undecodable_logo(field, &e.to_string()));
    }
}
