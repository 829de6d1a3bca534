use actix_multipart::{Field, Multipart};
use actix_web::HttpResponse;
use futures::TryStreamExt;
use log::debug;
use sanitize_filename::sanitize;

use super::models::RfoForm;
use crate::ErrorResponse;

/// Upper bound for a single multipart part.
const MAX_PART_BYTES: usize = 10 * 1024 * 1024;

/// Uploaded file before validation.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ParsedReportUpload {
    pub form: RfoForm,
    pub logo: Option<UploadedFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("Invalid metadata: {0}")]
    MetadataError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
    #[error("Part '{0}' exceeds the upload limit")]
    TooLarge(String),
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

async fn read_field(field: &mut Field, name: &str) -> Result<Vec<u8>, MultipartParseError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| MultipartParseError::IoError(e.to_string()))?
    {
        if buffer.len() + chunk.len() > MAX_PART_BYTES {
            return Err(MultipartParseError::TooLarge(name.to_string()));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, MultipartParseError> {
    let bytes = read_field(field, name).await?;
    String::from_utf8(bytes).map_err(|e| MultipartParseError::Utf8Error(e.to_string()))
}

pub struct MultipartParser;

impl MultipartParser {
    /// Parse a report submission.
    ///
    /// Form data comes either as a `metadata` JSON part or as one text part per
    /// field; text parts override values from `metadata`. The optional logo is
    /// the `logo` file part.
    pub async fn parse_report_multipart(
        mut multipart: Multipart,
    ) -> Result<ParsedReportUpload, MultipartParseError> {
        let mut parsed = ParsedReportUpload::default();
        let mut overrides: Vec<(String, String)> = Vec::new();

        while let Some(mut field) = multipart
            .try_next()
            .await
            .map_err(|e| MultipartParseError::FieldError(e.to_string()))?
        {
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let filename = content_disposition.get_filename().map(|s| s.to_string());

            match name.as_str() {
                "metadata" => {
                    let raw = read_text(&mut field, &name).await?;
                    parsed.form = serde_json::from_str(&raw)
                        .map_err(|e| MultipartParseError::MetadataError(e.to_string()))?;
                }
                "logo" => {
                    if let Some(logo) = Self::read_upload(&mut field, &name, filename).await? {
                        parsed.logo = Some(logo);
                    }
                }
                _ => {
                    let value = read_text(&mut field, &name).await?;
                    overrides.push((name, value));
                }
            }
        }

        for (name, value) in overrides {
            if !parsed.form.set_field(&name, value) {
                debug!("Ignoring unknown multipart field '{}'", name);
            }
        }

        Ok(parsed)
    }

    /// Parse a multipart body holding only a `logo` file part.
    pub async fn parse_logo_multipart(
        mut multipart: Multipart,
    ) -> Result<UploadedFile, MultipartParseError> {
        while let Some(mut field) = multipart
            .try_next()
            .await
            .map_err(|e| MultipartParseError::FieldError(e.to_string()))?
        {
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let is_logo = content_disposition.get_name() == Some("logo");
            let filename = content_disposition.get_filename().map(|s| s.to_string());

            if is_logo {
                if let Some(logo) = Self::read_upload(&mut field, "logo", filename).await? {
                    return Ok(logo);
                }
            }
        }

        Err(MultipartParseError::FieldError(
            "No logo file found in multipart payload".to_string(),
        ))
    }

    /// Returns `None` for an empty file input (browsers send one when nothing is chosen).
    async fn read_upload(
        field: &mut Field,
        name: &str,
        filename: Option<String>,
    ) -> Result<Option<UploadedFile>, MultipartParseError> {
        let filename = filename.ok_or_else(|| {
            MultipartParseError::FieldError(format!("No filename in '{}' field", name))
        })?;
        let data = read_field(field, name).await?;

        if filename.is_empty() && data.is_empty() {
            return Ok(None);
        }
        Ok(Some(UploadedFile {
            filename: sanitize(&filename),
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MultipartParseError::FieldError("field error".to_string());
        assert_eq!(error.to_string(), "Multipart field error: field error");
    }

    #[test]
    fn test_error_to_response_status() {
        let resp: HttpResponse = MultipartParseError::MetadataError("bad".into()).into();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let resp: HttpResponse = MultipartParseError::IoError("disk".into()).into();
        assert_eq!(resp.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
