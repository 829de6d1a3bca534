//! Company logo handling.
//!
//! A logo can be uploaded together with a report, or persisted once as the
//! "current logo" and reused by later reports. Only one current logo exists
//! per store; the last writer wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::validation::{validate_logo_bytes, validate_logo_filename, ValidationErrors};

const CURRENT_LOGO_STEM: &str = "current_logo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFormat {
    Png,
    Jpeg,
}

impl LogoFormat {
    pub const ALL: [LogoFormat; 2] = [LogoFormat::Png, LogoFormat::Jpeg];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect the format from magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_ext(self.extension())
            .first_or_octet_stream()
            .to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("{0}")]
    Invalid(String),
    #[error("logo storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("logo storage task failed: {0}")]
    Task(String),
}

/// A validated logo image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub format: LogoFormat,
    pub data: Vec<u8>,
}

impl Logo {
    /// Validate an uploaded file by extension and content.
    pub fn from_upload(filename: &str, data: Vec<u8>) -> Result<Self, LogoError> {
        let mut errors = ValidationErrors::new();
        let Some(format) = validate_logo_filename(filename, "logo", &mut errors) else {
            return Err(LogoError::Invalid(errors.to_message()));
        };
        validate_logo_bytes(&data, format, "logo", &mut errors);
        errors.into_result().map_err(LogoError::Invalid)?;

        Ok(Self { format, data })
    }

    pub fn file_name(&self) -> String {
        format!("logo.{}", self.format.extension())
    }
}

/// Storage for the single shared "current logo".
#[async_trait]
pub trait LogoStore {
    async fn save_current(&self, logo: &Logo) -> Result<(), LogoError>;
    async fn load_current(&self) -> Result<Option<Logo>, LogoError>;
    async fn clear(&self) -> Result<(), LogoError>;
}

/// Keeps the current logo as `current_logo.{png,jpg}` inside a directory.
pub struct FsLogoStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FsLogoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    fn path_for(dir: &Path, format: LogoFormat) -> PathBuf {
        dir.join(format!("{}.{}", CURRENT_LOGO_STEM, format.extension()))
    }
}

fn write_current(dir: &Path, logo: &Logo) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&logo.data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(FsLogoStore::path_for(dir, logo.format))
        .map_err(|e| e.error)?;

    for other in LogoFormat::ALL.iter().filter(|f| **f != logo.format) {
        remove_if_exists(&FsLogoStore::path_for(dir, *other))?;
    }
    Ok(())
}

fn remove_all(dir: &Path) -> std::io::Result<()> {
    for format in LogoFormat::ALL {
        remove_if_exists(&FsLogoStore::path_for(dir, format))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[async_trait]
impl LogoStore for FsLogoStore {
    async fn save_current(&self, logo: &Logo) -> Result<(), LogoError> {
        let _guard = self.lock.lock().await;
        let dir = self.dir.clone();
        let logo = logo.clone();

        tokio::task::spawn_blocking(move || write_current(&dir, &logo))
            .await
            .map_err(|e| LogoError::Task(e.to_string()))??;

        log::info!("Current logo stored in {}", self.dir.display());
        Ok(())
    }

    async fn load_current(&self) -> Result<Option<Logo>, LogoError> {
        let _guard = self.lock.lock().await;

        for format in LogoFormat::ALL {
            match tokio::fs::read(Self::path_for(&self.dir, format)).await {
                Ok(data) => return Ok(Some(Logo { format, data })),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    async fn clear(&self) -> Result<(), LogoError> {
        let _guard = self.lock.lock().await;
        let dir = self.dir.clone();

        tokio::task::spawn_blocking(move || remove_all(&dir))
            .await
            .map_err(|e| LogoError::Task(e.to_string()))??;

        log::info!("Current logo cleared");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLogoStore {
    current: RwLock<Option<Logo>>,
}

impl MemoryLogoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogoStore for MemoryLogoStore {
    async fn save_current(&self, logo: &Logo) -> Result<(), LogoError> {
        *self.current.write() = Some(logo.clone());
        Ok(())
    }

    async fn load_current(&self) -> Result<Option<Logo>, LogoError> {
        Ok(self.current.read().clone())
    }

    async fn clear(&self) -> Result<(), LogoError> {
        *self.current.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(LogoFormat::from_filename("a.png"), Some(LogoFormat::Png));
        assert_eq!(LogoFormat::from_filename("a.JPG"), Some(LogoFormat::Jpeg));
        assert_eq!(LogoFormat::from_filename("a.jpeg"), Some(LogoFormat::Jpeg));
        assert_eq!(LogoFormat::from_filename("a.gif"), None);
        assert_eq!(LogoFormat::from_filename("noext"), None);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(LogoFormat::Png.mime_type(), "image/png");
        assert_eq!(LogoFormat::Jpeg.mime_type(), "image/jpeg");
    }

    const LOGO_PNG: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/logo.png"));

    #[test]
    fn test_from_upload_accepts_decodable_png() {
        let logo = Logo::from_upload("Kop.PNG", LOGO_PNG.to_vec()).unwrap();
        assert_eq!(logo.format, LogoFormat::Png);
        assert_eq!(logo.file_name(), "logo.png");
    }

    #[test]
    fn test_from_upload_rejects_signature_only_png() {
        let data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let err = Logo::from_upload("logo.png", data).unwrap_err();
        assert!(matches!(err, LogoError::Invalid(msg) if msg.contains("tidak dapat dibaca")));
    }

    #[test]
    fn test_from_upload_rejects_gif() {
        let err = Logo::from_upload("logo.gif", b"GIF89a".to_vec()).unwrap_err();
        assert!(matches!(err, LogoError::Invalid(msg) if msg.contains("tidak didukung")));
    }

    #[actix_web::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryLogoStore::new();
        assert!(store.load_current().await.unwrap().is_none());

        let logo = Logo {
            format: LogoFormat::Jpeg,
            data: vec![0xFF, 0xD8, 0xFF, 0xE0],
        };
        store.save_current(&logo).await.unwrap();
        assert_eq!(store.load_current().await.unwrap(), Some(logo));

        store.clear().await.unwrap();
        assert!(store.load_current().await.unwrap().is_none());
    }
}
