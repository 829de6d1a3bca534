mod common;

use common::{LOGO_JPG, LOGO_PNG, PNG_BYTES};
use rfo_generator::rfo::logo::{FsLogoStore, Logo, LogoError, LogoFormat, LogoStore, MemoryLogoStore};

fn png_logo() -> Logo {
    Logo::from_upload("logo.png", LOGO_PNG.to_vec()).unwrap()
}

fn jpeg_logo() -> Logo {
    Logo::from_upload("Logo.JPEG", LOGO_JPG.to_vec()).unwrap()
}

#[test]
fn test_upload_validation() {
    assert_eq!(png_logo().format, LogoFormat::Png);
    assert_eq!(jpeg_logo().format, LogoFormat::Jpeg);

    let gif = Logo::from_upload("logo.gif", b"GIF89a".to_vec());
    assert!(matches!(gif, Err(LogoError::Invalid(_))));

    // extension says png, content says jpeg
    let mismatch = Logo::from_upload("logo.png", LOGO_JPG.to_vec());
    assert!(matches!(mismatch, Err(LogoError::Invalid(_))));

    let empty = Logo::from_upload("logo.png", Vec::new());
    assert!(matches!(empty, Err(LogoError::Invalid(_))));

    // right signature, but not an image
    let truncated = Logo::from_upload("logo.png", PNG_BYTES.to_vec());
    assert!(matches!(
        truncated,
        Err(LogoError::Invalid(msg)) if msg.contains("tidak dapat dibaca")
    ));
}

#[actix_web::test]
async fn test_fs_store_replaces_previous_format() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsLogoStore::new(dir.path());

    assert!(store.load_current().await.unwrap().is_none());

    store.save_current(&png_logo()).await.unwrap();
    assert!(dir.path().join("current_logo.png").exists());
    assert_eq!(store.load_current().await.unwrap(), Some(png_logo()));

    store.save_current(&jpeg_logo()).await.unwrap();
    assert!(!dir.path().join("current_logo.png").exists());
    assert!(dir.path().join("current_logo.jpg").exists());
    assert_eq!(store.load_current().await.unwrap(), Some(jpeg_logo()));

    store.clear().await.unwrap();
    assert!(store.load_current().await.unwrap().is_none());
    // clearing twice is fine
    store.clear().await.unwrap();
}

#[actix_web::test]
async fn test_fs_store_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("uploads").join("logo");
    let store = FsLogoStore::new(&nested);

    store.save_current(&png_logo()).await.unwrap();
    assert!(nested.join("current_logo.png").exists());
}

#[actix_web::test]
async fn test_memory_store_round_trip() {
    let store = MemoryLogoStore::new();
    assert!(store.load_current().await.unwrap().is_none());

    store.save_current(&jpeg_logo()).await.unwrap();
    store.save_current(&png_logo()).await.unwrap();
    assert_eq!(store.load_current().await.unwrap(), Some(png_logo()));

    store.clear().await.unwrap();
    assert!(store.load_current().await.unwrap().is_none());
}
