#![allow(dead_code)]

use std::sync::Arc;

use rfo_generator::rfo::logo::MemoryLogoStore;
use rfo_generator::rfo::models::RfoForm;
use rfo_generator::{AppConfig, AppState};

/// A fully filled-in submission for a two-hour outage.
pub fn sample_form() -> RfoForm {
    RfoForm {
        id_pelanggan: "CUST-0012".to_string(),
        nama_pelanggan: "PT Sinar Jaya".to_string(),
        nama_link: "Link Kantor Pusat".to_string(),
        alamat_link: "Jl. Sudirman No. 1\nJakarta Pusat".to_string(),
        jenis_layanan: "Dedicated Internet 100 Mbps".to_string(),
        nomor_tiket: "TO/DIV/RE/2024-01-01/123456".to_string(),
        log_down: "2024-01-01 00:00".to_string(),
        log_up: "2024-01-01 02:00".to_string(),
        durasi_pending: "30 menit".to_string(),
        penyebab_pending: "Menunggu akses lokasi".to_string(),
        penyebab: "Fiber optik putus akibat galian".to_string(),
        tindakan: "Penyambungan ulang kabel FO".to_string(),
        staff: "Budi Santoso".to_string(),
        manager: "Sari Wulandari".to_string(),
    }
}

/// App state with an in-memory logo store.
pub fn test_app_state() -> AppState {
    AppState::with_logo_store(AppConfig::default(), Arc::new(MemoryLogoStore::new()))
}

/// PNG signature with nothing behind it; passes sniffing but not decoding.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// 16x16 RGB images.
pub const LOGO_PNG: &[u8] = include_bytes!("fixtures/logo.png");
pub const LOGO_JPG: &[u8] = include_bytes!("fixtures/logo.jpg");

/// Text of the first page, with content streams inflated.
pub fn first_page_text(pdf: &[u8]) -> String {
    let document = lopdf::Document::load_mem(pdf).unwrap();
    document.extract_text(&[1]).unwrap()
}
