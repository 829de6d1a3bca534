use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw form submission. Every field is optional free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RfoForm {
    #[schema(example = "CUST-0012")]
    pub id_pelanggan: String,
    #[schema(example = "PT Sinar Jaya")]
    pub nama_pelanggan: String,
    #[schema(example = "Link Kantor Pusat")]
    pub nama_link: String,
    #[schema(example = "Jl. Sudirman No. 1, Jakarta")]
    pub alamat_link: String,
    #[schema(example = "Dedicated Internet 100 Mbps")]
    pub jenis_layanan: String,

    /// Left blank to have the server generate one.
    #[schema(example = "TO/DIV/RE/2024-01-01/123456")]
    pub nomor_tiket: String,
    #[schema(example = "2024-01-01 00:00")]
    pub log_down: String,
    #[schema(example = "2024-01-01 02:00")]
    pub log_up: String,
    #[schema(example = "30 menit")]
    pub durasi_pending: String,
    #[schema(example = "Menunggu akses lokasi")]
    pub penyebab_pending: String,
    #[schema(example = "Fiber optik putus")]
    pub penyebab: String,
    #[schema(example = "Penyambungan ulang kabel FO")]
    pub tindakan: String,

    #[schema(example = "Budi")]
    pub staff: String,
    #[schema(example = "Sari")]
    pub manager: String,
}

impl RfoForm {
    /// Set a field by its form name. Returns `false` for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "id_pelanggan" => &mut self.id_pelanggan,
            "nama_pelanggan" => &mut self.nama_pelanggan,
            "nama_link" => &mut self.nama_link,
            "alamat_link" => &mut self.alamat_link,
            "jenis_layanan" => &mut self.jenis_layanan,
            "nomor_tiket" => &mut self.nomor_tiket,
            "log_down" => &mut self.log_down,
            "log_up" => &mut self.log_up,
            "durasi_pending" => &mut self.durasi_pending,
            "penyebab_pending" => &mut self.penyebab_pending,
            "penyebab" => &mut self.penyebab,
            "tindakan" => &mut self.tindakan,
            "staff" => &mut self.staff,
            "manager" => &mut self.manager,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetricsRequest {
    #[serde(default)]
    #[schema(example = "2024-01-01 00:00")]
    pub log_down: String,
    #[serde(default)]
    #[schema(example = "2024-01-01 02:00")]
    pub log_up: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    #[schema(example = "TO/DIV/RE/2024-01-01/123456")]
    pub nomor_tiket: String,
}
