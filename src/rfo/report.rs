//! Report assembler: turns a flat [`RfoForm`] into the ordered
//! section → field → value document that every renderer consumes.

use serde::Serialize;
use utoipa::ToSchema;

use super::metrics::DerivedMetrics;
use super::models::RfoForm;
use super::ticket::TicketGenerator;

pub const REPORT_TITLE: &str = "Reason For Outage (RFO) Report";
pub const REPORT_FILENAME: &str = "RFO_Report.pdf";

pub const SECTION_CUSTOMER: &str = "Informasi Pelanggan";
pub const SECTION_INCIDENT: &str = "Informasi Gangguan";
pub const SECTION_SIGN_OFF: &str = "Disusun oleh";

/// A submission with the ticket resolved and metrics derived.
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub form: RfoForm,
    pub metrics: DerivedMetrics,
}

impl ReportRecord {
    pub fn assemble(mut form: RfoForm, tickets: &TicketGenerator) -> Self {
        form.nomor_tiket = tickets.resolve(&form.nomor_tiket);
        let metrics = DerivedMetrics::from_logs(&form.log_down, &form.log_up);
        Self { form, metrics }
    }

    pub fn to_document(&self) -> ReportDocument {
        let f = &self.form;

        let customer = ReportSection::new(SECTION_CUSTOMER)
            .field("ID Pelanggan", &f.id_pelanggan)
            .field("Nama Pelanggan", &f.nama_pelanggan)
            .field("Nama Link", &f.nama_link)
            .field("Alamat Link", &f.alamat_link)
            .field("Jenis Layanan", &f.jenis_layanan);

        let incident = ReportSection::new(SECTION_INCIDENT)
            .field("Nomor Tiket", &f.nomor_tiket)
            .field("Log Down", &f.log_down)
            .field("Log Up", &f.log_up)
            .field("Durasi Pending", &f.durasi_pending)
            .field("Penyebab Pending", &f.penyebab_pending)
            .field("Penyebab", &f.penyebab)
            .field("Tindakan", &f.tindakan)
            .field("MTTR", self.metrics.mttr_display())
            .field("SLA", self.metrics.sla_display());

        let sign_off = ReportSection::new(SECTION_SIGN_OFF)
            .field("Staff", &f.staff)
            .field("Manager", &f.manager);

        ReportDocument {
            title: REPORT_TITLE.to_string(),
            sections: vec![customer, incident, sign_off],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportDocument {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Look up a value by section and field label.
    pub fn value(&self, section: &str, label: &str) -> Option<&str> {
        self.section(section)?.value(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportSection {
    pub title: String,
    pub fields: Vec<ReportField>,
}

impl ReportSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReportField {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportField {
    pub label: String,
    pub value: String,
}
