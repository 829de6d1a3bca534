//! Reason For Outage reports: ticket numbers, MTTR/SLA metrics, report
//! assembly, logo handling and PDF rendering.

pub mod handlers;
pub mod logo;
pub mod metrics;
pub mod models;
pub mod multipart_parser;
pub mod render;
pub mod report;
pub mod ticket;
pub mod validation;

pub use handlers::config;
pub use metrics::DerivedMetrics;
pub use report::{ReportDocument, ReportRecord};
pub use ticket::TicketGenerator;
