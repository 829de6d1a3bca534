//! MTTR and SLA calculation from the log down / log up timestamps.
//!
//! Parse failures never propagate to the report: the derived fields fall back
//! to the `Format Salah` / `Tidak dapat dihitung` sentinels and the report is
//! still produced.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

/// Accepted format for `log_down` and `log_up`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// SLA is always measured against a 30-day month.
pub const SLA_BASELINE_SECONDS: i64 = 30 * 24 * 60 * 60;

pub const MTTR_SENTINEL: &str = "Format Salah";
pub const SLA_SENTINEL: &str = "Tidak dapat dihitung";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("log down '{0}' tidak sesuai format YYYY-MM-DD HH:MM")]
    InvalidLogDown(String),
    #[error("log up '{0}' tidak sesuai format YYYY-MM-DD HH:MM")]
    InvalidLogUp(String),
    #[error("log up lebih awal dari log down ({elapsed_seconds} detik)")]
    NegativeDuration { elapsed_seconds: i64 },
}

/// Derived MTTR/SLA values for one report.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedMetrics {
    Computed {
        elapsed_seconds: i64,
        hours: i64,
        minutes: i64,
        sla_percent: f64,
    },
    Unparseable(MetricsError),
}

impl DerivedMetrics {
    /// Compute metrics, swallowing any error into the sentinel variant.
    pub fn from_logs(log_down: &str, log_up: &str) -> Self {
        match elapsed_seconds(log_down, log_up) {
            Ok(elapsed) => Self::from_elapsed(elapsed),
            Err(e) => {
                log::warn!("Cannot compute MTTR/SLA: {}", e);
                Self::Unparseable(e)
            }
        }
    }

    fn from_elapsed(elapsed_seconds: i64) -> Self {
        Self::Computed {
            elapsed_seconds,
            hours: elapsed_seconds / 3600,
            minutes: (elapsed_seconds % 3600) / 60,
            sla_percent: sla_percent(elapsed_seconds),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed { .. })
    }

    pub fn elapsed_seconds(&self) -> Option<i64> {
        match self {
            Self::Computed {
                elapsed_seconds, ..
            } => Some(*elapsed_seconds),
            Self::Unparseable(_) => None,
        }
    }

    pub fn sla(&self) -> Option<f64> {
        match self {
            Self::Computed { sla_percent, .. } => Some(*sla_percent),
            Self::Unparseable(_) => None,
        }
    }

    /// e.g. `2 jam 5 menit`.
    pub fn mttr_display(&self) -> String {
        match self {
            Self::Computed { hours, minutes, .. } => format!("{hours} jam {minutes} menit"),
            Self::Unparseable(_) => MTTR_SENTINEL.to_string(),
        }
    }

    /// e.g. `99.72%`.
    pub fn sla_display(&self) -> String {
        match self {
            Self::Computed { sla_percent, .. } => format!("{sla_percent:.2}%"),
            Self::Unparseable(_) => SLA_SENTINEL.to_string(),
        }
    }
}

pub fn parse_log_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), LOG_TIMESTAMP_FORMAT).ok()
}

/// Seconds between `log_down` and `log_up`. Zero is allowed, negative is not.
pub fn elapsed_seconds(log_down: &str, log_up: &str) -> Result<i64, MetricsError> {
    let down = parse_log_timestamp(log_down)
        .ok_or_else(|| MetricsError::InvalidLogDown(log_down.to_string()))?;
    let up =
        parse_log_timestamp(log_up).ok_or_else(|| MetricsError::InvalidLogUp(log_up.to_string()))?;

    let elapsed = (up - down).num_seconds();
    if elapsed < 0 {
        return Err(MetricsError::NegativeDuration {
            elapsed_seconds: elapsed,
        });
    }
    Ok(elapsed)
}

/// `(1 - elapsed / 30 days) * 100`, rounded to two decimals.
pub fn sla_percent(elapsed_seconds: i64) -> f64 {
    let ratio = elapsed_seconds as f64 / SLA_BASELINE_SECONDS as f64;
    round2((1.0 - ratio) * 100.0)
}

/// Two decimals, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// JSON view of [`DerivedMetrics`] for the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    #[schema(example = "2 jam 0 menit")]
    pub mttr: String,
    #[schema(example = "99.72%")]
    pub sla: String,
    pub computed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&DerivedMetrics> for MetricsResponse {
    fn from(metrics: &DerivedMetrics) -> Self {
        let reason = match metrics {
            DerivedMetrics::Unparseable(e) => Some(e.to_string()),
            DerivedMetrics::Computed { .. } => None,
        };
        Self {
            mttr: metrics.mttr_display(),
            sla: metrics.sla_display(),
            computed: metrics.is_computed(),
            elapsed_seconds: metrics.elapsed_seconds(),
            sla_percent: metrics.sla(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_hour_outage() {
        let metrics = DerivedMetrics::from_logs("2024-01-01 00:00", "2024-01-01 02:00");
        assert_eq!(metrics.elapsed_seconds(), Some(7200));
        assert_eq!(metrics.mttr_display(), "2 jam 0 menit");
        assert_eq!(metrics.sla(), Some(99.72));
        assert_eq!(metrics.sla_display(), "99.72%");
    }

    #[test]
    fn test_hours_do_not_wrap_at_one_day() {
        let metrics = DerivedMetrics::from_logs("2024-01-01 08:00", "2024-01-02 09:30");
        assert_eq!(metrics.mttr_display(), "25 jam 30 menit");
    }

    #[test]
    fn test_zero_duration_is_full_availability() {
        let metrics = DerivedMetrics::from_logs("2024-01-01 08:00", "2024-01-01 08:00");
        assert_eq!(metrics.mttr_display(), "0 jam 0 menit");
        assert_eq!(metrics.sla_display(), "100.00%");
    }

    #[test]
    fn test_up_before_down_uses_sentinels() {
        let metrics = DerivedMetrics::from_logs("2024-01-01 08:00", "2024-01-01 07:00");
        assert!(matches!(
            metrics,
            DerivedMetrics::Unparseable(MetricsError::NegativeDuration { elapsed_seconds: -3600 })
        ));
        assert_eq!(metrics.mttr_display(), MTTR_SENTINEL);
        assert_eq!(metrics.sla_display(), SLA_SENTINEL);
    }

    #[test]
    fn test_wrong_format_uses_sentinels() {
        let metrics = DerivedMetrics::from_logs("01/01/2024 08:00", "2024-01-01 09:00");
        assert_eq!(
            metrics,
            DerivedMetrics::Unparseable(MetricsError::InvalidLogDown("01/01/2024 08:00".into()))
        );

        let metrics = DerivedMetrics::from_logs("2024-01-01 08:00", "");
        assert!(matches!(
            metrics,
            DerivedMetrics::Unparseable(MetricsError::InvalidLogUp(_))
        ));
    }

    #[test]
    fn test_sla_half_cent_rounds_to_even() {
        // 2 jam 42 menit -> 99.625
        assert_eq!(sla_percent(162 * 60), 99.62);
        // 6 jam 18 menit -> 99.125
        assert_eq!(sla_percent(378 * 60), 99.12);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_sla_goes_negative_past_thirty_days() {
        assert_eq!(sla_percent(SLA_BASELINE_SECONDS), 0.0);
        assert!(sla_percent(SLA_BASELINE_SECONDS * 2) < 0.0);
    }
}
