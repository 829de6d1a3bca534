use rfo_generator::rfo::metrics::{
    elapsed_seconds, sla_percent, DerivedMetrics, MetricsError, MetricsResponse, MTTR_SENTINEL,
    SLA_BASELINE_SECONDS, SLA_SENTINEL,
};

#[test]
fn test_mttr_parts_sum_to_elapsed_minutes() {
    let cases = [
        ("2024-01-01 00:00", "2024-01-01 00:00"),
        ("2024-01-01 00:00", "2024-01-01 00:59"),
        ("2024-01-01 23:15", "2024-01-02 01:05"),
        ("2024-02-28 10:00", "2024-03-01 10:01"),
        ("2024-01-01 00:00", "2024-01-31 00:00"),
    ];

    for (down, up) in cases {
        let metrics = DerivedMetrics::from_logs(down, up);
        let DerivedMetrics::Computed {
            elapsed_seconds,
            hours,
            minutes,
            ..
        } = metrics
        else {
            panic!("expected computed metrics for {down} -> {up}");
        };
        assert!(minutes < 60);
        assert_eq!(hours * 60 + minutes, elapsed_seconds / 60, "{down} -> {up}");
    }
}

#[test]
fn test_sla_formula() {
    let metrics = DerivedMetrics::from_logs("2024-01-01 00:00", "2024-01-01 02:00");
    assert_eq!(metrics.sla(), Some(99.72));

    // 45 minutes
    assert_eq!(sla_percent(2700), 99.9);
    assert_eq!(sla_percent(0), 100.0);
    assert_eq!(sla_percent(SLA_BASELINE_SECONDS / 2), 50.0);
}

#[test]
fn test_sla_ties_round_to_even() {
    let metrics = DerivedMetrics::from_logs("2024-01-01 00:00", "2024-01-01 02:42");
    assert_eq!(metrics.sla(), Some(99.62));
    assert_eq!(metrics.sla_display(), "99.62%");

    let metrics = DerivedMetrics::from_logs("2024-01-01 00:00", "2024-01-01 06:18");
    assert_eq!(metrics.sla_display(), "99.12%");
}

#[test]
fn test_leap_day_is_counted() {
    let elapsed = elapsed_seconds("2024-02-28 12:00", "2024-03-01 12:00").unwrap();
    assert_eq!(elapsed, 2 * 24 * 3600);
}

#[test]
fn test_malformed_inputs_fall_back_to_sentinels() {
    let inputs = [
        ("", ""),
        ("2024-01-01", "2024-01-01 02:00"),
        ("2024-13-01 00:00", "2024-01-01 02:00"),
        ("2024-01-01 00:00", "besok pagi"),
        ("2024-01-01 05:00", "2024-01-01 02:00"),
    ];

    for (down, up) in inputs {
        let metrics = DerivedMetrics::from_logs(down, up);
        assert!(!metrics.is_computed(), "{down} -> {up}");
        assert_eq!(metrics.mttr_display(), MTTR_SENTINEL);
        assert_eq!(metrics.sla_display(), SLA_SENTINEL);
    }
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    let metrics = DerivedMetrics::from_logs(" 2024-01-01 00:00 ", "2024-01-01 01:30\n");
    assert_eq!(metrics.mttr_display(), "1 jam 30 menit");
}

#[test]
fn test_error_kinds() {
    assert_eq!(
        elapsed_seconds("x", "2024-01-01 00:00"),
        Err(MetricsError::InvalidLogDown("x".to_string()))
    );
    assert_eq!(
        elapsed_seconds("2024-01-01 00:10", "2024-01-01 00:00"),
        Err(MetricsError::NegativeDuration {
            elapsed_seconds: -600
        })
    );
}

#[test]
fn test_metrics_response_json() {
    let ok = MetricsResponse::from(&DerivedMetrics::from_logs(
        "2024-01-01 00:00",
        "2024-01-01 02:00",
    ));
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["mttr"], "2 jam 0 menit");
    assert_eq!(json["sla"], "99.72%");
    assert_eq!(json["computed"], true);
    assert_eq!(json["elapsed_seconds"], 7200);
    assert!(json.get("reason").is_none());

    let failed = MetricsResponse::from(&DerivedMetrics::from_logs("", ""));
    let json = serde_json::to_value(&failed).unwrap();
    assert_eq!(json["mttr"], MTTR_SENTINEL);
    assert_eq!(json["sla"], SLA_SENTINEL);
    assert_eq!(json["computed"], false);
    assert!(json.get("elapsed_seconds").is_none());
    assert!(json["reason"].as_str().unwrap().contains("log down"));
}
