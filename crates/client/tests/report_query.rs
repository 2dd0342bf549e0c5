mod common;

use assert_matches::assert_matches;
use common::{context, logged_in, spawn_backend, unreachable_backend, MockState};
use presensi_client::report::ReportError;
use presensi_core::messages::REPORT_FAILED;
use presensi_core::report::{ReportFilter, ReportSummary};
use serde_json::json;

const REPORT: &str = "/api/reports/daily";

#[tokio::test]
async fn unfiltered_query_lists_everything() {
    let state = MockState::new();
    let url = spawn_backend(state.clone()).await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    let records = view.fetch().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].display_name(), Some("budi"));
    assert_eq!(records[0].latitude_value(), Some(-6.2));
    assert!(records[1].check_out.is_none());

    let sent = state.requests_to(REPORT);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer abc123"));
    assert!(sent[0].query.is_none());

    assert_eq!(
        view.summary(),
        ReportSummary {
            total: 2,
            with_location: 1,
            with_photo: 1,
            completed_checkout: 1,
        }
    );
    assert!(!view.is_loading());
}

#[tokio::test]
async fn filter_becomes_query_string() {
    let state = MockState::new();
    let url = spawn_backend(state.clone()).await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    let filter = ReportFilter::new()
        .with_nama("budi")
        .with_start_date("2024-01-01");
    let records = view.apply_filter(filter).await.unwrap();
    assert_eq!(records.len(), 1);

    view.apply_filter(ReportFilter::new().with_start_date("2024-01-01").with_nama("  "))
        .await
        .unwrap();

    let queries: Vec<_> = state
        .requests_to(REPORT)
        .into_iter()
        .map(|r| r.query)
        .collect();
    assert_eq!(
        queries,
        vec![
            Some("nama=budi&startDate=2024-01-01".to_string()),
            Some("startDate=2024-01-01".to_string()),
        ]
    );
}

#[tokio::test]
async fn full_date_range_is_sent_in_order() {
    let state = MockState::new();
    let url = spawn_backend(state.clone()).await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    let filter = ReportFilter::new()
        .with_end_date("2024-01-31")
        .with_start_date("2024-01-01")
        .with_nama("ani");
    view.apply_filter(filter).await.unwrap();

    let sent = state.requests_to(REPORT);
    assert_eq!(
        sent[0].query.as_deref(),
        Some("nama=ani&startDate=2024-01-01&endDate=2024-01-31")
    );
}

#[tokio::test]
async fn reset_is_idempotent() {
    let state = MockState::new();
    let url = spawn_backend(state.clone()).await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    view.apply_filter(ReportFilter::new().with_nama("budi"))
        .await
        .unwrap();
    assert_eq!(view.records().len(), 1);

    let first: Vec<_> = view.reset().await.unwrap().to_vec();
    let second: Vec<_> = view.reset().await.unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert!(view.filter().is_empty());

    let sent = state.requests_to(REPORT);
    assert_eq!(sent.len(), 3);
    assert!(sent[1].query.is_none());
    assert!(sent[2].query.is_none());
}

#[tokio::test]
async fn no_token_sends_nothing() {
    let state = MockState::new();
    let url = spawn_backend(state.clone()).await;
    let ctx = context(&url).await;
    let mut view = ctx.report_view();

    assert_matches!(view.fetch().await, Err(ReportError::Unauthenticated));
    assert_eq!(state.request_count(), 0);
}

#[tokio::test]
async fn server_failure_clears_previous_results() {
    let state = MockState::new();
    let url = spawn_backend(state.clone()).await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    view.fetch().await.unwrap();
    assert_eq!(view.records().len(), 2);

    state.set(&state.report, 403, json!({"message": "Akses ditolak"}));
    let err = view.fetch().await.unwrap_err();
    assert_matches!(err, ReportError::Query(ref m) if m == "Akses ditolak");
    assert!(view.records().is_empty());
    assert_eq!(view.error(), Some("Akses ditolak"));
    assert_eq!(view.summary(), ReportSummary::default());

    // A later success clears the error.
    state.set(&state.report, 200, json!({"data": []}));
    view.fetch().await.unwrap();
    assert!(view.error().is_none());
}

#[tokio::test]
async fn missing_data_field_is_an_empty_listing() {
    let state = MockState::new();
    state.set(&state.report, 200, json!({}));
    let url = spawn_backend(state).await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    assert!(view.fetch().await.unwrap().is_empty());
}

#[tokio::test]
async fn transport_failure_uses_generic_text() {
    let url = unreachable_backend().await;
    let ctx = logged_in(&url, "abc123").await;
    let mut view = ctx.report_view();

    assert_matches!(view.fetch().await, Err(ReportError::Query(ref m)) if m == REPORT_FAILED);
    assert_eq!(view.error(), Some(REPORT_FAILED));
}
