// tests/test_api_parsing.rs
//! Raw Graph wire fixtures through the parsing layer: page shapes, cursor
//! extraction, stringly-typed metrics, and error classification.

use ads2report::api::parser::parse_response;
use ads2report::api::{ApiResponse, PageResponse};
use ads2report::error::{AppError, GraphErrorCode};
use ads2report::model::{EntityRecord, InsightRow};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;

fn ok(body: &str) -> ApiResponse<String> {
    ApiResponse {
        data: body.to_string(),
        status: StatusCode::OK,
        url: "https://graph.facebook.com/v22.0/test".to_string(),
    }
}

#[test]
fn campaign_page_parses_with_cursor_and_continuation() {
    let body = r#"{
        "data": [
            {"id": "23850001", "name": "Spring Launch", "status": "ACTIVE", "objective": "OUTCOME_SALES"},
            {"id": "23850002", "name": "Retargeting", "status": "PAUSED", "objective": "OUTCOME_TRAFFIC"}
        ],
        "paging": {
            "cursors": {"before": "QVFIU", "after": "QVFIV"},
            "next": "https://graph.facebook.com/v22.0/act_123/campaigns?after=QVFIV"
        }
    }"#;

    let page: PageResponse<EntityRecord> = parse_response(ok(body)).unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(
        page.data[1].get("name"),
        Some(&serde_json::json!("Retargeting"))
    );
    // Requested-field order survives into the record.
    let keys: Vec<&String> = page.data[0].keys().collect();
    assert_eq!(keys, vec!["id", "name", "status", "objective"]);

    assert!(page.has_more());
    assert_eq!(page.continuation_cursor().unwrap(), Some("QVFIV".to_string()));
}

#[test]
fn final_page_reports_no_continuation() {
    let body = r#"{
        "data": [{"id": "23850003", "name": "Evergreen"}],
        "paging": {"cursors": {"before": "AAA", "after": "BBB"}}
    }"#;

    let page: PageResponse<EntityRecord> = parse_response(ok(body)).unwrap();
    assert!(!page.has_more());
    assert_eq!(page.continuation_cursor().unwrap(), None);
}

#[test]
fn next_without_cursor_violates_the_contract() {
    let body = r#"{
        "data": [{"id": "1"}],
        "paging": {"next": "https://graph.facebook.com/v22.0/act_123/ads?after=lost"}
    }"#;

    let page: PageResponse<EntityRecord> = parse_response(ok(body)).unwrap();
    assert!(matches!(
        page.continuation_cursor(),
        Err(AppError::Pagination(_))
    ));
}

#[test]
fn insight_page_parses_stringly_typed_metrics_and_actions() {
    // Numeric metrics arrive as JSON strings on the wire.
    let body = r#"{
        "data": [{
            "ad_id": "120001",
            "ad_name": "Spring Sale Video",
            "spend": "247.83",
            "impressions": "104201",
            "reach": "88000",
            "frequency": "1.184103",
            "clicks": "3120",
            "unique_clicks": "2950",
            "actions": [
                {"action_type": "link_click", "value": "2800"},
                {"action_type": "offsite_conversion.fb_pixel_purchase", "value": "31"}
            ],
            "video_p25_watched_actions": [
                {"action_type": "video_view", "value": "5400"}
            ],
            "date_start": "2024-01-01",
            "date_stop": "2024-01-31"
        }],
        "paging": {"cursors": {"before": "A", "after": "B"}}
    }"#;

    let page: PageResponse<InsightRow> = parse_response(ok(body)).unwrap();
    let row = &page.data[0];

    assert_eq!(row.spend(), 247.83);
    assert_eq!(row.impressions(), 104_201);
    assert_eq!(row.reach, Some(88_000));
    assert_eq!(row.clicks(), 3_120);
    assert_eq!(row.actions().len(), 2);
    assert_eq!(row.actions()[1].value, 31.0);
    assert_eq!(
        row.video_p25_watched_actions.as_ref().unwrap()[0].value,
        5400.0
    );
    // Untyped fields survive in the overflow map.
    assert_eq!(
        row.extra.get("date_stop"),
        Some(&serde_json::json!("2024-01-31"))
    );
}

#[test]
fn permission_error_body_classifies_without_retry() {
    let response = ApiResponse {
        data: r#"{
            "error": {
                "message": "(#200) Requires ads_read permission",
                "type": "OAuthException",
                "code": 200,
                "fbtrace_id": "Axxxx"
            }
        }"#
        .to_string(),
        status: StatusCode::FORBIDDEN,
        url: "https://graph.facebook.com/v22.0/act_123/ads".to_string(),
    };

    let err = parse_response::<PageResponse<EntityRecord>>(response).unwrap_err();
    match err {
        AppError::GraphService { code, message, status } => {
            assert_eq!(code, GraphErrorCode::PermissionDenied);
            assert_eq!(message, "(#200) Requires ads_read permission");
            assert_eq!(status, StatusCode::FORBIDDEN);
        }
        other => panic!("expected GraphService, got {:?}", other),
    }
}

#[test]
fn bodyless_429_still_counts_as_a_throttle() {
    let response = ApiResponse {
        data: String::new(),
        status: StatusCode::TOO_MANY_REQUESTS,
        url: "https://graph.facebook.com/v22.0/act_123/insights".to_string(),
    };

    let err = parse_response::<PageResponse<InsightRow>>(response).unwrap_err();
    assert!(err.is_retryable());
    assert!(err.is_rate_limited());
}

#[test]
fn truncated_success_body_is_malformed_not_a_panic() {
    let err = parse_response::<PageResponse<EntityRecord>>(ok(r#"{"data": [{"id": "1""#))
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
}
