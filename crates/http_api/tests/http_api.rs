use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;

use app_api::AppContext;
use insights_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};
use insights_core::{EventStatus, UsageEvent};

use http_api::HttpState;

struct TestApp {
    _temp_dir: tempfile::TempDir,
    app_state: AppState,
    shutdown: CancellationToken,
    router: axum::Router,
}

fn build_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::new(temp_dir.path().to_path_buf());
    ensure_app_data_dir(&paths).expect("ensure app data dir");
    let app_state = AppState::new(AppConfig::new(paths.db_path));
    app_state.setup_db().expect("setup db");

    let context = AppContext {
        app_state: app_state.clone(),
    };
    let shutdown = CancellationToken::new();
    let router = http_api::router(HttpState::new(context, shutdown.clone()));

    TestApp {
        _temp_dir: temp_dir,
        app_state,
        shutdown,
        router,
    }
}

fn recent_event(tool_id: &str, model: &str, ok: bool, minutes_ago: i64) -> UsageEvent {
    UsageEvent {
        tool_id: tool_id.to_string(),
        model: Some(model.to_string()),
        user_id: Some("user-7".to_string()),
        status: if ok {
            EventStatus::Success
        } else {
            EventStatus::Error
        },
        response_time_ms: Some(800),
        tokens_used: Some(250),
        cost: Some(0.0025),
        error_type: (!ok).then(|| "Timeout".to_string()),
        created_at: Some(Utc::now() - Duration::minutes(minutes_ago)),
    }
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(content_type.contains("application/json"), "{content_type}");
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("json");
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_app();
    let (status, json) = get_json(app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn analytics_aggregates_filtered_events() {
    let app = build_app();
    let mut db = app.app_state.open_db().expect("open db");
    db.upsert_tool("titles", "Titles").expect("tool");
    db.insert_usage_events(&[
        recent_event("titles", "gpt-4o", true, 5),
        recent_event("titles", "gpt-4o", false, 10),
        recent_event("icp-maker", "gpt-4o", true, 15),
    ])
    .expect("insert events");

    let (status, json) = get_json(app.router, "/analytics?timeRange=1h&tools=titles").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["overview"]["totalRequests"], 2);
    assert_eq!(json["overview"]["failedRequests"], 1);
    assert_eq!(json["timeSeriesData"].as_array().expect("series").len(), 12);
    assert_eq!(json["toolMetrics"][0]["toolName"], "Titles");
    assert_eq!(json["toolMetrics"][0]["successRate"], 50);
    assert_eq!(json["toolMetrics"][0]["errors"][0]["type"], "Timeout");
    let alert = &json["alerts"][0];
    assert_eq!(alert["id"], "high-error-rate");
    assert_eq!(alert["type"], "error");
}

#[tokio::test]
async fn analytics_defaults_to_demo_data() {
    let app = build_app();

    let (status, json) = get_json(app.router, "/analytics?timeRange=bogus").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timeSeriesData"].as_array().expect("series").len(), 24);
    assert_eq!(json["alerts"][0]["id"], "demo-data");
    assert_eq!(json["alerts"][0]["type"], "info");
}

#[tokio::test]
async fn shutdown_cancels_analytics() {
    let app = build_app();
    app.shutdown.cancel();

    let (status, json) = get_json(app.router, "/analytics").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], 503);
    assert_eq!(json["code"], "request_cancelled");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = build_app();
    let (status, json) = get_json(app.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "not_found");
    assert_eq!(json["status"], 404);
    assert_eq!(json["message"], "no route for /nope");
}
