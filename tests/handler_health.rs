mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{TestAppBuilder, test_app};

#[tokio::test]
async fn test_health_check_success() {
    let app = test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["storage"]["status"], "ok");
    assert_eq!(body["checks"]["click_queue"]["status"], "ok");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_queue_capacity() {
    let app = TestAppBuilder::new().queue_capacity(500).build();

    let body = app.server.get("/health").await.json::<Value>();

    assert_eq!(body["checks"]["click_queue"]["message"], "Capacity: 500/500");
}

#[tokio::test]
async fn test_health_degraded_when_queue_closed() {
    let mut app = TestAppBuilder::new().without_worker().build();
    drop(app.pending.take());

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = response.json::<Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["click_queue"]["status"], "error");
    assert_eq!(body["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_health_is_not_a_short_code() {
    let app = test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    assert!(response.headers().get("location").is_none());
}
