//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_200_with_status_ok() {
    let bot = common::build_test_bot();

    let (status, json) = common::get_json(bot.app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["npc"], "template");
    assert_eq!(json["sessions"], 0);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let bot = common::build_test_bot();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/nonexistent")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(bot.app(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
