//! Integration tests for the session inspection endpoint.

mod common;

use ashen_veil_bot::handlers::handle_inbound;
use axum::http::StatusCode;

#[tokio::test]
async fn test_get_session_returns_view_after_progress() {
    // Arrange
    let bot = common::build_test_bot();
    handle_inbound(&bot.state, common::command(-1001, 7, "start", "")).await.unwrap();
    handle_inbound(&bot.state, common::button(-1001, 7, "a1_docks")).await.unwrap();
    handle_inbound(&bot.state, common::button(-1001, 7, "a2_forest")).await.unwrap();

    // Act
    let (status, json) = common::get_json(bot.app(), "/sessions/-1001").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["chat_id"], -1001);
    assert_eq!(json["owner_id"], 7);
    assert_eq!(json["act"], "act3");
    assert_eq!(json["scene"], "investigate");
    assert_eq!(json["flags"]["met_merrick"], true);
    assert_eq!(json["evidence"], serde_json::json!(["forest_disturbance"]));
    assert_eq!(json["started_at"], "2026-01-15T10:00:00Z");
}

#[tokio::test]
async fn test_get_missing_session_returns_404() {
    let bot = common::build_test_bot();

    let (status, json) = common::get_json(bot.app(), "/sessions/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "session_not_found");
}

#[tokio::test]
async fn test_get_session_with_invalid_id_returns_400() {
    let bot = common::build_test_bot();

    let (status, json) = common::get_json(bot.app(), "/sessions/not-a-chat").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
