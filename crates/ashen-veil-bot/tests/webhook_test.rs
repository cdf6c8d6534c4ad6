//! Integration tests for the Telegram webhook.

mod common;

use ashen_veil_bot::handlers::{EXPIRED_NOTICE, TALK_USAGE};
use ashen_veil_core::ids::ChatId;
use ashen_veil_narrative::domain::acts::Act;
use ashen_veil_test_support::Sent;
use axum::http::StatusCode;
use serde_json::json;

fn message_update(update_id: i64, chat: i64, sender: i64, text: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "chat": {"id": chat, "type": "private"},
            "from": {"id": sender, "is_bot": false, "first_name": "Ada"},
            "text": text
        }
    })
}

fn callback_update(update_id: i64, chat: i64, sender: i64, token: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb-{update_id}"),
            "from": {"id": sender},
            "message": {"message_id": 50, "chat": {"id": chat}},
            "data": token
        }
    })
}

#[tokio::test]
async fn test_start_command_acknowledges_and_renders_opening() {
    // Arrange
    let bot = common::build_test_bot();

    // Act
    let (status, json) = common::post_json(
        bot.app(),
        "/telegram/webhook",
        &message_update(1, 10, 10, "/start@AshenVeilBot"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    common::wait_for(&bot.transport, |t| {
        t.count(|s| matches!(s, Sent::Prompt { .. })) == 1
    })
    .await;
    let session = bot.state.sessions.get(ChatId(10)).unwrap();
    assert_eq!(session.act(), Act::Act1);
}

#[tokio::test]
async fn test_button_press_is_acknowledged_then_applied() {
    // Arrange
    let bot = common::build_test_bot();
    common::post_json(bot.app(), "/telegram/webhook", &message_update(1, 10, 10, "/start")).await;
    common::wait_for(&bot.transport, |t| t.count(|s| matches!(s, Sent::Prompt { .. })) == 1).await;

    // Act
    let (status, _) =
        common::post_json(bot.app(), "/telegram/webhook", &callback_update(2, 10, 10, "a1_pkg")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    common::wait_for(&bot.transport, |t| t.count(|s| matches!(s, Sent::Prompt { .. })) == 2).await;
    let sent = bot.transport.sent();
    let answered = sent
        .iter()
        .position(|s| matches!(s, Sent::CallbackAnswered { callback_id } if callback_id == "cb-2"))
        .unwrap();
    let first_prompt = sent.iter().position(|s| matches!(s, Sent::Prompt { .. })).unwrap();
    let second_prompt = sent.iter().rposition(|s| matches!(s, Sent::Prompt { .. })).unwrap();
    assert!(first_prompt < answered && answered < second_prompt);
    assert_eq!(bot.state.sessions.get(ChatId(10)).unwrap().act(), Act::Act2);
}

#[tokio::test]
async fn test_button_without_session_reports_expiry() {
    // Arrange
    let bot = common::build_test_bot();

    // Act
    common::post_json(bot.app(), "/telegram/webhook", &callback_update(1, 77, 77, "a1_pkg")).await;

    // Assert
    common::wait_for(&bot.transport, |t| {
        t.displayed_texts().iter().any(|text| text == EXPIRED_NOTICE)
    })
    .await;
    assert!(bot.state.sessions.get(ChatId(77)).is_none());
}

#[tokio::test]
async fn test_talk_without_message_returns_usage() {
    // Arrange
    let bot = common::build_test_bot();

    // Act
    common::post_json(bot.app(), "/telegram/webhook", &message_update(1, 5, 5, "/talk merrick")).await;

    // Assert
    common::wait_for(&bot.transport, |t| {
        t.displayed_texts().iter().any(|text| text == TALK_USAGE)
    })
    .await;
}

#[tokio::test]
async fn test_plain_text_and_unknown_commands_are_ignored() {
    // Arrange
    let bot = common::build_test_bot();

    // Act
    let (plain, _) =
        common::post_json(bot.app(), "/telegram/webhook", &message_update(1, 5, 5, "hello")).await;
    let (unknown, _) =
        common::post_json(bot.app(), "/telegram/webhook", &message_update(2, 5, 5, "/pin")).await;
    common::post_json(bot.app(), "/telegram/webhook", &message_update(3, 5, 5, "/talk")).await;

    // Assert
    assert_eq!(plain, StatusCode::OK);
    assert_eq!(unknown, StatusCode::OK);
    common::wait_for(&bot.transport, |t| !t.sent().is_empty()).await;
    assert_eq!(bot.transport.displayed_texts(), vec![TALK_USAGE.to_owned()]);
}
