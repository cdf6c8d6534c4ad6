//! Shared test helpers for bot integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ashen_veil_core::clock::Clock;
use ashen_veil_core::ids::{ChatId, MessageId, UserId};
use ashen_veil_npc::generator::{GenerationError, TextGenerator};
use ashen_veil_npc::responder::NpcResponder;
use ashen_veil_npc::template::TemplateResponder;
use ashen_veil_session::snapshot::{JsonFileSnapshotStore, SnapshotStore};
use ashen_veil_session::store::SessionTable;
use ashen_veil_stage::director::Director;
use ashen_veil_telegram::inbound::{ButtonInput, CommandInput, Inbound};
use ashen_veil_test_support::{FixedClock, MockRng, RecordingTransport};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use ashen_veil_bot::app;
use ashen_veil_bot::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// A bot wired to recording doubles and a snapshot file in a temp directory.
pub struct TestBot {
    pub state: AppState,
    pub transport: Arc<RecordingTransport>,
    pub snapshot_dir: TempDir,
}

impl TestBot {
    /// The router, as served by `main.rs`.
    pub fn app(&self) -> Router {
        app(self.state.clone())
    }

    /// Path of the snapshot file used by autosave.
    pub fn snapshot_path(&self) -> std::path::PathBuf {
        self.snapshot_dir.path().join("sessions.json")
    }
}

/// Template NPCs, autosave on.
pub fn build_test_bot() -> TestBot {
    build_test_bot_with(template_npc(), true)
}

/// Custom NPC strategy and autosave setting.
pub fn build_test_bot_with(npc: NpcResponder, autosave: bool) -> TestBot {
    let snapshot_dir = TempDir::new().unwrap();
    let snapshots: Arc<dyn SnapshotStore> = Arc::new(JsonFileSnapshotStore::new(
        snapshot_dir.path().join("sessions.json"),
    ));
    build_test_bot_on(npc, snapshots, autosave, snapshot_dir)
}

/// Fully custom wiring.
pub fn build_test_bot_on(
    npc: NpcResponder,
    snapshots: Arc<dyn SnapshotStore>,
    autosave: bool,
    snapshot_dir: TempDir,
) -> TestBot {
    build_test_bot_over(RecordingTransport::new(), npc, snapshots, autosave, snapshot_dir)
}

/// Template NPCs and no autosave over a preconfigured transport.
pub fn build_test_bot_with_transport(transport: RecordingTransport) -> TestBot {
    let snapshot_dir = TempDir::new().unwrap();
    let snapshots: Arc<dyn SnapshotStore> = Arc::new(JsonFileSnapshotStore::new(
        snapshot_dir.path().join("sessions.json"),
    ));
    build_test_bot_over(transport, template_npc(), snapshots, false, snapshot_dir)
}

fn build_test_bot_over(
    transport: RecordingTransport,
    npc: NpcResponder,
    snapshots: Arc<dyn SnapshotStore>,
    autosave: bool,
    snapshot_dir: TempDir,
) -> TestBot {
    let transport = Arc::new(transport);
    let director = Director::new(transport.clone(), Arc::new(transport.pacer()));
    let state = AppState::new(
        Arc::new(SessionTable::new()),
        director,
        Arc::new(npc),
        snapshots,
        fixed_clock(),
        autosave,
    );
    TestBot {
        state,
        transport,
        snapshot_dir,
    }
}

pub fn template_npc() -> NpcResponder {
    NpcResponder::Template(TemplateResponder::new(Box::new(MockRng)))
}

/// A generator that counts calls and always answers with `line`.
#[derive(Debug, Default)]
pub struct CountingGenerator {
    pub calls: AtomicUsize,
    pub line: String,
}

impl CountingGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn generate(
        &self,
        _npc_name: &str,
        _utterance: &str,
        _context: Option<&str>,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.line.clone())
    }
}

pub fn command(chat: i64, sender: i64, name: &str, args: &str) -> Inbound {
    Inbound::Command(CommandInput {
        chat_id: ChatId(chat),
        sender_id: UserId(sender),
        name: name.to_owned(),
        args: args.to_owned(),
    })
}

pub fn button(chat: i64, sender: i64, token: &str) -> Inbound {
    Inbound::Button(ButtonInput {
        callback_id: format!("cb-{token}"),
        chat_id: ChatId(chat),
        sender_id: UserId(sender),
        message_id: MessageId(999),
        token: token.to_owned(),
    })
}

/// Polls until `done` holds for the recording transport, or panics after two
/// seconds. Webhook work runs on spawned tasks.
pub async fn wait_for(transport: &RecordingTransport, done: impl Fn(&RecordingTransport) -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !done(transport) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out; transport saw {:?}",
            transport.sent()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
