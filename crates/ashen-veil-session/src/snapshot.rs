//! Persistence gateway for the session table.
//!
//! The whole table is written as one JSON object keyed by chat id text and
//! rewritten in full on every save. A missing file means no prior sessions.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ashen_veil_core::ids::ChatId;
use ashen_veil_narrative::domain::aggregates::Session;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Failure reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file could not be read or written.
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file did not contain a valid session table.
    #[error("snapshot format invalid: {0}")]
    Format(#[from] serde_json::Error),
}

/// Durable store for the full session table.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Writes `sessions`, replacing whatever was stored before.
    async fn save(&self, sessions: &BTreeMap<ChatId, Session>) -> Result<(), SnapshotError>;

    /// Reads the stored table. Returns an empty table when nothing was saved.
    async fn load(&self) -> Result<BTreeMap<ChatId, Session>, SnapshotError>;
}

/// Snapshot store backed by a single pretty-printed JSON file.
///
/// Writes go to a staging file next to the target and are renamed over it.
/// Saves through one store (or its clones) never overlap, so the staging
/// file has a single writer.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
    writing: Arc<Mutex<()>>,
}

impl JsonFileSnapshotStore {
    /// Creates a store writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writing: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn save(&self, sessions: &BTreeMap<ChatId, Session>) -> Result<(), SnapshotError> {
        let body = serde_json::to_vec_pretty(sessions)?;
        let staging = self.path.with_extension("json.tmp");
        let _writing = self.writing.lock().await;
        tokio::fs::write(&staging, &body).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        debug!(path = %self.path.display(), sessions = sessions.len(), "Snapshot written");
        Ok(())
    }

    async fn load(&self) -> Result<BTreeMap<ChatId, Session>, SnapshotError> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot file, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use ashen_veil_core::ids::UserId;

    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_returns_empty_table() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("sessions.json"));

        // Act
        let loaded = store.load().await.unwrap();

        // Assert
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_file_is_keyed_by_chat_id_text() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("sessions.json"));
        let sessions = BTreeMap::from([(
            ChatId(-1001),
            Session::new(ChatId(-1001), UserId(3), None),
        )]);

        // Act
        store.save(&sessions).await.unwrap();

        // Assert
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["-1001"]["act"], "act1");
        assert_eq!(raw["-1001"]["owner_id"], 3);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_reports_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, b"{not json").unwrap();
        let store = JsonFileSnapshotStore::new(path);

        let result = store.load().await;

        assert!(matches!(result, Err(SnapshotError::Format(_))));
    }

    #[tokio::test]
    async fn test_concurrent_saves_leave_a_readable_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("sessions.json"));
        let tables: Vec<BTreeMap<ChatId, Session>> = (1..=8)
            .map(|size| {
                (0..size)
                    .map(|chat| (ChatId(chat), Session::new(ChatId(chat), UserId(chat), None)))
                    .collect()
            })
            .collect();

        for _ in 0..25 {
            // Act
            let saves: Vec<_> = tables
                .iter()
                .cloned()
                .map(|table| {
                    let store = store.clone();
                    tokio::spawn(async move { store.save(&table).await })
                })
                .collect();
            for save in saves {
                save.await.unwrap().unwrap();
            }

            // Assert
            let loaded = store.load().await.unwrap();
            assert!(tables.contains(&loaded));
        }
    }
}
