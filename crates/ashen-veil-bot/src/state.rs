//! Shared application state.

use std::sync::Arc;

use ashen_veil_core::clock::{Clock, SystemClock};
use ashen_veil_core::pacer::TokioPacer;
use ashen_veil_core::rng::SystemRng;
use ashen_veil_npc::openai::OpenAiChatGenerator;
use ashen_veil_npc::responder::NpcResponder;
use ashen_veil_npc::template::TemplateResponder;
use ashen_veil_session::snapshot::{JsonFileSnapshotStore, SnapshotStore};
use ashen_veil_session::store::SessionTable;
use ashen_veil_stage::director::Director;
use ashen_veil_telegram::client::TelegramTransport;
use reqwest::Client;

use crate::config::BotConfig;
use crate::error::AppError;

/// Application state shared across all request handlers and spawned tasks.
#[derive(Clone)]
pub struct AppState {
    /// Every live story session, keyed by chat.
    pub sessions: Arc<SessionTable>,
    /// Renders plans through the chat transport.
    pub director: Director,
    /// NPC strategy chosen at startup.
    pub npc: Arc<NpcResponder>,
    /// Where the session table is saved.
    pub snapshots: Arc<dyn SnapshotStore>,
    /// Clock for session timestamps.
    pub clock: Arc<dyn Clock>,
    /// Save the table after every mutating command.
    pub autosave: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("director", &self.director)
            .field("npc", &self.npc.kind())
            .field("autosave", &self.autosave)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        sessions: Arc<SessionTable>,
        director: Director,
        npc: Arc<NpcResponder>,
        snapshots: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        autosave: bool,
    ) -> Self {
        Self {
            sessions,
            director,
            npc,
            snapshots,
            clock,
            autosave,
        }
    }

    /// Wires the production adapters described by `config`. The session
    /// table starts empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Client` if the HTTP client cannot be built.
    pub fn from_config(config: &BotConfig) -> Result<Self, AppError> {
        let client = Client::builder().build()?;

        let transport = TelegramTransport::new(
            client.clone(),
            &config.telegram_api_url,
            &config.bot_token,
        );
        let director = Director::new(Arc::new(transport), Arc::new(TokioPacer));

        let template = TemplateResponder::new(Box::new(SystemRng));
        let npc = match &config.openai {
            Some(openai) => NpcResponder::Generated {
                generator: Arc::new(OpenAiChatGenerator::new(
                    client,
                    openai.base_url.clone(),
                    openai.api_key.clone(),
                    openai.model.clone(),
                )),
                timeout: config.npc_timeout,
                fallback: template,
            },
            None => NpcResponder::Template(template),
        };

        Ok(Self::new(
            Arc::new(SessionTable::new()),
            director,
            Arc::new(npc),
            Arc::new(JsonFileSnapshotStore::new(config.sessions_path.clone())),
            Arc::new(SystemClock),
            config.autosave,
        ))
    }
}
