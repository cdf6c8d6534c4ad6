//! The Ashen Veil bot server entry point.

use ashen_veil_bot::config::BotConfig;
use ashen_veil_bot::error::AppError;
use ashen_veil_bot::state::AppState;
use ashen_veil_bot::{app, telemetry};
use ashen_veil_core::ids::ChatId;
use ashen_veil_session::application::command_handlers::handle_load_snapshot;
use ashen_veil_session::domain::commands::LoadSnapshot;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Configuration first: a missing token is fatal before anything starts.
    let config = BotConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(?config, "Starting The Ashen Veil bot");

    let app_state = AppState::from_config(&config)?;
    tracing::info!(npc = app_state.npc.kind(), "NPC strategy selected");

    // Restore saved sessions, attributed to chat 0. A missing file starts empty.
    let restore = LoadSnapshot {
        correlation_id: Uuid::new_v4(),
        chat_id: ChatId(0),
    };
    if let Err(e) =
        handle_load_snapshot(&restore, &app_state.sessions, app_state.snapshots.as_ref()).await
    {
        tracing::warn!(error = %e, "Starting with an empty session table");
    }

    let router = app(app_state);

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
