//! Inbound event handlers.
//!
//! Each webhook update becomes one [`Inbound`] event, handled to completion
//! on its own task. An event takes its place in the chat's queue before the
//! task is spawned and holds its turn for the whole render, so a second
//! button press waits for the first scene to finish. `/talk` never queues:
//! a slow generator must not hold up the story.

use ashen_veil_core::error::DomainError;
use ashen_veil_core::ids::ChatId;
use ashen_veil_core::transport::TextStyle;
use ashen_veil_narrative::domain::render::Outcome;
use ashen_veil_session::application::command_handlers::{
    handle_dispatch_action, handle_load_snapshot, handle_reset_story, handle_save_snapshot,
    handle_start_story,
};
use ashen_veil_session::application::query_handlers::get_session_by_chat;
use ashen_veil_session::domain::commands::{
    DispatchAction, LoadSnapshot, ResetStory, SaveSnapshot, StartStory,
};
use ashen_veil_session::store::{ChatTicket, ChatTurn};
use ashen_veil_telegram::inbound::{ButtonInput, CommandInput, Inbound};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, instrument};
use uuid::Uuid;

use crate::state::AppState;

/// Sent when a handler fails or panics.
pub const STUTTER_NOTICE: &str = "The story stutters. Please /reset and try again.";
/// Sent when a button is pressed in a chat without a session.
pub const EXPIRED_NOTICE: &str = "Session expired. Use /start to begin again.";
/// Sent for a `/talk` without both an NPC name and a message.
pub const TALK_USAGE: &str = "Usage: /talk <npc> <message>";
/// Sent by `/state` in a chat without a session.
pub const NO_SESSION_NOTICE: &str = "No story in progress. Use /start to begin.";
/// Sent after `/reset`.
pub const RESET_NOTICE: &str = "The rain washes the slate clean. Use /start to return to Crestfall.";
/// Sent by `/help`.
pub const HELP_TEXT: &str = "🌧 *The Ashen Veil*\n\
    /start — begin (or restart) the story\n\
    /reset — abandon the current story\n\
    /state — show where the story stands\n\
    /talk <npc> <message> — speak to someone in Crestfall\n\
    /save — save every story now\n\
    /load — reload the saved stories\n\
    /help — show this message";

/// The slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Reset,
    State,
    Talk,
    Save,
    Load,
    Help,
}

impl BotCommand {
    /// Looks up a command by its lower-cased name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "reset" => Some(Self::Reset),
            "state" => Some(Self::State),
            "talk" => Some(Self::Talk),
            "save" => Some(Self::Save),
            "load" => Some(Self::Load),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Splits `/talk` arguments into the NPC name and the rest of the message.
/// Returns `None` unless both are present.
#[must_use]
pub fn parse_talk(args: &str) -> Option<(&str, &str)> {
    let (npc, utterance) = args.trim().split_once(char::is_whitespace)?;
    let utterance = utterance.trim();
    if utterance.is_empty() {
        return None;
    }
    Some((npc, utterance))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Handles `inbound` on its own task. The event's place in the chat's queue
/// is taken before this returns. If the handler returns an error or panics,
/// the failure is logged and the chat gets [`STUTTER_NOTICE`].
pub fn spawn_supervised(state: AppState, inbound: Inbound) -> JoinHandle<()> {
    let chat_id = inbound.chat_id();
    let span = info_span!("inbound", %chat_id);
    let ticket = enqueue(&state, &inbound);

    let worker = {
        let state = state.clone();
        tokio::spawn(
            async move { handle_queued(&state, inbound, ticket).await }.instrument(span.clone()),
        )
    };

    tokio::spawn(
        async move {
            let failure = match worker.await {
                Ok(Ok(())) => return,
                Ok(Err(e)) => e.to_string(),
                Err(join_error) if join_error.is_panic() => format!("handler panicked: {join_error}"),
                Err(join_error) => format!("handler aborted: {join_error}"),
            };
            error!(%chat_id, error = %failure, "Inbound handler failed");
            state.director.say(chat_id, STUTTER_NOTICE, TextStyle::Plain).await;
        }
        .instrument(span),
    )
}

/// Handles one inbound event to completion.
///
/// # Errors
///
/// Returns a `DomainError` for failures not already turned into a chat
/// message.
pub async fn handle_inbound(state: &AppState, inbound: Inbound) -> Result<(), DomainError> {
    let ticket = enqueue(state, &inbound);
    handle_queued(state, inbound, ticket).await
}

/// Every event except `/talk` queues behind the chat's earlier events.
fn enqueue(state: &AppState, inbound: &Inbound) -> Option<ChatTicket> {
    match inbound {
        Inbound::Command(input) if BotCommand::parse(&input.name) == Some(BotCommand::Talk) => None,
        _ => Some(state.sessions.enqueue(inbound.chat_id())),
    }
}

async fn take_turn(ticket: Option<ChatTicket>) -> Option<ChatTurn> {
    match ticket {
        Some(ticket) => Some(ticket.turn().await),
        None => None,
    }
}

async fn handle_queued(
    state: &AppState,
    inbound: Inbound,
    ticket: Option<ChatTicket>,
) -> Result<(), DomainError> {
    match inbound {
        Inbound::Command(input) => {
            let _turn = take_turn(ticket).await;
            handle_command(state, input).await
        }
        Inbound::Button(input) => handle_button(state, input, ticket).await,
    }
}

async fn handle_command(state: &AppState, input: CommandInput) -> Result<(), DomainError> {
    let Some(command) = BotCommand::parse(&input.name) else {
        debug!(chat_id = %input.chat_id, name = %input.name, "Ignoring unknown command");
        return Ok(());
    };

    match command {
        BotCommand::Start => start(state, &input).await,
        BotCommand::Reset => reset(state, input.chat_id).await,
        BotCommand::State => show_state(state, input.chat_id).await?,
        BotCommand::Talk => talk(state, input.chat_id, &input.args).await,
        BotCommand::Save => save(state, input.chat_id).await,
        BotCommand::Load => load(state, input.chat_id).await,
        BotCommand::Help => {
            state
                .director
                .say(input.chat_id, HELP_TEXT, TextStyle::Markdown)
                .await;
        }
    }
    Ok(())
}

#[instrument(skip(state, input), fields(chat_id = %input.chat_id))]
async fn start(state: &AppState, input: &CommandInput) {
    let command = StartStory {
        correlation_id: Uuid::new_v4(),
        chat_id: input.chat_id,
        owner_id: input.sender_id,
    };
    info!(correlation_id = %command.correlation_id, "Starting story");

    let plan = handle_start_story(&command, state.clock.as_ref(), &state.sessions);
    autosave(state, input.chat_id).await;
    state.director.perform(input.chat_id, &plan).await;
}

#[instrument(skip(state))]
async fn reset(state: &AppState, chat_id: ChatId) {
    let command = ResetStory {
        correlation_id: Uuid::new_v4(),
        chat_id,
    };
    if handle_reset_story(&command, &state.sessions) {
        autosave(state, chat_id).await;
    }
    state.director.say(chat_id, RESET_NOTICE, TextStyle::Plain).await;
}

async fn show_state(state: &AppState, chat_id: ChatId) -> Result<(), DomainError> {
    let view = match get_session_by_chat(chat_id, &state.sessions) {
        Ok(view) => view,
        Err(DomainError::SessionNotFound(_)) => {
            state.director.say(chat_id, NO_SESSION_NOTICE, TextStyle::Plain).await;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let dump = serde_json::to_string_pretty(&view)
        .map_err(|e| DomainError::Infrastructure(format!("session view: {e}")))?;
    state.director.say(chat_id, &dump, TextStyle::Plain).await;
    Ok(())
}

#[instrument(skip(state, args))]
async fn talk(state: &AppState, chat_id: ChatId, args: &str) {
    let Some((npc, utterance)) = parse_talk(args) else {
        state.director.say(chat_id, TALK_USAGE, TextStyle::Plain).await;
        return;
    };

    if let Err(e) = state.director.transport().send_typing(chat_id).await {
        debug!(error = %e, "Typing indicator failed");
    }
    let session = state.sessions.get(chat_id);
    let line = state.npc.reply(npc, utterance, session.as_ref()).await;
    info!(npc, strategy = state.npc.kind(), "NPC replied");

    let reply = format!("{}: {line}", capitalize(npc));
    state.director.say(chat_id, &reply, TextStyle::Plain).await;
}

#[instrument(skip(state))]
async fn save(state: &AppState, chat_id: ChatId) {
    let command = SaveSnapshot {
        correlation_id: Uuid::new_v4(),
        chat_id,
    };
    let text = match handle_save_snapshot(&command, &state.sessions, state.snapshots.as_ref()).await
    {
        Ok(count) => format!("💾 Saved {count} session(s)."),
        Err(_) => "💾 Save failed. Your story is still held in memory.".to_owned(),
    };
    state.director.say(chat_id, &text, TextStyle::Plain).await;
}

#[instrument(skip(state))]
async fn load(state: &AppState, chat_id: ChatId) {
    let command = LoadSnapshot {
        correlation_id: Uuid::new_v4(),
        chat_id,
    };
    let text = match handle_load_snapshot(&command, &state.sessions, state.snapshots.as_ref()).await
    {
        Ok(count) => format!("📂 Loaded {count} session(s)."),
        Err(_) => "📂 Load failed. Nothing was changed.".to_owned(),
    };
    state.director.say(chat_id, &text, TextStyle::Plain).await;
}

#[instrument(skip(state, input, ticket), fields(chat_id = %input.chat_id, token = %input.token))]
async fn handle_button(
    state: &AppState,
    input: ButtonInput,
    ticket: Option<ChatTicket>,
) -> Result<(), DomainError> {
    // The place in the queue is already held, so acknowledging first cannot
    // reorder presses.
    let transport = state.director.transport();
    if let Err(e) = transport.answer_callback(&input.callback_id).await {
        debug!(error = %e, "Callback acknowledgement failed");
    }

    let _turn = take_turn(ticket).await;

    let command = DispatchAction {
        correlation_id: Uuid::new_v4(),
        chat_id: input.chat_id,
        sender_id: input.sender_id,
        token: input.token.clone(),
    };
    let plan = match handle_dispatch_action(&command, &state.sessions) {
        Ok(plan) => plan,
        Err(DomainError::SessionNotFound(_)) => {
            info!(correlation_id = %command.correlation_id, "Button pressed without a session");
            if let Err(e) = transport
                .edit_text(input.chat_id, input.message_id, EXPIRED_NOTICE, TextStyle::Plain)
                .await
            {
                debug!(error = %e, "Could not edit expired prompt; sending instead");
                state.director.say(input.chat_id, EXPIRED_NOTICE, TextStyle::Plain).await;
            }
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if matches!(plan.outcome, Outcome::Applied(_)) {
        autosave(state, input.chat_id).await;
    } else {
        info!(correlation_id = %command.correlation_id, "Button not valid for the current scene");
    }
    state.director.perform(input.chat_id, &plan).await;
    Ok(())
}

async fn autosave(state: &AppState, chat_id: ChatId) {
    if !state.autosave {
        return;
    }
    let command = SaveSnapshot {
        correlation_id: Uuid::new_v4(),
        chat_id,
    };
    // Failures are logged by the handler; the in-memory table stays authoritative.
    let _ = handle_save_snapshot(&command, &state.sessions, state.snapshots.as_ref()).await;
}
