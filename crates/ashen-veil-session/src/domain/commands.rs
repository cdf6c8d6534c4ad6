//! Commands for the session context.

use ashen_veil_core::command::Command;
use ashen_veil_core::ids::{ChatId, UserId};
use uuid::Uuid;

/// Command to start (or restart) the story in a chat.
#[derive(Debug, Clone)]
pub struct StartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The chat the story runs in.
    pub chat_id: ChatId,
    /// The user who issued the command.
    pub owner_id: UserId,
}

impl Command for StartStory {
    fn command_type(&self) -> &'static str {
        "session.start_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

/// Command to discard the story in a chat.
#[derive(Debug, Clone)]
pub struct ResetStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The chat whose session is removed.
    pub chat_id: ChatId,
}

impl Command for ResetStory {
    fn command_type(&self) -> &'static str {
        "session.reset_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

/// Command to apply a pressed button to a chat's story.
#[derive(Debug, Clone)]
pub struct DispatchAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The chat whose session advances.
    pub chat_id: ChatId,
    /// The user who pressed the button.
    pub sender_id: UserId,
    /// Raw callback payload.
    pub token: String,
}

impl Command for DispatchAction {
    fn command_type(&self) -> &'static str {
        "session.dispatch_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

/// Command to write the whole session table to the snapshot store.
#[derive(Debug, Clone)]
pub struct SaveSnapshot {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The chat that asked for the save.
    pub chat_id: ChatId,
}

impl Command for SaveSnapshot {
    fn command_type(&self) -> &'static str {
        "session.save_snapshot"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

/// Command to replace the session table with the snapshot store's contents.
#[derive(Debug, Clone)]
pub struct LoadSnapshot {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The chat that asked for the load.
    pub chat_id: ChatId,
}

impl Command for LoadSnapshot {
    fn command_type(&self) -> &'static str {
        "session.load_snapshot"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}
