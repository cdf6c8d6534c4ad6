//! Webhook update parsing.

use ashen_veil_core::ids::{ChatId, MessageId, UserId};

use crate::types::Update;

/// A slash command typed in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInput {
    /// Chat the command was typed in.
    pub chat_id: ChatId,
    /// Sender.
    pub sender_id: UserId,
    /// Lower-cased command name without the slash or `@botname` suffix.
    pub name: String,
    /// Everything after the command, trimmed.
    pub args: String,
}

/// A pressed inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonInput {
    /// Identifier to acknowledge.
    pub callback_id: String,
    /// Chat carrying the button.
    pub chat_id: ChatId,
    /// Who pressed it.
    pub sender_id: UserId,
    /// Message carrying the button.
    pub message_id: MessageId,
    /// Payload attached to the button.
    pub token: String,
}

/// What an update asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A slash command.
    Command(CommandInput),
    /// A button press.
    Button(ButtonInput),
}

impl Inbound {
    /// The chat the event came from.
    #[must_use]
    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Command(input) => input.chat_id,
            Self::Button(input) => input.chat_id,
        }
    }
}

/// Splits `/name@bot rest` into `("name", "rest")`. Returns `None` for text
/// that is not a command.
#[must_use]
pub fn split_command(text: &str) -> Option<(String, String)> {
    let rest = text.trim_start().strip_prefix('/')?;
    let (head, args) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    Some((name.to_lowercase(), args.trim().to_owned()))
}

impl Update {
    /// Interprets the update. Updates without a command or button (plain
    /// text, edits, channel posts) yield `None`.
    #[must_use]
    pub fn into_inbound(self) -> Option<Inbound> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(Inbound::Button(ButtonInput {
                callback_id: query.id,
                chat_id: ChatId(message.chat.id),
                sender_id: UserId(query.from.id),
                message_id: MessageId(message.message_id),
                token: query.data.unwrap_or_default(),
            }));
        }

        let message = self.message?;
        let sender = message.from?;
        let (name, args) = split_command(message.text.as_deref()?)?;
        Some(Inbound::Command(CommandInput {
            chat_id: ChatId(message.chat.id),
            sender_id: UserId(sender.id),
            name,
            args,
        }))
    }
}
