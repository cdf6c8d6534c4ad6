//! Ashen Veil — Telegram adapter.
//!
//! Implements the chat transport port on top of the Telegram Bot API and
//! turns webhook updates into commands and button presses.

pub mod client;
pub mod inbound;
pub mod types;
