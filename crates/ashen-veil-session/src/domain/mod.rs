//! Commands accepted by the session context.

pub mod commands;
