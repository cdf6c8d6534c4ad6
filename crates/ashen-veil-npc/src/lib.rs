//! Ashen Veil — NPC dialogue.
//!
//! `/talk` replies come from one of two strategies chosen once at startup:
//! a keyword-bucketed template pool with no external dependencies, or an
//! external text generator that falls back to the templates on any failure.

pub mod generator;
pub mod openai;
pub mod responder;
pub mod template;
