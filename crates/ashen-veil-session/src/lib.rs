//! Ashen Veil — session lifecycle.
//!
//! Owns the process-wide session table, the flat-file snapshot gateway and
//! the command handlers that start, reset, advance, save and load stories.

pub mod application;
pub mod domain;
pub mod snapshot;
pub mod store;
