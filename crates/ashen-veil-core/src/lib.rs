//! Ashen Veil Core — shared abstractions.
//!
//! This crate defines the identifiers, error types and ports (transport,
//! pacing, time, randomness) that every other crate depends on. It contains
//! no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod ids;
pub mod pacer;
pub mod rng;
pub mod transport;
