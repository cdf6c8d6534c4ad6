//! Ashen Veil — stage.
//!
//! Turns render plans into transport calls: the in-place animation protocol
//! and the director that walks a plan directive by directive, absorbing
//! transport failures at each step.

pub mod animation;
pub mod director;
