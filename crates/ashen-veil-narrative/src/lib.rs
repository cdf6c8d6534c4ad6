//! Ashen Veil — story state machine.
//!
//! Responsible for acts, scenes, flags and evidence, the transition table
//! that maps a pressed button to its side effects, and the fixed scripts of
//! render directives each scene produces. Nothing in this crate performs
//! I/O: a dispatch returns a [`domain::render::RenderPlan`] that a director
//! executes against a transport.

pub mod domain;
