//! Domain model for the story.

pub mod actions;
pub mod acts;
pub mod aggregates;
pub mod events;
pub mod flags;
pub mod render;
pub mod scenes;
pub mod scripts;
pub mod story;
