//! Story documents for the Leave narrative engine.
//!
//! This crate defines the immutable story model (scenes, dialogue, choices,
//! outcomes), the closed set of actions a story can trigger, and the loader
//! that turns a JSON story resource into a [`StoryDocument`]. It knows
//! nothing about a running game; see `leave-engine` for that.

/// Scene and choice actions.
pub mod action;
/// Error types used throughout the crate.
pub mod error;
/// Loading story documents from JSON.
pub mod loader;
/// The story document model.
pub mod story;
/// Content checks for a loaded story.
pub mod validate;

mod wire;

/// Re-export the action command set.
pub use action::Action;
/// Re-export error types.
pub use error::{LoadError, LoadResult};
/// Re-export loader entry points.
pub use loader::{
    LoadOptions, load_path, load_path_with, load_reader, load_reader_with, load_str,
    load_str_with,
};
/// Re-export story model types.
pub use story::{
    Choice, Continuation, DialogueLine, InteractiveObject, Outcome, Scene, StoryDocument,
};
/// Re-export validation entry points.
pub use validate::{Severity, ValidationIssue, check_story};
