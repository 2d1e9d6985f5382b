//! Error types for the narrative interpreter.

use leave_story::LoadError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that stop a session from starting.
///
/// Everything that can go wrong once a game is running (dangling scene ids,
/// underspecified choices, unknown actions) is logged and absorbed instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No story has been loaded.
    #[error("no story loaded")]
    NoStory,

    /// The story's start scene is empty or not among its scenes.
    #[error("start scene \"{0}\" is not defined")]
    MissingStartScene(String),

    /// A character roster needs at least one entry.
    #[error("character roster is empty")]
    EmptyRoster,

    /// The story could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
}
