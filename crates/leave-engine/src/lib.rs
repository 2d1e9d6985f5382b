//! Narrative interpreter for the Leave visual novel engine.
//!
//! Runs a [`leave_story::StoryDocument`]: tracks the player's scene,
//! inventory and flags, walks each scene's dialogue, gates choices on
//! flags and items, applies actions and detects outcomes. Presentation is
//! left to the caller, which polls the interpreter's queries and feeds it
//! intents.

/// Gating conditions for choices.
pub mod condition;
/// Interpreter configuration.
pub mod config;
/// Dialogue cursor and line resolution.
pub mod dialogue;
/// Error types for the interpreter.
pub mod error;
/// Action handlers.
pub mod handler;
/// The narrative state machine.
pub mod interpreter;
/// Selectable player characters.
pub mod roster;
/// Lock-guarded shared interpreter.
pub mod shared;
/// Placeholder substitution.
pub mod text;
/// Session state.
pub mod world;

pub use config::InterpreterConfig;
pub use dialogue::{CurrentLine, DialogueSequencer, ResolvedLine, resolve_line};
pub use error::{SessionError, SessionResult};
pub use handler::{ActionHandler, BuiltinActions};
pub use interpreter::{Interaction, Interpreter, SessionState};
pub use roster::CharacterRoster;
pub use shared::SharedInterpreter;
pub use text::substitute;
pub use world::{PlayerProfile, WorldState};
