//! Interpreter configuration.

/// Portrait used when the player speaks but has not picked one.
pub const DEFAULT_PLAYER_PORTRAIT: &str = "images/characters/portraits/player_placeholder.png";

/// Configuration for the narrative interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Player name used until one is chosen.
    pub default_player_name: String,
    /// Portrait used for player lines when the player has none.
    pub default_portrait: String,
    /// Speaker name that never gets a nameplate (compared case-insensitively).
    pub narrator_speaker: String,
    /// Upper bound on consecutive auto-transitions through scenes with no
    /// dialogue, so a cycle of empty scenes cannot spin forever.
    pub max_auto_hops: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            default_player_name: "Player".to_string(),
            default_portrait: DEFAULT_PLAYER_PORTRAIT.to_string(),
            narrator_speaker: "Narrator".to_string(),
            max_auto_hops: 64,
        }
    }
}

impl InterpreterConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default player name.
    pub fn with_default_player_name(mut self, name: impl Into<String>) -> Self {
        self.default_player_name = name.into();
        self
    }

    /// Set the fallback player portrait.
    pub fn with_default_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.default_portrait = portrait.into();
        self
    }

    /// Set the narrator speaker name.
    pub fn with_narrator_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.narrator_speaker = speaker.into();
        self
    }

    /// Set the auto-transition hop limit (at least 1).
    pub fn with_max_auto_hops(mut self, hops: usize) -> Self {
        self.max_auto_hops = hops.max(1);
        self
    }
}
