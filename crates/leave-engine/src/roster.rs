//! Selectable player characters.

use crate::error::{SessionError, SessionResult};
use crate::interpreter::Interpreter;
use crate::world::PlayerProfile;

/// A cyclic list of characters the player can pick from.
#[derive(Debug, Clone)]
pub struct CharacterRoster {
    characters: Vec<PlayerProfile>,
    index: usize,
}

impl CharacterRoster {
    /// Create a roster positioned on its first character.
    pub fn new(characters: Vec<PlayerProfile>) -> SessionResult<Self> {
        if characters.is_empty() {
            return Err(SessionError::EmptyRoster);
        }
        Ok(Self {
            characters,
            index: 0,
        })
    }

    /// Move to the next character, wrapping around.
    pub fn next(&mut self) -> &PlayerProfile {
        self.index = (self.index + 1) % self.characters.len();
        self.current()
    }

    /// Move to the previous character, wrapping around.
    pub fn previous(&mut self) -> &PlayerProfile {
        self.index = self
            .index
            .checked_sub(1)
            .unwrap_or(self.characters.len() - 1);
        self.current()
    }

    /// The selected character.
    pub fn current(&self) -> &PlayerProfile {
        &self.characters[self.index]
    }

    /// Index of the selected character.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Always false; empty rosters cannot be built.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Select the character whose name matches, ignoring case.
    pub fn select(&mut self, name: &str) -> Option<&PlayerProfile> {
        let index = self
            .characters
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name.trim()))?;
        self.index = index;
        Some(self.current())
    }

    /// Iterate over all characters in order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerProfile> {
        self.characters.iter()
    }

    /// Make the selected character the interpreter's player.
    ///
    /// Returns false if the interpreter rejected the name.
    pub fn apply_to(&self, interpreter: &mut Interpreter) -> bool {
        let character = self.current();
        if !interpreter.set_player_name(&character.name) {
            return false;
        }
        interpreter.set_player_portrait(character.portrait_ref.as_deref().unwrap_or(""));
        true
    }
}
