//! Session state of a running game.

use std::collections::{BTreeSet, HashSet};

/// The player's chosen identity.
///
/// Picked before a game starts and kept across restarts; every new
/// [`WorldState`] copies it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    /// Name substituted for the story's placeholder.
    pub name: String,
    /// Portrait shown when the player speaks.
    pub portrait_ref: Option<String>,
}

impl PlayerProfile {
    /// Create a profile with no portrait.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            portrait_ref: None,
        }
    }
}

/// Mutable state of one play session.
///
/// Owned by the interpreter; the presentation layer only ever sees it by
/// shared reference. Action handlers receive it mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    pub(crate) current_scene_id: String,
    pub(crate) player_name: String,
    pub(crate) player_portrait_ref: Option<String>,
    inventory: BTreeSet<String>,
    flags: BTreeSet<String>,
    pub(crate) terminal: bool,
    pub(crate) current_outcome_id: Option<String>,
    consumed_objects: HashSet<(String, String)>,
}

impl WorldState {
    /// Fresh state at `start_scene_id` for `profile`.
    pub fn new(start_scene_id: impl Into<String>, profile: &PlayerProfile) -> Self {
        Self {
            current_scene_id: start_scene_id.into(),
            player_name: profile.name.clone(),
            player_portrait_ref: profile.portrait_ref.clone(),
            inventory: BTreeSet::new(),
            flags: BTreeSet::new(),
            terminal: false,
            current_outcome_id: None,
            consumed_objects: HashSet::new(),
        }
    }

    /// The scene the player is in.
    pub fn current_scene_id(&self) -> &str {
        &self.current_scene_id
    }

    /// The player's name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// The player's portrait, if one was chosen.
    pub fn player_portrait_ref(&self) -> Option<&str> {
        self.player_portrait_ref.as_deref()
    }

    /// Whether the session has reached an outcome.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The outcome reached, if any.
    pub fn current_outcome_id(&self) -> Option<&str> {
        self.current_outcome_id.as_deref()
    }

    /// Items held, in id order.
    pub fn inventory(&self) -> impl Iterator<Item = &str> {
        self.inventory.iter().map(String::as_str)
    }

    /// Flags set, in id order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    /// Check if the player holds an item.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }

    /// Add an item. Returns false if it was already held.
    pub fn add_item(&mut self, item: impl Into<String>) -> bool {
        self.inventory.insert(item.into())
    }

    /// Remove an item. Returns false if it was not held.
    pub fn remove_item(&mut self, item: &str) -> bool {
        self.inventory.remove(item)
    }

    /// Check if a flag is set.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Set a flag. Returns false if it was already set.
    pub fn set_flag(&mut self, flag: impl Into<String>) -> bool {
        self.flags.insert(flag.into())
    }

    /// Clear a flag. Returns false if it was not set.
    pub fn clear_flag(&mut self, flag: &str) -> bool {
        self.flags.remove(flag)
    }

    pub(crate) fn is_consumed(&self, scene_id: &str, object_id: &str) -> bool {
        self.consumed_objects
            .contains(&(scene_id.to_string(), object_id.to_string()))
    }

    pub(crate) fn consume(&mut self, scene_id: &str, object_id: &str) {
        self.consumed_objects
            .insert((scene_id.to_string(), object_id.to_string()));
    }
}
