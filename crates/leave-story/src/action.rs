//! Scene and choice actions.
//!
//! On the wire an action is a single token such as `ADD_ITEM_lantern` or
//! `SET_FLAG_metGhost`. Tokens are parsed once, when the story is loaded, into
//! the closed [`Action`] command set.

use std::fmt;

const ADD_ITEM: &str = "ADD_ITEM_";
const REMOVE_ITEM: &str = "REMOVE_ITEM_";
const SET_FLAG: &str = "SET_FLAG_";
const CLEAR_FLAG: &str = "CLEAR_FLAG_";

/// A side-effecting directive applied to the world state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Put an item into the player's inventory.
    AddItem(String),
    /// Take an item out of the player's inventory.
    RemoveItem(String),
    /// Set a story flag.
    SetFlag(String),
    /// Clear a story flag.
    ClearFlag(String),
    /// A token outside the built-in vocabulary, kept verbatim.
    ///
    /// Only produced when the story is loaded leniently.
    Custom(String),
}

impl Action {
    /// Parse a built-in action token.
    ///
    /// Returns `None` for unknown prefixes and for prefixes with an empty id.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (prefix, build): (&str, fn(String) -> Action) = if token.starts_with(ADD_ITEM) {
            (ADD_ITEM, Action::AddItem)
        } else if token.starts_with(REMOVE_ITEM) {
            (REMOVE_ITEM, Action::RemoveItem)
        } else if token.starts_with(SET_FLAG) {
            (SET_FLAG, Action::SetFlag)
        } else if token.starts_with(CLEAR_FLAG) {
            (CLEAR_FLAG, Action::ClearFlag)
        } else {
            return None;
        };

        let id = &token[prefix.len()..];
        if id.is_empty() {
            None
        } else {
            Some(build(id.to_string()))
        }
    }

    /// Parse a token, keeping unknown ones as [`Action::Custom`].
    pub fn parse_lenient(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|| Action::Custom(token.trim().to_string()))
    }

    /// Whether this is one of the built-in commands.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Action::Custom(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddItem(id) => write!(f, "{ADD_ITEM}{id}"),
            Action::RemoveItem(id) => write!(f, "{REMOVE_ITEM}{id}"),
            Action::SetFlag(id) => write!(f, "{SET_FLAG}{id}"),
            Action::ClearFlag(id) => write!(f, "{CLEAR_FLAG}{id}"),
            Action::Custom(token) => f.write_str(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_prefixes() {
        assert_eq!(
            Action::parse("ADD_ITEM_lantern"),
            Some(Action::AddItem("lantern".to_string()))
        );
        assert_eq!(
            Action::parse("REMOVE_ITEM_lantern"),
            Some(Action::RemoveItem("lantern".to_string()))
        );
        assert_eq!(
            Action::parse("SET_FLAG_metGhost"),
            Some(Action::SetFlag("metGhost".to_string()))
        );
        assert_eq!(
            Action::parse("CLEAR_FLAG_metGhost"),
            Some(Action::ClearFlag("metGhost".to_string()))
        );
    }

    #[test]
    fn ids_keep_inner_underscores() {
        assert_eq!(
            Action::parse("SET_FLAG_door_open"),
            Some(Action::SetFlag("door_open".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(Action::parse("DANCE"), None);
        assert_eq!(Action::parse("ADD_ITEM_"), None);
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("add_item_lantern"), None);
    }

    #[test]
    fn lenient_keeps_custom_tokens() {
        let action = Action::parse_lenient(" PLAY_SOUND_thunder ");
        assert_eq!(action, Action::Custom("PLAY_SOUND_thunder".to_string()));
        assert!(!action.is_builtin());
        assert!(Action::parse_lenient("SET_FLAG_x").is_builtin());
    }

    #[test]
    fn display_round_trips_tokens() {
        for token in ["ADD_ITEM_key", "CLEAR_FLAG_lit", "WHATEVER"] {
            assert_eq!(Action::parse_lenient(token).to_string(), token);
        }
    }
}
