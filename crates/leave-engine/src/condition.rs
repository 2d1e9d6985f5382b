//! Gating conditions for choices.

use leave_story::Choice;

use crate::world::WorldState;

/// A condition evaluated against the world state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Condition {
    /// Check if a story flag is set.
    HasFlag(String),
    /// Check if the player holds an item.
    HasItem(String),
    /// Logical AND.
    And(Vec<Condition>),
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// The gate a choice declares.
    pub fn for_choice(choice: &Choice) -> Self {
        let mut gates = Vec::new();
        if let Some(flag) = &choice.required_flag {
            gates.push(Condition::HasFlag(flag.clone()));
        }
        if let Some(item) = &choice.required_item {
            gates.push(Condition::HasItem(item.clone()));
        }
        match gates.len() {
            0 => Condition::Always,
            1 => gates.remove(0),
            _ => Condition::And(gates),
        }
    }

    /// Evaluate the condition against the current state.
    pub fn evaluate(&self, world: &WorldState) -> bool {
        match self {
            Condition::HasFlag(flag) => world.has_flag(flag),
            Condition::HasItem(item) => world.has_item(item),
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(world)),
            Condition::Always => true,
        }
    }
}

/// Whether a choice is shown in the current state.
pub fn is_visible(choice: &Choice, world: &WorldState) -> bool {
    Condition::for_choice(choice).evaluate(world)
}
