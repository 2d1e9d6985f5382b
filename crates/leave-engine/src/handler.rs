//! Applying actions to the world state.

use leave_story::Action;
use tracing::{debug, warn};

use crate::world::WorldState;

/// Applies story actions to the world state.
///
/// Injected into the interpreter so the action vocabulary can be extended
/// without touching the state machine. Implementations must not block.
pub trait ActionHandler: Send {
    /// Apply `action` to `world`.
    fn apply(&self, action: &Action, world: &mut WorldState);
}

impl<F> ActionHandler for F
where
    F: Fn(&Action, &mut WorldState) + Send,
{
    fn apply(&self, action: &Action, world: &mut WorldState) {
        self(action, world)
    }
}

/// The built-in action vocabulary.
///
/// Custom tokens are logged and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinActions;

impl ActionHandler for BuiltinActions {
    fn apply(&self, action: &Action, world: &mut WorldState) {
        match action {
            Action::AddItem(item) => {
                world.add_item(item.as_str());
            }
            Action::RemoveItem(item) => {
                if !world.remove_item(item) {
                    debug!(item = %item, "removed item was not held");
                }
            }
            Action::SetFlag(flag) => {
                world.set_flag(flag.as_str());
            }
            Action::ClearFlag(flag) => {
                world.clear_flag(flag);
            }
            Action::Custom(token) => {
                warn!(token = %token, "unrecognized action ignored");
                return;
            }
        }
        debug!(action = %action, "applied action");
    }
}
