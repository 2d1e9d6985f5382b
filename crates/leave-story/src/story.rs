//! The immutable story document model.

use std::collections::BTreeMap;

use crate::action::Action;

/// Placeholder used when a document does not declare one.
pub const DEFAULT_PLAYER_PLACEHOLDER: &str = "{playerName}";

/// Scene ids starting with this prefix mark a finished ending when they have
/// no further continuation.
pub const ENDING_SCENE_PREFIX: &str = "ending";

/// A loaded story. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryDocument {
    /// Display title of the game.
    pub title: String,
    /// Scene the player starts in.
    pub start_scene_id: String,
    /// Token replaced with the player's name in displayed text.
    pub player_name_placeholder: String,
    /// All scenes by id.
    pub scenes: BTreeMap<String, Scene>,
    /// All outcomes by id.
    pub outcomes: BTreeMap<String, Outcome>,
}

impl StoryDocument {
    /// Create an empty story starting at `start_scene_id`.
    pub fn new(title: impl Into<String>, start_scene_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start_scene_id: start_scene_id.into(),
            player_name_placeholder: DEFAULT_PLAYER_PLACEHOLDER.to_string(),
            scenes: BTreeMap::new(),
            outcomes: BTreeMap::new(),
        }
    }

    /// Set the player name placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.player_name_placeholder = placeholder.into();
        self
    }

    /// Add a scene, keyed by its id.
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scenes.insert(scene.id.clone(), scene);
        self
    }

    /// Add an outcome under `id`.
    pub fn with_outcome(mut self, id: impl Into<String>, outcome: Outcome) -> Self {
        self.outcomes.insert(id.into(), outcome);
        self
    }

    /// Look up a scene.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Look up an outcome.
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.get(id)
    }

    /// The start scene, if it exists.
    pub fn start_scene(&self) -> Option<&Scene> {
        self.scenes.get(&self.start_scene_id)
    }
}

/// What happens once a scene's dialogue has been read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Continuation<'a> {
    /// The player picks one of these choices.
    Choices(&'a [Choice]),
    /// The story moves on to this scene by itself.
    AutoTransition(&'a str),
    /// The scene resolves to this outcome.
    Outcome(&'a str),
    /// A scene with no continuation whose id marks it as an ending.
    Ending,
    /// A scene with no continuation at all.
    DeadEnd,
}

/// A node in the story graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Scene id, equal to its key in [`StoryDocument::scenes`].
    pub id: String,
    /// Lines shown in order when the scene is entered.
    pub dialogue: Vec<DialogueLine>,
    /// Choices offered once the dialogue is done, in on-screen order.
    pub choices: Vec<Choice>,
    /// Scene to move to automatically when there are no choices.
    pub auto_transition_to: Option<String>,
    /// Outcome reached when there are no choices and no auto-transition.
    pub outcome: Option<String>,
    /// Applied once, when the scene is entered.
    pub action: Option<Action>,
    /// Banner text for ending scenes.
    pub ending_title: Option<String>,
    /// Narration shown outside the dialogue box.
    pub text: Option<String>,
    /// Background image reference.
    pub background_image: Option<String>,
    /// Background music reference.
    pub background_music: Option<String>,
    /// Objects the player can interact with.
    pub interactive_objects: Vec<InteractiveObject>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Append a dialogue line.
    pub fn with_line(mut self, line: DialogueLine) -> Self {
        self.dialogue.push(line);
        self
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set the auto-transition target.
    pub fn with_auto_transition(mut self, scene_id: impl Into<String>) -> Self {
        self.auto_transition_to = Some(scene_id.into());
        self
    }

    /// Set the outcome.
    pub fn with_outcome(mut self, outcome_id: impl Into<String>) -> Self {
        self.outcome = Some(outcome_id.into());
        self
    }

    /// Set the entry action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an interactive object.
    pub fn with_object(mut self, object: InteractiveObject) -> Self {
        self.interactive_objects.push(object);
        self
    }

    /// The scene's primary continuation.
    ///
    /// Choices win over an auto-transition, which wins over an outcome.
    pub fn continuation(&self) -> Continuation<'_> {
        if !self.choices.is_empty() {
            Continuation::Choices(&self.choices)
        } else if let Some(next) = &self.auto_transition_to {
            Continuation::AutoTransition(next)
        } else if let Some(outcome) = &self.outcome {
            Continuation::Outcome(outcome)
        } else if self.id.starts_with(ENDING_SCENE_PREFIX) {
            Continuation::Ending
        } else {
            Continuation::DeadEnd
        }
    }

    /// Number of continuations the scene declares.
    pub fn continuation_count(&self) -> usize {
        usize::from(!self.choices.is_empty())
            + usize::from(self.auto_transition_to.is_some())
            + usize::from(self.outcome.is_some())
    }

    /// Look up an interactive object by id.
    pub fn object(&self, id: &str) -> Option<&InteractiveObject> {
        self.interactive_objects.iter().find(|o| o.id == id)
    }
}

/// One line of dialogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueLine {
    /// Who speaks; `None` or `"Narrator"` means no nameplate.
    pub speaker: Option<String>,
    /// The line itself, possibly containing the player placeholder.
    pub text: String,
    /// Portrait shown next to the line.
    pub portrait_ref: Option<String>,
    /// Presentation style hint.
    pub style: Option<String>,
}

impl DialogueLine {
    /// Create an unattributed line.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the speaker.
    pub fn spoken_by(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Set the portrait.
    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait_ref = Some(portrait.into());
        self
    }
}

/// A player-selectable edge out of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choice {
    /// Label shown to the player.
    pub text: String,
    /// Scene to move to.
    pub next_scene_id: Option<String>,
    /// Outcome to resolve to.
    pub outcome_id: Option<String>,
    /// Applied when the choice is made.
    pub action: Option<Action>,
    /// Hidden unless this flag is set.
    pub required_flag: Option<String>,
    /// Hidden unless this item is held.
    pub required_item: Option<String>,
}

impl Choice {
    /// A choice leading to another scene.
    pub fn to_scene(text: impl Into<String>, scene_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_scene_id: Some(scene_id.into()),
            ..Self::default()
        }
    }

    /// A choice resolving to an outcome.
    pub fn to_outcome(text: impl Into<String>, outcome_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome_id: Some(outcome_id.into()),
            ..Self::default()
        }
    }

    /// Set the action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Gate the choice on a flag.
    pub fn requires_flag(mut self, flag: impl Into<String>) -> Self {
        self.required_flag = Some(flag.into());
        self
    }

    /// Gate the choice on an item.
    pub fn requires_item(mut self, item: impl Into<String>) -> Self {
        self.required_item = Some(item.into());
        self
    }
}

/// A terminal or semi-terminal resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Message shown to the player.
    pub message: String,
    /// Scene to continue with; `None` means the outcome is final.
    pub next_scene_id: Option<String>,
    /// Image shown with the message.
    pub image_path: Option<String>,
    /// Audio played with the message.
    pub audio_path: Option<String>,
}

impl Outcome {
    /// A final outcome.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Continue with `scene_id` after this outcome.
    pub fn then(mut self, scene_id: impl Into<String>) -> Self {
        self.next_scene_id = Some(scene_id.into());
        self
    }

    /// Whether nothing follows this outcome.
    pub fn is_final(&self) -> bool {
        self.next_scene_id.is_none()
    }
}

/// Something in a scene the player can interact with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractiveObject {
    /// Object id, unique within its scene.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Image reference.
    pub image_path: Option<String>,
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
    /// Item needed to interact.
    pub required_item: Option<String>,
    /// Applied on interaction.
    pub action_on_interact: Option<Action>,
    /// Item handed to the player on interaction.
    pub yields_item: Option<String>,
    /// Whether the object disappears after one interaction.
    pub consumed_on_interact: bool,
}

impl InteractiveObject {
    /// Create an object with no requirements or effects.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Require an item.
    pub fn requires_item(mut self, item: impl Into<String>) -> Self {
        self.required_item = Some(item.into());
        self
    }

    /// Hand an item to the player.
    pub fn yields(mut self, item: impl Into<String>) -> Self {
        self.yields_item = Some(item.into());
        self
    }

    /// Set the interaction action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.action_on_interact = Some(action);
        self
    }

    /// Make the object single-use.
    pub fn consumed(mut self) -> Self {
        self.consumed_on_interact = true;
        self
    }
}
