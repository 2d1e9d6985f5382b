//! The narrative interpreter.
//!
//! [`Interpreter`] owns the loaded story, the world state of the running game
//! and the dialogue cursor. The presentation layer polls its queries and
//! drives it with intents: advance the dialogue, pick a choice, continue past
//! an outcome.
//!
//! Content bugs found at runtime (a choice pointing at a missing scene, an
//! outcome id nobody defined) never surface as errors. They are logged and
//! the session stays where it was.

use std::path::Path;
use std::sync::Arc;

use leave_story::{
    Choice, Continuation, InteractiveObject, LoadOptions, Outcome, Scene, StoryDocument,
    story::DEFAULT_PLAYER_PLACEHOLDER,
};
use tracing::{debug, error, info, instrument, warn};

use crate::condition::is_visible;
use crate::config::InterpreterConfig;
use crate::dialogue::{CurrentLine, DialogueSequencer, ResolvedLine, resolve_line};
use crate::error::{SessionError, SessionResult};
use crate::handler::{ActionHandler, BuiltinActions};
use crate::text::substitute;
use crate::world::{PlayerProfile, WorldState};

/// Coarse state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No game is running.
    Idle,
    /// A game is running and has not reached an outcome.
    Playing,
    /// The game has reached an outcome.
    Resolved,
}

/// Result of interacting with a scene object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The interaction happened.
    Done {
        /// Item handed to the player, if any.
        yielded: Option<String>,
    },
    /// The player lacks the item the object needs.
    Locked {
        /// The missing item.
        required_item: String,
    },
    /// No such object here, it was used up, or no game is running.
    Unavailable,
}

/// Runs one story for one player.
pub struct Interpreter {
    story: Option<Arc<StoryDocument>>,
    config: InterpreterConfig,
    handler: Box<dyn ActionHandler>,
    profile: PlayerProfile,
    world: Option<WorldState>,
    dialogue: DialogueSequencer,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with the default configuration and actions.
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Create an interpreter with a custom configuration.
    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            story: None,
            profile: PlayerProfile::new(config.default_player_name.clone()),
            config,
            handler: Box::new(BuiltinActions),
            world: None,
            dialogue: DialogueSequencer::default(),
        }
    }

    /// Replace the action handler.
    pub fn with_handler(mut self, handler: impl ActionHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Loading and starting
    // -----------------------------------------------------------------------

    /// Load a story file and bind it.
    pub fn load_story_from(&mut self, path: impl AsRef<Path>) -> SessionResult<()> {
        self.load_story_from_with(path, &LoadOptions::default())
    }

    /// Load a story file with explicit options and bind it.
    ///
    /// On failure the previously bound story, if any, stays bound.
    pub fn load_story_from_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> SessionResult<()> {
        let story = leave_story::load_path_with(path, options)?;
        self.load_story(story);
        Ok(())
    }

    /// Bind a loaded story.
    ///
    /// Any running game is discarded; call [`start_game`](Self::start_game)
    /// to play.
    pub fn load_story(&mut self, story: impl Into<Arc<StoryDocument>>) {
        let story = story.into();
        info!(title = %story.title, "story bound");
        let placeholder = story.player_name_placeholder.as_str();
        if !placeholder.is_empty() && self.profile.name.contains(placeholder) {
            warn!(
                name = %self.profile.name,
                placeholder,
                "player name contains the new placeholder; using the default name"
            );
            self.profile.name.clone_from(&self.config.default_player_name);
        }
        self.story = Some(story);
        self.world = None;
        self.dialogue = DialogueSequencer::default();
    }

    /// The bound story.
    pub fn story(&self) -> Option<&Arc<StoryDocument>> {
        self.story.as_ref()
    }

    /// Start a new game from the story's start scene.
    ///
    /// Any previous session is thrown away: inventory, flags and outcome
    /// start empty. The player profile is kept.
    #[instrument(skip(self), fields(player = %self.profile.name))]
    pub fn start_game(&mut self) -> SessionResult<()> {
        let story = self.story.clone().ok_or(SessionError::NoStory)?;
        let start = story.start_scene_id.as_str();
        if start.trim().is_empty() || story.scene(start).is_none() {
            return Err(SessionError::MissingStartScene(start.to_string()));
        }

        self.world = Some(WorldState::new(start, &self.profile));
        self.dialogue = DialogueSequencer::default();
        info!(title = %story.title, scene = start, "game started");

        self.enter_scene(start, 0, false);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Player profile
    // -----------------------------------------------------------------------

    /// Set the player's name.
    ///
    /// Blank names and names containing the story's placeholder are
    /// rejected and the previous name is kept. Returns whether the name was
    /// accepted.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            warn!(current = %self.profile.name, "blank player name rejected");
            return false;
        }
        let placeholder = self.placeholder();
        if !placeholder.is_empty() && name.contains(placeholder) {
            warn!(name, placeholder, "player name containing the placeholder rejected");
            return false;
        }

        self.profile.name = name.to_string();
        if let Some(world) = self.world.as_mut() {
            world.player_name = name.to_string();
        }
        true
    }

    /// Set the player's portrait; a blank reference clears it.
    pub fn set_player_portrait(&mut self, portrait: &str) {
        let portrait = Some(portrait.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        if let Some(world) = self.world.as_mut() {
            world.player_portrait_ref.clone_from(&portrait);
        }
        self.profile.portrait_ref = portrait;
    }

    /// The player's name.
    pub fn player_name(&self) -> &str {
        &self.profile.name
    }

    /// The player's profile.
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Coarse state of the session.
    pub fn state(&self) -> SessionState {
        match &self.world {
            None => SessionState::Idle,
            Some(world) if world.terminal => SessionState::Resolved,
            Some(_) => SessionState::Playing,
        }
    }

    /// The world state of the running game.
    pub fn world(&self) -> Option<&WorldState> {
        self.world.as_ref()
    }

    /// Id of the current scene.
    pub fn current_scene_id(&self) -> Option<&str> {
        self.world.as_ref().map(WorldState::current_scene_id)
    }

    /// The current scene.
    pub fn current_scene(&self) -> Option<&Scene> {
        let story = self.story.as_ref()?;
        story.scene(self.current_scene_id()?)
    }

    /// The current scene's primary continuation.
    pub fn continuation(&self) -> Option<Continuation<'_>> {
        self.current_scene().map(Scene::continuation)
    }

    /// The dialogue line under the cursor.
    pub fn current_dialogue_line(&self) -> CurrentLine<'_> {
        self.dialogue.current()
    }

    /// The current line with speaker, portrait and player name resolved.
    pub fn resolved_line(&self) -> Option<ResolvedLine> {
        let world = self.world.as_ref()?;
        let line = self.dialogue.current().line()?;
        Some(resolve_line(line, world, self.placeholder(), &self.config))
    }

    /// The dialogue cursor.
    pub fn dialogue(&self) -> &DialogueSequencer {
        &self.dialogue
    }

    /// Choices of the current scene the player may pick, in order.
    ///
    /// Empty when the scene has no choices or every choice is gated.
    pub fn visible_choices(&self) -> Vec<&Choice> {
        let (Some(world), Some(scene)) = (self.world.as_ref(), self.current_scene()) else {
            return Vec::new();
        };
        scene
            .choices
            .iter()
            .filter(|choice| is_visible(choice, world))
            .collect()
    }

    /// Objects of the current scene that have not been used up.
    pub fn visible_objects(&self) -> Vec<&InteractiveObject> {
        let (Some(world), Some(scene)) = (self.world.as_ref(), self.current_scene()) else {
            return Vec::new();
        };
        scene
            .interactive_objects
            .iter()
            .filter(|object| !world.is_consumed(&scene.id, &object.id))
            .collect()
    }

    /// Whether the session has reached an outcome.
    pub fn is_terminal(&self) -> bool {
        self.world.as_ref().is_some_and(WorldState::is_terminal)
    }

    /// The outcome reached, if any.
    pub fn current_outcome(&self) -> Option<&Outcome> {
        let id = self.world.as_ref()?.current_outcome_id()?;
        self.story.as_ref()?.outcome(id)
    }

    /// Check if the player holds an item.
    pub fn has_item(&self, item: &str) -> bool {
        self.world.as_ref().is_some_and(|w| w.has_item(item))
    }

    /// Check if a flag is set.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.world.as_ref().is_some_and(|w| w.has_flag(flag))
    }

    /// Replace the story's placeholder with the player's name.
    pub fn process_text(&self, raw: &str) -> String {
        substitute(raw, self.placeholder(), &self.profile.name)
    }

    fn placeholder(&self) -> &str {
        self.story
            .as_ref()
            .map_or(DEFAULT_PLAYER_PLACEHOLDER, |s| {
                s.player_name_placeholder.as_str()
            })
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Move to another scene.
    ///
    /// Unknown ids are logged and leave the session where it is. A scene
    /// whose continuation is an outcome resolves right away; a scene with no
    /// dialogue runs its continuation right away.
    pub fn advance_to_scene(&mut self, scene_id: &str) {
        self.enter_scene(scene_id, 0, true);
    }

    /// Step past the current dialogue line.
    ///
    /// On the step that exhausts the dialogue the scene's continuation runs:
    /// an auto-transition moves on, an outcome resolves, choices wait for
    /// [`make_choice`](Self::make_choice).
    pub fn advance_dialogue(&mut self) {
        if self.world.is_none() {
            debug!("advance ignored: no game running");
            return;
        }
        if !self.dialogue.advance() || self.is_terminal() {
            return;
        }
        let Some(story) = self.story.clone() else {
            return;
        };
        if let Some(scene) = story.scene(self.dialogue.scene_id()) {
            self.run_continuation(scene, 0);
        }
    }

    /// Apply a choice.
    ///
    /// Ignored unless a game is running and not resolved. The choice action
    /// runs first; then an outcome resolves, or else the next scene is
    /// entered.
    pub fn make_choice(&mut self, choice: &Choice) {
        if self.state() != SessionState::Playing {
            debug!(choice = %choice.text, "choice ignored: not playing");
            return;
        }
        info!(choice = %choice.text, "player chose");

        if let Some(action) = &choice.action {
            self.apply_action(action);
        }
        if let Some(outcome) = &choice.outcome_id {
            self.resolve(outcome);
        } else if let Some(next) = &choice.next_scene_id {
            self.advance_to_scene(next);
        } else {
            warn!(
                choice = %choice.text,
                scene = ?self.current_scene_id(),
                "choice has neither a next scene nor an outcome"
            );
        }
    }

    /// Pick the `index`-th visible choice. Returns false if there is none.
    pub fn choose(&mut self, index: usize) -> bool {
        let Some(choice) = self.visible_choices().get(index).map(|c| (*c).clone()) else {
            warn!(index, "no visible choice at index");
            return false;
        };
        self.make_choice(&choice);
        true
    }

    /// Leave the resolved state, keeping inventory and flags.
    pub fn reset_terminal(&mut self) {
        match self.world.as_mut() {
            Some(world) if world.terminal => {
                world.terminal = false;
                world.current_outcome_id = None;
                debug!("terminal state cleared");
            }
            _ => debug!("reset ignored: not resolved"),
        }
    }

    /// Continue into the scene that follows the current outcome.
    ///
    /// Returns whether the player is now in that scene. Final outcomes
    /// return false and leave the session resolved.
    pub fn continue_after_outcome(&mut self) -> bool {
        let Some(next) = self.current_outcome().and_then(|o| o.next_scene_id.clone()) else {
            return false;
        };
        let known = self.story.as_ref().is_some_and(|s| s.scene(&next).is_some());
        if !known {
            warn!(scene = %next, "cannot continue: scene after outcome not found");
            return false;
        }
        self.reset_terminal();
        self.advance_to_scene(&next);
        self.current_scene_id() == Some(next.as_str())
    }

    /// Interact with an object in the current scene.
    pub fn interact(&mut self, object_id: &str) -> Interaction {
        if self.state() != SessionState::Playing {
            return Interaction::Unavailable;
        }
        let Some(story) = self.story.clone() else {
            return Interaction::Unavailable;
        };
        let Some(scene) = self.current_scene_id().and_then(|id| story.scene(id)) else {
            return Interaction::Unavailable;
        };
        let Some(object) = scene.object(object_id) else {
            warn!(scene = %scene.id, object = object_id, "no such object in scene");
            return Interaction::Unavailable;
        };
        let Some(world) = self.world.as_mut() else {
            return Interaction::Unavailable;
        };
        if world.is_consumed(&scene.id, &object.id) {
            return Interaction::Unavailable;
        }
        if let Some(required) = &object.required_item {
            if !world.has_item(required) {
                debug!(object = object_id, required = %required, "object locked");
                return Interaction::Locked {
                    required_item: required.clone(),
                };
            }
        }

        if let Some(action) = &object.action_on_interact {
            self.handler.apply(action, world);
        }
        if let Some(item) = &object.yields_item {
            world.add_item(item.as_str());
        }
        if object.consumed_on_interact {
            world.consume(&scene.id, &object.id);
        }
        info!(scene = %scene.id, object = object_id, "interacted with object");

        Interaction::Done {
            yielded: object.yields_item.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Enter a scene. `eager_outcome` resolves outcome scenes before their
    /// dialogue is read.
    fn enter_scene(&mut self, scene_id: &str, hops: usize, eager_outcome: bool) {
        if self.state() != SessionState::Playing {
            debug!(scene = scene_id, "advance ignored: not playing");
            return;
        }
        let Some(story) = self.story.clone() else {
            return;
        };
        let Some(scene) = story.scene(scene_id) else {
            warn!(
                scene = scene_id,
                current = ?self.current_scene_id(),
                "cannot advance: scene not found"
            );
            return;
        };

        if let Some(world) = self.world.as_mut() {
            world.current_scene_id = scene.id.clone();
        }
        self.dialogue.start(scene);
        debug!(scene = %scene.id, lines = scene.dialogue.len(), "entered scene");

        if let Some(action) = &scene.action {
            self.apply_action(action);
        }

        match scene.continuation() {
            Continuation::Outcome(outcome) if eager_outcome => self.resolve(outcome),
            _ if scene.dialogue.is_empty() => self.run_continuation(scene, hops),
            _ => {}
        }
    }

    /// Follow a scene's continuation once its dialogue is done.
    fn run_continuation(&mut self, scene: &Scene, hops: usize) {
        if self.is_terminal() {
            return;
        }
        match scene.continuation() {
            Continuation::Choices(_) => {
                if self.visible_choices().is_empty() {
                    warn!(scene = %scene.id, "no choices available after gating");
                } else {
                    debug!(scene = %scene.id, "waiting for a choice");
                }
            }
            Continuation::AutoTransition(next) => {
                if hops >= self.config.max_auto_hops {
                    error!(
                        scene = %scene.id,
                        hops,
                        "auto-transition limit reached; stopping"
                    );
                    return;
                }
                self.enter_scene(next, hops + 1, true);
            }
            Continuation::Outcome(outcome) => self.resolve(outcome),
            Continuation::Ending => info!(scene = %scene.id, "reached the end of the story"),
            Continuation::DeadEnd => {
                warn!(scene = %scene.id, "scene has no continuation; narrative dead end")
            }
        }
    }

    fn resolve(&mut self, outcome_id: &str) {
        let known = self
            .story
            .as_ref()
            .is_some_and(|s| s.outcomes.contains_key(outcome_id));
        if !known {
            warn!(outcome = outcome_id, "cannot resolve: outcome not found");
            return;
        }
        if let Some(world) = self.world.as_mut() {
            world.terminal = true;
            world.current_outcome_id = Some(outcome_id.to_string());
            info!(outcome = outcome_id, scene = %world.current_scene_id, "outcome reached");
        }
    }

    fn apply_action(&mut self, action: &leave_story::Action) {
        if let Some(world) = self.world.as_mut() {
            self.handler.apply(action, world);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leave_story::{Action, DialogueLine};

    fn scenario_a() -> StoryDocument {
        StoryDocument::new("A", "s1")
            .with_placeholder("{name}")
            .with_scene(
                Scene::new("s1")
                    .with_line(DialogueLine::new("Hi {name}"))
                    .with_outcome("end1"),
            )
            .with_outcome("end1", Outcome::new("Bye"))
    }

    fn scenario_b() -> StoryDocument {
        StoryDocument::new("B", "s1")
            .with_scene(
                Scene::new("s1")
                    .with_choice(Choice::to_scene("Look around", "s2"))
                    .with_choice(Choice::to_scene("Unlock the door", "s3").requires_flag("key")),
            )
            .with_scene(
                Scene::new("s2")
                    .with_line(DialogueLine::new("You find a key."))
                    .with_action(Action::SetFlag("key".into()))
                    .with_auto_transition("s1"),
            )
            .with_scene(Scene::new("s3").with_line(DialogueLine::new("Freedom.")))
    }

    fn playing(story: StoryDocument) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.load_story(story);
        interp.start_game().unwrap();
        interp
    }

    #[test]
    fn starts_idle() {
        let interp = Interpreter::new();
        assert_eq!(interp.state(), SessionState::Idle);
        assert_eq!(interp.current_scene_id(), None);
        assert!(interp.current_dialogue_line().is_exhausted());
        assert!(interp.visible_choices().is_empty());
        assert_eq!(interp.player_name(), "Player");
    }

    #[test]
    fn start_without_story_fails() {
        let mut interp = Interpreter::new();
        assert!(matches!(interp.start_game(), Err(SessionError::NoStory)));
    }

    #[test]
    fn start_with_missing_start_scene_fails() {
        let mut interp = Interpreter::new();
        interp.load_story(StoryDocument::new("Broken", "nowhere"));
        let err = interp.start_game().unwrap_err();
        assert!(matches!(err, SessionError::MissingStartScene(ref id) if id == "nowhere"));
        assert_eq!(interp.state(), SessionState::Idle);
    }

    #[test]
    fn binding_is_idle_until_started() {
        let mut interp = Interpreter::new();
        interp.load_story(scenario_a());
        assert_eq!(interp.state(), SessionState::Idle);
        interp.start_game().unwrap();
        assert_eq!(interp.state(), SessionState::Playing);
        interp.load_story(scenario_b());
        assert_eq!(interp.state(), SessionState::Idle);
    }

    #[test]
    fn scenario_a_dialogue_then_outcome() {
        let mut interp = Interpreter::new();
        interp.load_story(scenario_a());
        assert!(interp.set_player_name("Ann"));
        interp.start_game().unwrap();

        let line = interp.current_dialogue_line().line().unwrap();
        assert_eq!(interp.process_text(&line.text), "Hi Ann");
        assert_eq!(interp.state(), SessionState::Playing);

        interp.advance_dialogue();
        assert_eq!(interp.state(), SessionState::Resolved);
        assert!(interp.is_terminal());
        assert_eq!(
            interp.world().unwrap().current_outcome_id(),
            Some("end1")
        );
        assert_eq!(interp.current_outcome().unwrap().message, "Bye");
    }

    #[test]
    fn scenario_b_flag_gating() {
        let mut interp = playing(scenario_b());
        assert_eq!(interp.visible_choices().len(), 1);
        assert!(!interp.has_flag("key"));

        assert!(interp.choose(0));
        assert_eq!(interp.current_scene_id(), Some("s2"));
        assert!(interp.has_flag("key"));

        interp.advance_dialogue();
        assert_eq!(interp.current_scene_id(), Some("s1"));
        let labels: Vec<_> = interp.visible_choices().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(labels, vec!["Look around", "Unlock the door"]);
    }

    #[test]
    fn scenario_c_dangling_choice_keeps_scene() {
        let mut interp = playing(scenario_b());
        interp.make_choice(&Choice::to_scene("Jump", "missing"));
        assert_eq!(interp.current_scene_id(), Some("s1"));
        assert!(!interp.is_terminal());
        assert_eq!(interp.state(), SessionState::Playing);
    }

    #[test]
    fn underspecified_choice_stalls_but_runs_action() {
        let mut interp = playing(scenario_b());
        let choice = Choice {
            text: "Wait".into(),
            action: Some(Action::AddItem("patience".into())),
            ..Choice::default()
        };
        interp.make_choice(&choice);
        assert_eq!(interp.current_scene_id(), Some("s1"));
        assert!(interp.has_item("patience"));
    }

    #[test]
    fn dangling_outcome_keeps_playing() {
        let mut interp = playing(scenario_b());
        interp.make_choice(&Choice::to_outcome("Die", "no_such_outcome"));
        assert_eq!(interp.state(), SessionState::Playing);
        assert_eq!(interp.current_outcome(), None);
    }

    #[test]
    fn choosing_past_visible_choices_fails() {
        let mut interp = playing(scenario_b());
        assert!(!interp.choose(1));
        assert_eq!(interp.current_scene_id(), Some("s1"));
    }

    #[test]
    fn advance_to_outcome_scene_resolves_immediately() {
        let story = scenario_a().with_scene(
            Scene::new("s0").with_choice(Choice::to_scene("Go", "s1")),
        );
        let mut interp = Interpreter::new();
        interp.load_story(StoryDocument {
            start_scene_id: "s0".into(),
            ..story
        });
        interp.start_game().unwrap();

        interp.advance_to_scene("s1");
        assert_eq!(interp.current_scene_id(), Some("s1"));
        assert_eq!(interp.state(), SessionState::Resolved);

        // The scene's dialogue stays readable for the presentation layer.
        assert_eq!(interp.current_dialogue_line().line().unwrap().text, "Hi {name}");
        interp.advance_dialogue();
        assert!(interp.current_dialogue_line().is_exhausted());
        assert_eq!(interp.state(), SessionState::Resolved);
    }

    #[test]
    fn choices_win_over_auto_transition() {
        let story = StoryDocument::new("P", "hub")
            .with_scene(
                Scene::new("hub")
                    .with_line(DialogueLine::new("Where to?"))
                    .with_choice(Choice::to_scene("North", "north"))
                    .with_auto_transition("south")
                    .with_outcome("lost"),
            )
            .with_scene(Scene::new("north"))
            .with_scene(Scene::new("south"))
            .with_outcome("lost", Outcome::new("Lost."));
        let mut interp = playing(story);

        interp.advance_dialogue();
        assert_eq!(interp.current_scene_id(), Some("hub"));
        assert_eq!(interp.state(), SessionState::Playing);
        assert_eq!(interp.visible_choices().len(), 1);
    }

    #[test]
    fn exhausting_dialogue_follows_continuation_priority() {
        let story = StoryDocument::new("Graph", "hub")
            .with_scene(
                Scene::new("hub")
                    .with_line(DialogueLine::new("A crossroads."))
                    .with_choice(Choice::to_scene("Walk", "path"))
                    .with_choice(Choice::to_outcome("Rest", "rest"))
                    .with_outcome("rest"),
            )
            .with_scene(
                Scene::new("path")
                    .with_line(DialogueLine::new("A long path."))
                    .with_auto_transition("gate")
                    .with_outcome("rest"),
            )
            .with_scene(
                Scene::new("gate")
                    .with_line(DialogueLine::new("A locked gate."))
                    .with_outcome("rest"),
            )
            .with_scene(Scene::new("ending_home").with_line(DialogueLine::new("Home.")))
            .with_outcome("rest", Outcome::new("You rest.").then("ending_home"));

        let reachable = leave_story::validate::reachable_scenes(&story);
        assert_eq!(reachable.len(), 4);

        for id in reachable {
            let mut interp = playing(story.clone());
            interp.advance_to_scene(id);
            while !interp.current_dialogue_line().is_exhausted() {
                interp.advance_dialogue();
            }

            match story.scene(id).unwrap().continuation() {
                Continuation::Choices(_) => {
                    assert_eq!(interp.current_scene_id(), Some(id));
                    assert_eq!(interp.state(), SessionState::Playing);
                    assert!(!interp.visible_choices().is_empty());
                }
                Continuation::AutoTransition(next) => {
                    assert_eq!(interp.current_scene_id(), Some(next));
                }
                Continuation::Outcome(outcome) => {
                    assert_eq!(interp.state(), SessionState::Resolved);
                    assert_eq!(interp.world().unwrap().current_outcome_id(), Some(outcome));
                }
                Continuation::Ending | Continuation::DeadEnd => {
                    assert_eq!(interp.current_scene_id(), Some(id));
                    assert_eq!(interp.state(), SessionState::Playing);
                }
            }
        }
    }

    #[test]
    fn auto_transition_wins_over_outcome() {
        let story = StoryDocument::new("P", "hub")
            .with_scene(
                Scene::new("hub")
                    .with_line(DialogueLine::new("..."))
                    .with_auto_transition("south")
                    .with_outcome("lost"),
            )
            .with_scene(Scene::new("south").with_line(DialogueLine::new("South.")))
            .with_outcome("lost", Outcome::new("Lost."));
        let mut interp = playing(story);

        interp.advance_dialogue();
        assert_eq!(interp.current_scene_id(), Some("south"));
        assert_eq!(interp.state(), SessionState::Playing);
    }

    #[test]
    fn empty_scenes_chain_automatically() {
        let story = StoryDocument::new("Chain", "a")
            .with_scene(Scene::new("a").with_auto_transition("b"))
            .with_scene(
                Scene::new("b")
                    .with_action(Action::AddItem("pebble".into()))
                    .with_auto_transition("c"),
            )
            .with_scene(Scene::new("c").with_line(DialogueLine::new("Arrived.")));
        let interp = playing(story);

        assert_eq!(interp.current_scene_id(), Some("c"));
        assert!(interp.has_item("pebble"));
    }

    #[test]
    fn auto_transition_cycle_stops_at_hop_limit() {
        let story = StoryDocument::new("Loop", "a")
            .with_scene(Scene::new("a").with_auto_transition("b"))
            .with_scene(Scene::new("b").with_auto_transition("a"));
        let mut interp = Interpreter::with_config(InterpreterConfig::new().with_max_auto_hops(5));
        interp.load_story(story);
        interp.start_game().unwrap();

        assert_eq!(interp.state(), SessionState::Playing);
        assert!(matches!(interp.current_scene_id(), Some("a") | Some("b")));
    }

    #[test]
    fn scene_action_runs_once_on_entry() {
        let story = StoryDocument::new("Once", "a").with_scene(
            Scene::new("a")
                .with_line(DialogueLine::new("one"))
                .with_line(DialogueLine::new("two"))
                .with_action(Action::AddItem("coin".into())),
        );
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = counter.clone();
        let mut interp = Interpreter::new().with_handler(move |action: &Action, world: &mut WorldState| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            BuiltinActions.apply(action, world);
        });
        interp.load_story(story);
        interp.start_game().unwrap();
        interp.advance_dialogue();
        interp.advance_dialogue();
        interp.advance_dialogue();

        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(interp.has_item("coin"));
    }

    #[test]
    fn restart_resets_world_but_keeps_profile() {
        let mut interp = Interpreter::new();
        interp.load_story(scenario_b());
        interp.set_player_name("Ann");
        interp.start_game().unwrap();
        interp.choose(0);
        assert!(interp.has_flag("key"));

        interp.start_game().unwrap();
        let world = interp.world().unwrap();
        assert_eq!(world.current_scene_id(), "s1");
        assert!(!world.is_terminal());
        assert_eq!(world.flags().count(), 0);
        assert_eq!(world.inventory().count(), 0);
        assert_eq!(world.player_name(), "Ann");
    }

    #[test]
    fn choices_ignored_when_resolved() {
        let mut interp = playing(scenario_a());
        interp.advance_dialogue();
        assert!(interp.is_terminal());

        interp.make_choice(&Choice::to_scene("Back", "s1").with_action(Action::SetFlag("x".into())));
        assert!(!interp.has_flag("x"));
        interp.advance_to_scene("s1");
        assert_eq!(interp.state(), SessionState::Resolved);
    }

    #[test]
    fn multi_stage_ending() {
        let story = StoryDocument::new("Two parts", "fight")
            .with_scene(
                Scene::new("fight")
                    .with_action(Action::AddItem("scar".into()))
                    .with_choice(Choice::to_outcome("Win", "victory")),
            )
            .with_scene(Scene::new("ending_epilogue").with_line(DialogueLine::new("Years later...")))
            .with_outcome("victory", Outcome::new("You won.").then("ending_epilogue"))
            .with_outcome("final", Outcome::new("The end."));
        let mut interp = playing(story);

        interp.choose(0);
        assert_eq!(interp.state(), SessionState::Resolved);
        assert!(interp.continue_after_outcome());
        assert_eq!(interp.state(), SessionState::Playing);
        assert_eq!(interp.current_scene_id(), Some("ending_epilogue"));
        assert!(interp.has_item("scar"));
        assert_eq!(interp.continuation(), Some(Continuation::Ending));

        interp.advance_dialogue();
        assert_eq!(interp.state(), SessionState::Playing);
        assert!(!interp.continue_after_outcome());
    }

    #[test]
    fn reset_terminal_returns_to_playing() {
        let mut interp = playing(scenario_a());
        interp.advance_dialogue();
        assert!(interp.is_terminal());

        interp.reset_terminal();
        assert_eq!(interp.state(), SessionState::Playing);
        assert_eq!(interp.current_outcome(), None);
        assert_eq!(interp.current_scene_id(), Some("s1"));
    }

    #[test]
    fn outcome_leading_nowhere_stays_resolved() {
        let story = StoryDocument::new("Lost", "s1")
            .with_scene(Scene::new("s1").with_choice(Choice::to_outcome("Jump", "fall")))
            .with_outcome("fall", Outcome::new("You fall.").then("missing"));
        let mut interp = playing(story);
        interp.choose(0);
        assert_eq!(interp.state(), SessionState::Resolved);

        assert!(!interp.continue_after_outcome());
        assert_eq!(interp.state(), SessionState::Resolved);
        assert_eq!(interp.world().unwrap().current_outcome_id(), Some("fall"));
        assert_eq!(interp.current_scene_id(), Some("s1"));
    }

    #[test]
    fn all_choices_gated_does_not_fall_back() {
        let story = StoryDocument::new("Stuck", "s1")
            .with_scene(
                Scene::new("s1")
                    .with_line(DialogueLine::new("A sealed door."))
                    .with_choice(Choice::to_scene("Open", "s2").requires_flag("f"))
                    .with_auto_transition("s2")
                    .with_outcome("end"),
            )
            .with_scene(Scene::new("s2"))
            .with_outcome("end", Outcome::new("Done."));
        let mut interp = playing(story);

        interp.advance_dialogue();
        assert!(interp.current_dialogue_line().is_exhausted());
        assert_eq!(interp.current_scene_id(), Some("s1"));
        assert_eq!(interp.state(), SessionState::Playing);
        assert!(interp.visible_choices().is_empty());
    }

    #[test]
    fn rebinding_drops_names_with_the_new_placeholder() {
        let mut interp = Interpreter::new();
        assert!(interp.set_player_name("a{name}"));

        interp.load_story(scenario_a());
        assert_eq!(interp.player_name(), "Player");
        interp.start_game().unwrap();
        let once = interp.process_text("Hi {name}");
        assert_eq!(once, "Hi Player");
        assert_eq!(interp.process_text(&once), once);

        interp.set_player_name("Ann");
        interp.load_story(scenario_b());
        assert_eq!(interp.player_name(), "Ann");
    }

    #[test]
    fn final_outcome_does_not_continue() {
        let mut interp = playing(scenario_a());
        interp.advance_dialogue();
        assert!(!interp.continue_after_outcome());
        assert!(interp.is_terminal());
    }

    #[test]
    fn player_name_rules() {
        let mut interp = Interpreter::new();
        interp.load_story(scenario_a());

        assert!(!interp.set_player_name("   "));
        assert_eq!(interp.player_name(), "Player");
        assert!(!interp.set_player_name("I am {name}"));
        assert!(interp.set_player_name("  Ann "));
        assert_eq!(interp.process_text("{name}, {name}!"), "Ann, Ann!");

        interp.start_game().unwrap();
        interp.set_player_name("Bea");
        assert_eq!(interp.world().unwrap().player_name(), "Bea");
    }

    #[test]
    fn process_text_is_idempotent() {
        let mut interp = Interpreter::new();
        interp.load_story(scenario_a());
        interp.set_player_name("Ann");

        let once = interp.process_text("{name} meets {name}");
        assert_eq!(interp.process_text(&once), once);
    }

    #[test]
    fn resolved_line_uses_player_portrait() {
        let story = StoryDocument::new("P", "s").with_scene(
            Scene::new("s").with_line(DialogueLine::new("Me again.").spoken_by("{playerName}")),
        );
        let mut interp = Interpreter::new();
        interp.load_story(story);
        interp.set_player_name("Ann");
        interp.set_player_portrait("ann.png");
        interp.start_game().unwrap();

        let line = interp.resolved_line().unwrap();
        assert_eq!(line.nameplate.as_deref(), Some("Ann"));
        assert_eq!(line.portrait.as_deref(), Some("ann.png"));
        assert_eq!(line.text, "Me again.");

        interp.set_player_portrait("");
        let line = interp.resolved_line().unwrap();
        assert_eq!(
            line.portrait.as_deref(),
            Some(interp.config().default_portrait.as_str())
        );
    }

    #[test]
    fn item_gated_choices() {
        let story = StoryDocument::new("Items", "door")
            .with_scene(
                Scene::new("door")
                    .with_choice(Choice::to_scene("Knock", "door"))
                    .with_choice(Choice::to_scene("Unlock", "inside").requires_item("key"))
                    .with_object(InteractiveObject::new("mat", "Door mat").yields("key").consumed()),
            )
            .with_scene(Scene::new("inside").with_line(DialogueLine::new("Warm.")));
        let mut interp = playing(story);

        assert_eq!(interp.visible_choices().len(), 1);
        assert_eq!(
            interp.interact("mat"),
            Interaction::Done {
                yielded: Some("key".into())
            }
        );
        assert_eq!(interp.visible_choices().len(), 2);
        assert!(interp.visible_objects().is_empty());
        assert_eq!(interp.interact("mat"), Interaction::Unavailable);

        interp.choose(1);
        assert_eq!(interp.current_scene_id(), Some("inside"));
    }

    #[test]
    fn locked_objects_need_their_item() {
        let story = StoryDocument::new("Chest", "room").with_scene(
            Scene::new("room")
                .with_line(DialogueLine::new("A chest."))
                .with_object(
                    InteractiveObject::new("chest", "Chest")
                        .requires_item("key")
                        .with_action(Action::SetFlag("chest_open".into())),
                ),
        );
        let mut interp = playing(story);

        assert_eq!(
            interp.interact("chest"),
            Interaction::Locked {
                required_item: "key".into()
            }
        );
        assert!(!interp.has_flag("chest_open"));
        assert_eq!(interp.interact("ghost"), Interaction::Unavailable);

        interp.world.as_mut().unwrap().add_item("key");
        assert_eq!(interp.interact("chest"), Interaction::Done { yielded: None });
        assert!(interp.has_flag("chest_open"));

        // Not consumed: can be used again.
        assert_eq!(interp.visible_objects().len(), 1);
    }

    #[test]
    fn dead_end_scene_stays_put() {
        let story = StoryDocument::new("Dead", "a")
            .with_scene(Scene::new("a").with_line(DialogueLine::new("Nothing here.")));
        let mut interp = playing(story);
        interp.advance_dialogue();
        assert_eq!(interp.continuation(), Some(Continuation::DeadEnd));
        assert_eq!(interp.state(), SessionState::Playing);
        assert!(interp.visible_choices().is_empty());
    }

    #[test]
    fn loads_story_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.json");
        std::fs::write(
            &path,
            r#"{"gameTitle": "File", "startScene": "a", "scenes": {"a": {"dialogue": [{"line": "Hello"}]}}}"#,
        )
        .unwrap();

        let mut interp = Interpreter::new();
        interp.load_story_from(&path).unwrap();
        assert_eq!(interp.story().unwrap().title, "File");

        let err = interp.load_story_from(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SessionError::Load(_)));
        assert_eq!(interp.story().unwrap().title, "File");
    }
}
