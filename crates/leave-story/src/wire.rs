//! Raw JSON shapes of a story document.
//!
//! These mirror the file format one-to-one and are converted into the
//! [`crate::story`] model by [`RawStory::into_document`].

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::action::Action;
use crate::error::{LoadError, LoadResult};
use crate::loader::LoadOptions;
use crate::story::{
    Choice, DEFAULT_PLAYER_PLACEHOLDER, DialogueLine, InteractiveObject, Outcome, Scene,
    StoryDocument,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStory {
    #[serde(default)]
    game_title: String,
    #[serde(default)]
    start_scene: Option<String>,
    #[serde(default)]
    player_name_placeholder: Option<String>,
    #[serde(default)]
    scenes: BTreeMap<String, RawScene>,
    #[serde(default)]
    outcomes: BTreeMap<String, RawOutcome>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScene {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    dialogue: Vec<RawLine>,
    #[serde(default)]
    choices: Option<Vec<RawChoice>>,
    #[serde(default)]
    auto_transition_to: Option<String>,
    #[serde(default)]
    outcome: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    ending_title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    background_image: Option<String>,
    #[serde(default)]
    background_music: Option<String>,
    #[serde(default)]
    interactive_objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLine {
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    line: String,
    #[serde(default)]
    portrait_path: Option<String>,
    #[serde(default)]
    style: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChoice {
    #[serde(default)]
    text: String,
    #[serde(default)]
    next_scene_id: Option<String>,
    #[serde(default)]
    outcome: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    required_flag: Option<String>,
    #[serde(default)]
    required_item: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutcome {
    #[serde(default, alias = "outcomeText")]
    message: String,
    #[serde(default)]
    next_scene_id: Option<String>,
    #[serde(default, alias = "outcomeImagePath")]
    image_path: Option<String>,
    #[serde(default, alias = "outcomeAudioPath")]
    audio_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObject {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    #[serde(default)]
    required_item: Option<String>,
    #[serde(default)]
    action_on_interact: Option<String>,
    #[serde(default)]
    yields_item: Option<String>,
    #[serde(default)]
    consumed_on_interact: bool,
}

/// Treat blank strings the same as missing ones.
fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_action(
    token: Option<String>,
    location: impl FnOnce() -> String,
    options: &LoadOptions,
) -> LoadResult<Option<Action>> {
    let Some(token) = non_blank(token) else {
        return Ok(None);
    };
    if options.strict_actions {
        Action::parse(&token)
            .map(Some)
            .ok_or_else(|| LoadError::InvalidAction {
                location: location(),
                token,
            })
    } else {
        Ok(Some(Action::parse_lenient(&token)))
    }
}

impl RawStory {
    pub(crate) fn into_document(self, options: &LoadOptions) -> LoadResult<StoryDocument> {
        let start_scene_id = non_blank(self.start_scene)
            .ok_or_else(|| LoadError::InvalidStory("startScene is missing or empty".into()))?;

        let mut scenes = BTreeMap::new();
        for (key, raw) in self.scenes {
            let scene = raw.into_scene(&key, options)?;
            scenes.insert(key, scene);
        }

        if !scenes.contains_key(&start_scene_id) {
            return Err(LoadError::InvalidStory(format!(
                "start scene \"{start_scene_id}\" is not defined"
            )));
        }

        let outcomes = self
            .outcomes
            .into_iter()
            .map(|(key, raw)| (key, raw.into_outcome()))
            .collect();

        let player_name_placeholder = self
            .player_name_placeholder
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYER_PLACEHOLDER.to_string());

        Ok(StoryDocument {
            title: self.game_title,
            start_scene_id,
            player_name_placeholder,
            scenes,
            outcomes,
        })
    }
}

impl RawScene {
    fn into_scene(self, key: &str, options: &LoadOptions) -> LoadResult<Scene> {
        if let Some(id) = non_blank(self.id).filter(|id| id != key) {
            warn!(key, id = %id, "scene body id differs from its key; using the key");
        }
        let action = parse_action(self.action, || format!("scene \"{key}\""), options)?;

        let mut choices = Vec::new();
        for (index, raw) in self.choices.unwrap_or_default().into_iter().enumerate() {
            choices.push(raw.into_choice(key, index, options)?);
        }

        let mut interactive_objects = Vec::new();
        for raw in self.interactive_objects {
            interactive_objects.push(raw.into_object(key, options)?);
        }

        Ok(Scene {
            id: key.to_string(),
            dialogue: self.dialogue.into_iter().map(RawLine::into_line).collect(),
            choices,
            auto_transition_to: non_blank(self.auto_transition_to),
            outcome: non_blank(self.outcome),
            action,
            ending_title: non_blank(self.ending_title),
            text: self.text,
            background_image: non_blank(self.background_image),
            background_music: non_blank(self.background_music),
            interactive_objects,
        })
    }
}

impl RawLine {
    fn into_line(self) -> DialogueLine {
        DialogueLine {
            speaker: non_blank(self.speaker),
            text: self.line,
            portrait_ref: non_blank(self.portrait_path),
            style: non_blank(self.style),
        }
    }
}

impl RawChoice {
    fn into_choice(self, scene: &str, index: usize, options: &LoadOptions) -> LoadResult<Choice> {
        let action = parse_action(
            self.action,
            || format!("choice {} of scene \"{scene}\"", index + 1),
            options,
        )?;
        Ok(Choice {
            text: self.text,
            next_scene_id: non_blank(self.next_scene_id),
            outcome_id: non_blank(self.outcome),
            action,
            required_flag: non_blank(self.required_flag),
            required_item: non_blank(self.required_item),
        })
    }
}

impl RawOutcome {
    fn into_outcome(self) -> Outcome {
        Outcome {
            message: self.message,
            next_scene_id: non_blank(self.next_scene_id),
            image_path: non_blank(self.image_path),
            audio_path: non_blank(self.audio_path),
        }
    }
}

impl RawObject {
    fn into_object(self, scene: &str, options: &LoadOptions) -> LoadResult<InteractiveObject> {
        let action_on_interact = parse_action(
            self.action_on_interact,
            || format!("object \"{}\" of scene \"{scene}\"", self.id),
            options,
        )?;
        Ok(InteractiveObject {
            name: if self.name.is_empty() {
                self.id.clone()
            } else {
                self.name
            },
            id: self.id,
            image_path: non_blank(self.image_path),
            x: self.x,
            y: self.y,
            required_item: non_blank(self.required_item),
            action_on_interact,
            yields_item: non_blank(self.yields_item),
            consumed_on_interact: self.consumed_on_interact,
        })
    }
}
