//! Walking a scene's dialogue one line at a time.

use leave_story::{DialogueLine, Scene};

use crate::config::InterpreterConfig;
use crate::text::substitute;
use crate::world::WorldState;

/// The line under the dialogue cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentLine<'a> {
    /// A line still to be shown.
    Line(&'a DialogueLine),
    /// Every line has been shown.
    Exhausted,
}

impl<'a> CurrentLine<'a> {
    /// The line, unless exhausted.
    pub fn line(self) -> Option<&'a DialogueLine> {
        match self {
            CurrentLine::Line(line) => Some(line),
            CurrentLine::Exhausted => None,
        }
    }

    /// Whether the dialogue is exhausted.
    pub fn is_exhausted(self) -> bool {
        matches!(self, CurrentLine::Exhausted)
    }
}

/// Cursor over the dialogue lines of one scene.
///
/// The sequencer only reports exhaustion; what happens next is the
/// interpreter's business.
#[derive(Debug, Clone, Default)]
pub struct DialogueSequencer {
    scene_id: String,
    lines: Vec<DialogueLine>,
    index: usize,
}

impl DialogueSequencer {
    /// Bind to a scene's dialogue and rewind.
    pub fn start(&mut self, scene: &Scene) {
        self.scene_id.clone_from(&scene.id);
        self.lines.clone_from(&scene.dialogue);
        self.index = 0;
    }

    /// The scene whose dialogue is bound.
    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    /// The line under the cursor.
    pub fn current(&self) -> CurrentLine<'_> {
        self.lines
            .get(self.index)
            .map_or(CurrentLine::Exhausted, CurrentLine::Line)
    }

    /// Move past the current line.
    ///
    /// Returns true only on the step that exhausts the dialogue; stepping an
    /// already exhausted cursor does nothing.
    pub fn advance(&mut self) -> bool {
        if self.index >= self.lines.len() {
            return false;
        }
        self.index += 1;
        self.index == self.lines.len()
    }

    /// Whether every line has been shown.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.lines.len()
    }

    /// Index of the current line (equal to [`len`](Self::len) once exhausted).
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of lines bound.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the bound scene has no dialogue.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A dialogue line ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Speaker name to show, if any.
    pub nameplate: Option<String>,
    /// Line text with the player name filled in.
    pub text: String,
    /// Portrait to show, if any.
    pub portrait: Option<String>,
    /// Presentation style hint.
    pub style: Option<String>,
}

/// Resolve speaker, portrait and text of a line.
///
/// Lines spoken by the player placeholder use the player's portrait, or
/// `config.default_portrait` when the player has none. The narrator never
/// gets a nameplate.
pub fn resolve_line(
    line: &DialogueLine,
    world: &WorldState,
    placeholder: &str,
    config: &InterpreterConfig,
) -> ResolvedLine {
    let name = world.player_name();
    let speaker = line.speaker.as_deref().map(str::trim).unwrap_or("");

    let nameplate = if speaker.is_empty() || speaker.eq_ignore_ascii_case(&config.narrator_speaker)
    {
        None
    } else {
        Some(substitute(speaker, placeholder, name))
    };

    let portrait = if !placeholder.is_empty() && speaker == placeholder {
        Some(
            world
                .player_portrait_ref()
                .unwrap_or(&config.default_portrait)
                .to_string(),
        )
    } else {
        line.portrait_ref.clone()
    };

    ResolvedLine {
        nameplate,
        text: substitute(&line.text, placeholder, name),
        portrait,
        style: line.style.clone(),
    }
}
