//! Content checks for a loaded story.
//!
//! Loading only guarantees that the start scene exists. These checks report
//! the links and shapes that would otherwise only show up at runtime as a
//! stalled session: dangling ids, underspecified choices, scenes with several
//! continuations, and scenes nobody can reach.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use strsim::jaro_winkler;

use crate::story::{Scene, StoryDocument};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGEST_THRESHOLD: f64 = 0.8;

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The story will misbehave at runtime.
    Error,
    /// Legal, but probably not what the author meant.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A problem found in a story document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Where the issue is, e.g. `scene "hall"`.
    pub location: String,
    /// What is wrong.
    pub message: String,
    /// How serious it is.
    pub severity: Severity,
}

impl ValidationIssue {
    /// Whether this issue is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)
    }
}

/// Check a story for broken links and suspicious shapes.
///
/// Issues come back grouped by scene in id order, then outcomes, then
/// reachability warnings.
pub fn check_story(story: &StoryDocument) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for scene in story.scenes.values() {
        check_scene(story, scene, &mut issues);
    }

    for (id, outcome) in &story.outcomes {
        if let Some(next) = &outcome.next_scene_id {
            check_scene_ref(story, format!("outcome \"{id}\""), "next scene", next, &mut issues);
        }
    }

    let reachable = reachable_scenes(story);
    for id in story.scenes.keys() {
        if !reachable.contains(id.as_str()) {
            issues.push(ValidationIssue {
                location: format!("scene \"{id}\""),
                message: "not reachable from the start scene".to_string(),
                severity: Severity::Warning,
            });
        }
    }

    issues
}

fn check_scene(story: &StoryDocument, scene: &Scene, issues: &mut Vec<ValidationIssue>) {
    let location = format!("scene \"{}\"", scene.id);

    if scene.continuation_count() > 1 {
        issues.push(ValidationIssue {
            location: location.clone(),
            message: "declares more than one continuation; choices win over autoTransitionTo, \
                      which wins over outcome"
                .to_string(),
            severity: Severity::Warning,
        });
    }

    if let Some(next) = &scene.auto_transition_to {
        check_scene_ref(story, location.clone(), "autoTransitionTo", next, issues);
    }
    if let Some(outcome) = &scene.outcome {
        check_outcome_ref(story, location.clone(), outcome, issues);
    }

    for (index, choice) in scene.choices.iter().enumerate() {
        let location = format!("choice {} of scene \"{}\"", index + 1, scene.id);
        match (&choice.next_scene_id, &choice.outcome_id) {
            (None, None) => issues.push(ValidationIssue {
                location,
                message: "has neither nextSceneId nor outcome".to_string(),
                severity: Severity::Error,
            }),
            (Some(_), Some(outcome)) => {
                issues.push(ValidationIssue {
                    location: location.clone(),
                    message: "has both nextSceneId and outcome; the outcome wins".to_string(),
                    severity: Severity::Warning,
                });
                check_outcome_ref(story, location, outcome, issues);
            }
            (Some(next), None) => check_scene_ref(story, location, "nextSceneId", next, issues),
            (None, Some(outcome)) => check_outcome_ref(story, location, outcome, issues),
        }
    }

    for object in &scene.interactive_objects {
        if object.action_on_interact.is_none() && object.yields_item.is_none() {
            issues.push(ValidationIssue {
                location: format!("object \"{}\" of scene \"{}\"", object.id, scene.id),
                message: "has no action and yields nothing".to_string(),
                severity: Severity::Warning,
            });
        }
    }
}

fn check_scene_ref(
    story: &StoryDocument,
    location: String,
    field: &str,
    target: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if story.scenes.contains_key(target) {
        return;
    }
    let mut message = format!("{field} refers to unknown scene \"{target}\"");
    if let Some(hint) = suggest(target, story.scenes.keys()) {
        message.push_str(&format!(" (did you mean \"{hint}\"?)"));
    }
    issues.push(ValidationIssue {
        location,
        message,
        severity: Severity::Error,
    });
}

fn check_outcome_ref(
    story: &StoryDocument,
    location: String,
    target: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if story.outcomes.contains_key(target) {
        return;
    }
    let mut message = format!("refers to unknown outcome \"{target}\"");
    if let Some(hint) = suggest(target, story.outcomes.keys()) {
        message.push_str(&format!(" (did you mean \"{hint}\"?)"));
    }
    issues.push(ValidationIssue {
        location,
        message,
        severity: Severity::Error,
    });
}

/// The closest known id to `input`, if any is close enough.
pub fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a String>) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    candidates
        .map(|c| (c, jaro_winkler(&input_lower, &c.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c.as_str())
}

/// Ids of every scene reachable from the start scene.
///
/// Edges are choice targets, auto-transitions, and the next scenes of any
/// outcome a scene or choice can reach.
pub fn reachable_scenes(story: &StoryDocument) -> BTreeSet<&str> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(story.start_scene_id.as_str());

    while let Some(id) = queue.pop_front() {
        let Some(scene) = story.scene(id) else {
            continue;
        };
        if !seen.insert(scene.id.as_str()) {
            continue;
        }

        let outcome_next = |outcome: &str| {
            story
                .outcome(outcome)
                .and_then(|o| o.next_scene_id.as_deref())
        };

        for choice in &scene.choices {
            if let Some(next) = &choice.next_scene_id {
                queue.push_back(next);
            }
            if let Some(next) = choice.outcome_id.as_deref().and_then(outcome_next) {
                queue.push_back(next);
            }
        }
        if let Some(next) = &scene.auto_transition_to {
            queue.push_back(next);
        }
        if let Some(next) = scene.outcome.as_deref().and_then(outcome_next) {
            queue.push_back(next);
        }
    }

    seen
}
