//! Loading story documents from JSON.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};
use crate::story::StoryDocument;
use crate::wire::RawStory;

/// Options controlling how a story is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Reject action tokens outside the built-in vocabulary.
    ///
    /// When false, unknown tokens load as [`crate::Action::Custom`].
    pub strict_actions: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict_actions: true,
        }
    }
}

impl LoadOptions {
    /// Options that keep unknown action tokens instead of failing.
    pub fn lenient() -> Self {
        Self {
            strict_actions: false,
        }
    }

    /// Set whether unknown action tokens fail the load.
    pub fn with_strict_actions(mut self, strict: bool) -> Self {
        self.strict_actions = strict;
        self
    }
}

/// Load a story from a JSON string with default options.
pub fn load_str(json: &str) -> LoadResult<StoryDocument> {
    load_str_with(json, &LoadOptions::default())
}

/// Load a story from a JSON string.
pub fn load_str_with(json: &str, options: &LoadOptions) -> LoadResult<StoryDocument> {
    let raw: RawStory = serde_json::from_str(json)?;
    finish(raw, options)
}

/// Load a story from a reader with default options.
pub fn load_reader(reader: impl Read) -> LoadResult<StoryDocument> {
    load_reader_with(reader, &LoadOptions::default())
}

/// Load a story from a reader.
pub fn load_reader_with(reader: impl Read, options: &LoadOptions) -> LoadResult<StoryDocument> {
    let raw: RawStory = serde_json::from_reader(reader)?;
    finish(raw, options)
}

/// Load a story file with default options.
pub fn load_path(path: impl AsRef<Path>) -> LoadResult<StoryDocument> {
    load_path_with(path, &LoadOptions::default())
}

/// Load a story file.
pub fn load_path_with(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<StoryDocument> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading story resource");
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str_with(&json, options)
}

fn finish(raw: RawStory, options: &LoadOptions) -> LoadResult<StoryDocument> {
    let story = raw.into_document(options)?;
    info!(
        title = %story.title,
        scenes = story.scenes.len(),
        outcomes = story.outcomes.len(),
        "story loaded"
    );
    Ok(story)
}
