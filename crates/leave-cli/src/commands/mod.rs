pub mod check;
pub mod info;
pub mod play;

use std::path::Path;

use leave_story::{LoadOptions, StoryDocument};

/// Load a story file, mapping failures to a printable message.
fn load(path: &Path, lenient: bool) -> Result<StoryDocument, String> {
    let options = LoadOptions::default().with_strict_actions(!lenient);
    leave_story::load_path_with(path, &options).map_err(|e| e.to_string())
}

/// Shorten `text` to at most `max` characters for table cells.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else if text.is_empty() {
        "—".to_string()
    } else {
        text.to_string()
    }
}
