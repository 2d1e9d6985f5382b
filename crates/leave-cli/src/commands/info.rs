use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path) -> Result<(), String> {
    // Info is a read-only summary; unknown actions should not hide it.
    let story = super::load(path, true)?;

    let choices: usize = story.scenes.values().map(|s| s.choices.len()).sum();
    let objects: usize = story
        .scenes
        .values()
        .map(|s| s.interactive_objects.len())
        .sum();

    println!("  {}", story.title.bold());
    println!();
    println!("  start scene: {}", story.start_scene_id);
    println!("  placeholder: {}", story.player_name_placeholder);
    println!("  scenes:      {}", story.scenes.len());
    println!("  choices:     {choices}");
    println!("  objects:     {objects}");
    println!("  outcomes:    {}", story.outcomes.len());

    if story.outcomes.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Outcome", "Message", "Continues to"]);
    for (id, outcome) in &story.outcomes {
        let message = super::truncate(&outcome.message, 60);
        let next = outcome.next_scene_id.as_deref().unwrap_or("—");
        table.add_row(vec![id.as_str(), message.as_str(), next]);
    }
    println!();
    println!("{table}");

    Ok(())
}
