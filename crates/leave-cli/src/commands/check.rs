use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use leave_story::{Severity, check_story};

pub fn run(path: &Path, lenient: bool) -> Result<(), String> {
    let story = super::load(path, lenient)?;
    let issues = check_story(&story);

    if issues.is_empty() {
        println!("  All checks passed for '{}'.", story.title);
        println!(
            "  {} scenes, {} outcomes",
            story.scenes.len(),
            story.outcomes.len()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Severity", "Location", "Message"]);
    for issue in &issues {
        let severity = match issue.severity {
            Severity::Error => issue.severity.to_string().red().bold().to_string(),
            Severity::Warning => issue.severity.to_string().yellow().to_string(),
        };
        table.add_row(vec![severity, issue.location.clone(), issue.message.clone()]);
    }
    println!("{table}");

    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;
    println!(
        "  {} error{}, {} warning{}",
        errors,
        if errors == 1 { "" } else { "s" },
        warnings,
        if warnings == 1 { "" } else { "s" },
    );

    if errors > 0 {
        Err(format!("'{}' has broken references", story.title))
    } else {
        Ok(())
    }
}
