use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use leave_engine::{CharacterRoster, Interaction, Interpreter, PlayerProfile, SessionState};
use leave_story::{Continuation, Scene};

/// What the player is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Line,
    Choices,
    Outcome,
    Finished,
}

pub fn run(
    path: &Path,
    name: Option<&str>,
    portrait: Option<&str>,
    characters: &[String],
    lenient: bool,
) -> Result<(), String> {
    let story = super::load(path, lenient)?;
    let mut interp = Interpreter::new();
    interp.load_story(story);

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    if !characters.is_empty() {
        let profiles = characters.iter().map(String::as_str).map(parse_character).collect();
        let mut roster = CharacterRoster::new(profiles).map_err(|e| e.to_string())?;
        pick_character(&mut roster, &mut reader)?;
        if !roster.apply_to(&mut interp) {
            return Err(format!("invalid character name \"{}\"", roster.current().name));
        }
    }
    if let Some(name) = name {
        if !interp.set_player_name(name) {
            return Err(format!("invalid player name \"{name}\""));
        }
    }
    if let Some(portrait) = portrait {
        interp.set_player_portrait(portrait);
    }

    interp.start_game().map_err(|e| e.to_string())?;

    let title = interp.story().map(|s| s.title.clone()).unwrap_or_default();
    println!("  {} {}", "Playing".bold(), title.bold());
    println!("  Enter: next line | 1-9: choose | c: continue | i: inventory | use <object> | q: quit");
    println!();

    let mut shown_scene: Option<String> = None;
    let mut step = render(&interp, &mut shown_scene);
    let mut line = String::new();

    while step != Step::Finished {
        if !prompt(&mut reader, &mut line)? {
            break;
        }
        let input = line.trim();

        match (input, step) {
            ("q" | "quit", _) => break,
            ("i" | "inventory", _) => {
                print_inventory(&interp);
                continue;
            }
            ("", Step::Line) => interp.advance_dialogue(),
            ("c", Step::Outcome) => {
                interp.continue_after_outcome();
            }
            (cmd, _) if cmd.starts_with("use ") => {
                let object = cmd.strip_prefix("use ").unwrap_or_default().trim();
                match interp.interact(object) {
                    Interaction::Done { yielded: Some(item) } => {
                        println!("  {} {item}", "You take:".green());
                    }
                    Interaction::Done { yielded: None } => println!("  {}", "Done.".green()),
                    Interaction::Locked { required_item } => {
                        println!("  {}", format!("You need: {required_item}").yellow());
                        continue;
                    }
                    Interaction::Unavailable => {
                        println!("  {}", format!("Nothing called \"{object}\" here.").yellow());
                        continue;
                    }
                }
            }
            (number, Step::Choices) if number.parse::<usize>().is_ok() => {
                let picked = number
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .is_some_and(|index| interp.choose(index));
                if !picked {
                    println!("  {}", "No such choice.".yellow());
                    continue;
                }
            }
            _ => {
                println!("  {}", hint(step).dimmed());
                continue;
            }
        }

        step = render(&interp, &mut shown_scene);
    }

    Ok(())
}

/// Parse `NAME` or `NAME=PORTRAIT`.
fn parse_character(arg: &str) -> PlayerProfile {
    match arg.split_once('=') {
        Some((name, portrait)) => {
            let mut profile = PlayerProfile::new(name.trim());
            profile.portrait_ref = Some(portrait.trim().to_string()).filter(|p| !p.is_empty());
            profile
        }
        None => PlayerProfile::new(arg.trim()),
    }
}

fn pick_character(roster: &mut CharacterRoster, reader: &mut impl BufRead) -> Result<(), String> {
    println!("  Choose your character: n: next | p: previous | Enter: confirm");
    let mut line = String::new();
    loop {
        println!(
            "  [{}/{}] {}",
            roster.index() + 1,
            roster.len(),
            roster.current().name.bold()
        );
        if !prompt(reader, &mut line)? {
            return Ok(());
        }
        match line.trim() {
            "" => return Ok(()),
            "n" => {
                roster.next();
            }
            "p" => {
                roster.previous();
            }
            other => {
                if roster.select(other).is_none() {
                    println!("  {}", "Unknown character.".yellow());
                }
            }
        }
    }
}

/// Read one line. Returns false at end of input.
fn prompt(reader: &mut impl BufRead, line: &mut String) -> Result<bool, String> {
    print!("> ");
    io::stdout().flush().map_err(|e| e.to_string())?;
    line.clear();
    let read = reader.read_line(line).map_err(|e| e.to_string())?;
    Ok(read > 0)
}

/// Print whatever the session currently shows and report what input it
/// waits for.
fn render(interp: &Interpreter, shown_scene: &mut Option<String>) -> Step {
    if let Some(scene) = interp.current_scene() {
        if shown_scene.as_deref() != Some(scene.id.as_str()) {
            *shown_scene = Some(scene.id.clone());
            print_scene(interp, scene);
        }
    }

    if let Some(line) = interp.resolved_line() {
        match line.nameplate {
            Some(name) => println!("  {}: {}", name.bold(), line.text),
            None => println!("  {}", line.text.italic()),
        }
        return Step::Line;
    }

    match interp.state() {
        SessionState::Idle => Step::Finished,
        SessionState::Resolved => {
            let Some(outcome) = interp.current_outcome() else {
                return Step::Finished;
            };
            println!();
            println!("  {}", interp.process_text(&outcome.message).bold());
            if outcome.is_final() {
                println!("  {}", "The End".bold());
                Step::Finished
            } else {
                println!("  {}", "[c] continue".dimmed());
                Step::Outcome
            }
        }
        SessionState::Playing => match interp.continuation() {
            Some(Continuation::Choices(_)) => {
                let choices = interp.visible_choices();
                if choices.is_empty() {
                    println!("  {}", "There is no way forward.".yellow());
                    return Step::Finished;
                }
                println!();
                for (i, choice) in choices.iter().enumerate() {
                    println!("  {}. {}", i + 1, interp.process_text(&choice.text));
                }
                Step::Choices
            }
            Some(Continuation::Ending) => {
                let banner = interp
                    .current_scene()
                    .and_then(|s| s.ending_title.as_deref())
                    .map_or_else(|| "The End".to_string(), |t| interp.process_text(t));
                println!();
                println!("  {}", banner.bold());
                Step::Finished
            }
            _ => {
                println!("  {}", "The story stops here.".yellow());
                Step::Finished
            }
        },
    }
}

fn print_scene(interp: &Interpreter, scene: &Scene) {
    println!();
    if let Some(text) = &scene.text {
        println!("  {}", interp.process_text(text).dimmed());
    }
    let objects = interp.visible_objects();
    if !objects.is_empty() {
        let names: Vec<String> = objects
            .iter()
            .map(|o| format!("{} [{}]", o.name, o.id))
            .collect();
        println!("  You notice: {}", names.join(", "));
    }
}

fn print_inventory(interp: &Interpreter) {
    let items: Vec<&str> = interp
        .world()
        .map(|w| w.inventory().collect())
        .unwrap_or_default();
    if items.is_empty() {
        println!("  Your hands are empty.");
    } else {
        println!("  You carry: {}", items.join(", "));
    }
}

fn hint(step: Step) -> &'static str {
    match step {
        Step::Line => "Press Enter to continue.",
        Step::Choices => "Type the number of a choice.",
        Step::Outcome => "Type c to continue.",
        Step::Finished => "The story is over.",
    }
}
