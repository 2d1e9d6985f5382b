//! CLI frontend for the Leave narrative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "leave",
    about = "Leave: play and check branching visual novel stories",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story in the terminal
    Play {
        /// Story file (JSON)
        story: PathBuf,

        /// Player name
        #[arg(short, long)]
        name: Option<String>,

        /// Player portrait reference
        #[arg(short, long)]
        portrait: Option<String>,

        /// Selectable character as NAME or NAME=PORTRAIT (repeatable)
        #[arg(short, long = "character")]
        characters: Vec<String>,

        /// Keep unrecognized actions instead of rejecting the story
        #[arg(long)]
        lenient: bool,
    },

    /// Load a story and report broken links and suspicious scenes
    Check {
        /// Story file (JSON)
        story: PathBuf,

        /// Keep unrecognized actions instead of rejecting the story
        #[arg(long)]
        lenient: bool,
    },

    /// Summarize a story
    Info {
        /// Story file (JSON)
        story: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            story,
            name,
            portrait,
            characters,
            lenient,
        } => commands::play::run(
            &story,
            name.as_deref(),
            portrait.as_deref(),
            &characters,
            lenient,
        ),
        Commands::Check { story, lenient } => commands::check::run(&story, lenient),
        Commands::Info { story } => commands::info::run(&story),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
