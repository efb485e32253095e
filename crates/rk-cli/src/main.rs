//! Terminal character sheet for the Rollkeeper roll engine.

mod commands;
mod sheet_file;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::SheetCommand;

#[derive(Parser)]
#[command(
    name = "rk",
    about = "Rollkeeper: dice rolls and rules resolution for your character sheet",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that opens a sheet.
#[derive(Args, Clone)]
pub(crate) struct SessionArgs {
    /// Character sheet file
    #[arg(short = 'f', long, global = true, default_value = "character.json")]
    sheet: PathBuf,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of rolls kept in the history
    #[arg(long, global = true)]
    history: Option<usize>,

    /// Engine config file (JSON); --seed and --history override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new character sheet
    Init {
        /// Character name
        name: String,

        /// Maximum hit points
        #[arg(long, default_value = "10")]
        hp: i32,

        /// Maximum willpower points
        #[arg(long, default_value = "10")]
        wp: i32,

        /// Skill level, e.g. `--skill Swords=12` (repeatable)
        #[arg(short, long = "skill", value_name = "NAME=LEVEL")]
        skills: Vec<String>,
    },

    /// Start an interactive session with a roll history
    Play,

    #[command(flatten)]
    Sheet(SheetCommand),
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            name,
            hp,
            wp,
            skills,
        } => commands::init::run(&cli.session.sheet, &name, hp, wp, &skills),
        Commands::Play => commands::play::run(&cli.session),
        Commands::Sheet(command) => {
            commands::Session::open(&cli.session).and_then(|mut s| s.run(command))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RK_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
