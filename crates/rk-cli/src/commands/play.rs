use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use colored::Colorize;

use super::{Session, SheetCommand};
use crate::SessionArgs;

/// One line typed at the `play` prompt.
#[derive(Parser)]
#[command(name = "rk", no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand)]
enum ReplCommand {
    #[command(flatten)]
    Sheet(SheetCommand),

    /// Show recent rolls, newest first
    History {
        /// Print as markdown
        #[arg(long)]
        markdown: bool,
    },

    /// Forget recent rolls
    ClearHistory,

    /// Skills marked for advancement this session
    Advancements,

    /// Leave the session
    #[command(aliases = ["q", "exit"])]
    Quit,
}

pub fn run(args: &SessionArgs) -> Result<(), String> {
    let mut session = Session::open(args)?;
    let id = session.character();
    let name = session
        .engine_mut()
        .character(id)
        .map_err(|e| e.to_string())?
        .name
        .clone();

    println!("  {} {name}", "Playing".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let parsed = match ReplLine::try_parse_from(input.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("{}", e.to_string().trim_end().yellow());
                continue;
            }
        };

        let result = match parsed.command {
            ReplCommand::Quit => break,
            ReplCommand::Sheet(command) => session.run(command),
            ReplCommand::History { markdown } => {
                print_history(&session, markdown);
                Ok(())
            }
            ReplCommand::ClearHistory => {
                session.engine_mut().clear_history();
                println!("  {}", "history cleared".dimmed());
                Ok(())
            }
            ReplCommand::Advancements => {
                print_advancements(&session);
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("  {}", e.yellow());
        }
        println!();
    }

    Ok(())
}

fn print_history(session: &Session, markdown: bool) {
    let history = session.engine().history();
    if history.is_empty() {
        println!("  {}", "no rolls yet".dimmed());
    } else if markdown {
        print!("{}", history.export_markdown());
    } else {
        print!("{}", history.export_text());
    }
}

fn print_advancements(session: &Session) {
    let marked: Vec<&str> = session
        .engine()
        .advancements()
        .skills_for(session.character())
        .collect();
    if marked.is_empty() {
        println!("  {}", "no skills marked".dimmed());
    } else {
        println!("  marked for advancement: {}", marked.join(", "));
    }
}
