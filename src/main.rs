//! `visuals` command-line tool.
//!
//! The only command is `visuals add visual`, which copies the bundled
//! visual template into the current project. Anything else prints usage.

mod scaffold;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const USAGE: &str = "Usage: visuals add visual";

#[derive(Parser, Debug)]
#[command(name = "visuals", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a file to the current project.
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },
}

#[derive(Subcommand, Debug)]
enum AddTarget {
    /// Copy the visual template to src/components/ui/visual.rs.
    Visual,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match Cli::try_parse() {
        Ok(Cli {
            command: Some(Command::Add {
                target: AddTarget::Visual,
            }),
        }) => add_visual(),
        _ => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
    }
}

fn add_visual() -> ExitCode {
    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("cannot determine the current directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    match scaffold::add_visual(&root) {
        Ok(out) => {
            if let Some(dir) = out.created_dir {
                println!("Created folder: {}", dir.display());
            }
            println!(
                "{} has been created at {}/",
                scaffold::DEST_FILE,
                scaffold::DEST_DIR
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
