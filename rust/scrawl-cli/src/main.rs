//! Scrawl CLI — terminal front-end for the Scrawl transcript REPL.

mod colors;
mod presenter;
mod repl;
mod transcript_file;

use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};

use colors::{bold, red};

#[derive(ClapParser)]
#[command(
    name = "scrawl",
    version,
    about = "An interactive transcript REPL over an embedded scripting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive REPL (the default when no command is given)
    Repl,
    /// Evaluate a script file in a fresh session and print the result
    Run {
        /// Path to the script file
        #[arg()]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        None | Some(Commands::Repl) => repl::run_repl(),
        Some(Commands::Run { file }) => cmd_run(&file),
    }
}

fn read_source(path: &PathBuf) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!(
            "{} cannot read file '{}': {}",
            red("error:"),
            bold(&path.display().to_string()),
            e
        );
        std::process::exit(1);
    })
}

fn cmd_run(file: &PathBuf) {
    let source = read_source(file);
    let mut session = scrawl_engine::Session::new();
    match session.eval(&source) {
        Ok(Some(text)) => println!("{}", text),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {}", red("error:"), e);
            std::process::exit(1);
        }
    }
}
