//! Interactive terminal REPL over the Scrawl transcript controller.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::{History, SearchDirection};
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use scrawl_core::{ReplController, Submission};
use scrawl_engine::SessionHandle;

use crate::colors::{bold, cyan, gray, green, red};
use crate::presenter::LinePresenter;
use crate::transcript_file;

type TermController = ReplController<SessionHandle, LinePresenter>;

/// Script keywords for tab completion.
const KEYWORDS: &[&str] = &[
    "fn", "let", "const", "if", "else", "switch", "while", "do", "until", "loop", "for", "in",
    "break", "continue", "return", "throw", "try", "catch", "import", "export", "as", "true",
    "false",
];

/// Builtin functions for tab completion.
const BUILTINS: &[&str] = &[
    "print",
    "debug",
    "to_string",
    "to_debug",
    "type_of",
    "len",
    "push",
    "pop",
    "insert",
    "remove",
    "contains",
    "clear",
    "keys",
    "values",
    "is_empty",
    "abs",
    "sign",
    "floor",
    "ceil",
    "round",
    "sqrt",
    "min",
    "max",
    "range",
    "to_upper",
    "to_lower",
    "trim",
    "split",
    "replace",
    "sub_string",
];

/// REPL commands for tab completion.
const COMMANDS: &[&str] = &[
    ":help",
    ":quit",
    ":reset",
    ":clear",
    ":history",
    ":transcript",
    ":save",
    ":load",
];

/// Environment variable used to override REPL history location.
const REPL_HISTORY_PATH_ENV: &str = "SCRAWL_REPL_HISTORY_PATH";

/// Completer for the REPL.
struct ScrawlCompleter;

impl Completer for ScrawlCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || c == '(' || c == '[' || c == '{')
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];

        if word.is_empty() {
            return Ok((start, Vec::new()));
        }

        let mut candidates = Vec::new();

        // Match commands (only if at line start)
        if line.trim_start() == word && word.starts_with(':') {
            for &cmd in COMMANDS {
                if cmd.starts_with(word) {
                    candidates.push(Pair {
                        display: cmd.to_string(),
                        replacement: cmd.to_string(),
                    });
                }
            }
        } else {
            for &kw in KEYWORDS {
                if kw.starts_with(word) {
                    candidates.push(Pair {
                        display: kw.to_string(),
                        replacement: kw.to_string(),
                    });
                }
            }

            for &builtin in BUILTINS {
                if builtin.starts_with(word) {
                    candidates.push(Pair {
                        display: builtin.to_string(),
                        replacement: builtin.to_string(),
                    });
                }
            }
        }

        Ok((start, candidates))
    }
}

impl Hinter for ScrawlCompleter {
    type Hint = String;
}

impl Highlighter for ScrawlCompleter {}

impl Validator for ScrawlCompleter {}

impl Helper for ScrawlCompleter {}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    Help,
    Reset,
    Clear,
    History,
    Transcript,
    Save(&'a str),
    Load(&'a str),
}

#[derive(Debug, PartialEq, Eq)]
enum ParsedCommand<'a> {
    NotACommand,
    UnknownCommand,
    InvalidUsage(&'static str),
    Command(ReplCommand<'a>),
}

fn parse_repl_command(line: &str) -> ParsedCommand<'_> {
    let trimmed = line.trim();
    if !trimmed.starts_with(':') {
        return ParsedCommand::NotACommand;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match cmd {
        ":quit" | ":q" => ParsedCommand::Command(ReplCommand::Quit),
        ":help" | ":h" => ParsedCommand::Command(ReplCommand::Help),
        ":reset" | ":r" => ParsedCommand::Command(ReplCommand::Reset),
        ":clear" | ":c" => ParsedCommand::Command(ReplCommand::Clear),
        ":history" => ParsedCommand::Command(ReplCommand::History),
        ":transcript" | ":t" => ParsedCommand::Command(ReplCommand::Transcript),
        ":save" => match arg {
            Some(path) => ParsedCommand::Command(ReplCommand::Save(path)),
            None => ParsedCommand::InvalidUsage("Usage: :save <file>"),
        },
        ":load" => match arg {
            Some(path) => ParsedCommand::Command(ReplCommand::Load(path)),
            None => ParsedCommand::InvalidUsage("Usage: :load <file>"),
        },
        _ => ParsedCommand::UnknownCommand,
    }
}

pub fn run_repl() {
    println!("{}", bold(&cyan("Scrawl REPL v0.1.0")));
    println!(
        "{}\n",
        gray("Type :help for available commands, :quit to exit.")
    );

    // Set up rustyline editor
    let config = rustyline::Config::builder().auto_add_history(true).build();
    let mut rl = Editor::with_config(config).expect("Failed to create editor");
    rl.set_helper(Some(ScrawlCompleter));

    // Load history from default or configured path.
    let history_path = get_history_path();
    if let Some(ref path) = history_path {
        if path.exists() {
            if let Err(err) = rl.load_history(path) {
                eprintln!(
                    "{} failed to load history from {}: {}",
                    red("Warning:"),
                    path.display(),
                    err
                );
            }
        }
    }

    let mut controller = ReplController::new(SessionHandle::new(), LinePresenter);
    let mut multiline_buffer = String::new();

    loop {
        let prompt = if multiline_buffer.is_empty() {
            format!("{} ", green("scrawl>"))
        } else {
            format!("{}     ", gray("..."))
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                // Empty lines: inside a continuation they extend the
                // buffer; at a fresh prompt they go through the controller,
                // which ignores them (and would scroll the last entry back
                // into view on a windowed front-end).
                if line.trim().is_empty() {
                    if multiline_buffer.is_empty() {
                        submit_line(&mut controller, &line);
                    } else {
                        multiline_buffer.push('\n');
                        multiline_buffer.push_str(&line);
                    }
                    continue;
                }

                // Handle commands only on a fresh prompt
                if multiline_buffer.is_empty() {
                    if let Some(keep_going) = handle_command(&line, &mut rl, &mut controller) {
                        if !keep_going {
                            break; // :quit
                        }
                        continue;
                    }
                }

                // Accumulate input
                if !multiline_buffer.is_empty() {
                    multiline_buffer.push('\n');
                }
                multiline_buffer.push_str(&line);

                // Check if we need more input
                if needs_more_input(&multiline_buffer) {
                    continue;
                }

                let input = std::mem::take(&mut multiline_buffer);
                submit_line(&mut controller, &input);
            }
            Err(ReadlineError::Interrupted) => {
                multiline_buffer.clear();
                println!("{}", gray("(Ctrl-D to exit)"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", red("Error:"), err);
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                eprintln!(
                    "{} failed to create history directory {}: {}",
                    red("Warning:"),
                    parent.display(),
                    err
                );
            }
        }
        if let Err(err) = rl.save_history(path) {
            eprintln!(
                "{} failed to save history to {}: {}",
                red("Warning:"),
                path.display(),
                err
            );
        }
    }

    println!("\n{}", cyan("Goodbye!"));
}

/// Submit one complete input through the controller and wait for its
/// evaluation, so the prompt comes back after the transcript line prints.
fn submit_line(controller: &mut TermController, input: &str) {
    match controller.submit(input) {
        Submission::Ignored => {}
        Submission::Accepted(pending) => {
            if let Err(err) = controller.complete(pending) {
                eprintln!("{} {}", red("Error:"), err);
            }
        }
    }
}

/// Resolve the path to the history file.
///
/// Rules:
/// - `SCRAWL_REPL_HISTORY_PATH` set to an absolute path: use as-is.
/// - `SCRAWL_REPL_HISTORY_PATH` set to `~/...`: resolve under HOME.
/// - `SCRAWL_REPL_HISTORY_PATH` set to a relative path: resolve under HOME.
/// - Otherwise: `${HOME}/.scrawl/repl_history`.
fn resolve_history_path(home: Option<&Path>, override_path: Option<&str>) -> Option<PathBuf> {
    let home_path = || home.map(Path::to_path_buf);

    if let Some(raw) = override_path
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        if raw == "~" {
            return home_path();
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            let mut path = home_path()?;
            path.push(rest);
            return Some(path);
        }

        let configured = PathBuf::from(raw);
        if configured.is_relative() {
            let mut base = home_path()?;
            base.push(configured);
            return Some(base);
        }
        return Some(configured);
    }

    let mut default_path = home_path()?;
    default_path.push(".scrawl");
    default_path.push("repl_history");
    Some(default_path)
}

fn get_history_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let override_path = std::env::var(REPL_HISTORY_PATH_ENV).ok();
    resolve_history_path(home.as_deref(), override_path.as_deref())
}

/// Handle REPL commands. Returns Some(true) to continue, Some(false) to
/// quit, None if the line is not a command.
fn handle_command<H: Helper>(
    line: &str,
    rl: &mut Editor<H, rustyline::history::DefaultHistory>,
    controller: &mut TermController,
) -> Option<bool> {
    match parse_repl_command(line) {
        ParsedCommand::NotACommand => None,
        ParsedCommand::UnknownCommand => {
            eprintln!("{} unknown command. Type :help for usage.", red("Error:"));
            Some(true)
        }
        ParsedCommand::InvalidUsage(usage) => {
            eprintln!("{} {}", red("Error:"), usage);
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::Quit) => Some(false),
        ParsedCommand::Command(ReplCommand::Help) => {
            print_help();
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::Reset) => {
            controller.evaluator_mut().reset();
            println!(
                "{}",
                gray("Session reset. The transcript keeps its entries.")
            );
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::Clear) => {
            print!("\x1b[2J\x1b[H"); // Clear screen and move cursor to top
            io::stdout().flush().ok();
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::History) => {
            let history = rl.history();
            for i in 0..history.len() {
                if let Ok(Some(result)) = history.get(i, SearchDirection::Forward) {
                    println!("{:4} {}", gray(&format!("{}", i + 1)), result.entry);
                }
            }
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::Transcript) => {
            cmd_transcript(controller);
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::Save(path)) => {
            cmd_save(path, controller);
            Some(true)
        }
        ParsedCommand::Command(ReplCommand::Load(path)) => {
            cmd_load(path, controller);
            Some(true)
        }
    }
}

/// Handle the :transcript command — re-render every entry with its index.
fn cmd_transcript(controller: &TermController) {
    if controller.transcript().is_empty() {
        println!("{}", gray("Transcript is empty."));
        return;
    }

    for (i, entry) in controller.transcript().iter().enumerate() {
        let marker = if entry.outcome.is_pending() {
            gray(" (pending)")
        } else {
            String::new()
        };
        println!(
            "{:4} {}{}",
            gray(&format!("{}", i)),
            entry.display_line(),
            marker
        );
    }
}

/// Handle the :save command — export the transcript as JSON.
fn cmd_save(path: &str, controller: &TermController) {
    match transcript_file::save(Path::new(path), controller.transcript()) {
        Ok(()) => println!(
            "{}",
            gray(&format!(
                "Saved {} entries to {}",
                controller.transcript().len(),
                path
            ))
        ),
        Err(err) => eprintln!("{} {}", red("Error:"), err),
    }
}

/// Handle the :load command — submit a script file as one transcript entry.
fn cmd_load(path: &str, controller: &mut TermController) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} Failed to read {}: {}", red("Error:"), path, e);
            return;
        }
    };

    submit_line(controller, &source);
}

/// Determine if input has unclosed delimiters and should keep reading.
fn needs_more_input(input: &str) -> bool {
    let mut parens = 0;
    let mut brackets = 0;
    let mut braces = 0;
    for ch in input.chars() {
        match ch {
            '(' => parens += 1,
            ')' => parens -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            '{' => braces += 1,
            '}' => braces -= 1,
            _ => {}
        }
    }

    parens > 0 || brackets > 0 || braces > 0
}

fn print_help() {
    println!("{}", bold("Commands:"));
    println!("  {}  {}", cyan(":help, :h"), gray("Show this help"));
    println!("  {}  {}", cyan(":quit, :q"), gray("Exit the REPL"));
    println!(
        "  {}  {}",
        cyan(":reset, :r"),
        gray("Start a fresh interpreter session")
    );
    println!(
        "  {}  {}",
        cyan(":clear, :c"),
        gray("Clear terminal screen")
    );
    println!(
        "  {}  {}",
        cyan(":transcript, :t"),
        gray("Re-render the full transcript")
    );
    println!(
        "  {}  {}",
        cyan(":save <file>"),
        gray("Export the transcript as JSON")
    );
    println!(
        "  {}  {}",
        cyan(":load <file>"),
        gray("Evaluate a script file as one entry")
    );
    println!("  {}  {}", cyan(":history"), gray("Show command history"));
    println!();
    println!("{}", gray("Features:"));
    println!("  {}", gray("• Arrow keys for navigation"));
    println!(
        "  {}",
        gray("• Tab completion for keywords, builtins, commands")
    );
    if let Some(path) = get_history_path() {
        println!(
            "  {}",
            gray(&format!(
                "• History persistence in {} (override with ${})",
                path.display(),
                REPL_HISTORY_PATH_ENV
            ))
        );
    } else {
        println!(
            "  {}",
            gray("• History persistence disabled (HOME not set)")
        );
    }
    println!(
        "  {}",
        gray("• Multi-line input (open delimiters continue the prompt)")
    );
    println!(
        "  {}",
        gray("• Session state (variables and fn definitions persist)")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_more_input() {
        assert!(needs_more_input("print("));
        assert!(needs_more_input("let x = [1, 2"));
        assert!(needs_more_input("fn f(x) {"));
        assert!(!needs_more_input("print(1)"));
        assert!(!needs_more_input("let x = [1, 2]"));
        assert!(!needs_more_input("fn f(x) { x * 2 }"));
    }

    #[test]
    fn test_parse_repl_command() {
        assert_eq!(
            parse_repl_command(":save out.json"),
            ParsedCommand::Command(ReplCommand::Save("out.json"))
        );
        assert_eq!(
            parse_repl_command(":load demo.rhai"),
            ParsedCommand::Command(ReplCommand::Load("demo.rhai"))
        );
        assert_eq!(
            parse_repl_command(":save"),
            ParsedCommand::InvalidUsage("Usage: :save <file>")
        );
        assert_eq!(
            parse_repl_command(":t"),
            ParsedCommand::Command(ReplCommand::Transcript)
        );
        assert_eq!(parse_repl_command(":nope"), ParsedCommand::UnknownCommand);
        assert_eq!(parse_repl_command("1 + 1"), ParsedCommand::NotACommand);
    }

    #[test]
    fn test_resolve_history_path() {
        let home = Path::new("/home/tester");

        assert_eq!(
            resolve_history_path(Some(home), None),
            Some(PathBuf::from("/home/tester/.scrawl/repl_history"))
        );
        assert_eq!(
            resolve_history_path(Some(home), Some("repl/history.log")),
            Some(PathBuf::from("/home/tester/repl/history.log"))
        );
        assert_eq!(
            resolve_history_path(Some(home), Some("~/logs/repl.log")),
            Some(PathBuf::from("/home/tester/logs/repl.log"))
        );
        assert_eq!(
            resolve_history_path(Some(home), Some("/tmp/repl.log")),
            Some(PathBuf::from("/tmp/repl.log"))
        );
        assert_eq!(resolve_history_path(None, Some("relative.log")), None);
    }
}
