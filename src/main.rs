//! pdfstack - Interactively assemble PDF files into a single document.
//!
//! The binary runs either a one-shot merge (`--merge`) or an interactive
//! command session over stdin.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use pdfstack::cli::Cli;
use pdfstack::engine::{DocumentEngine, LopdfEngine};
use pdfstack::error::PdfStackError;
use pdfstack::merge::MergePipeline;
use pdfstack::session::Session;

const HELP: &str = "Commands:
  add <pattern>...   add files, directories, or globs to the selection
  list               show the current selection
  rm <n>             remove the file at position n
  mv <n> <m>         move the file at position n to position m
  merge              merge the selection into one document
  save [path]        save the most recent merge result
  help               show this help
  quit               exit";

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfStackError> {
    if cli.verbose {
        println!("{} v{}", pdfstack::NAME, pdfstack::VERSION);
    }

    let mut session = Session::new(
        MergePipeline::new(LopdfEngine::new()),
        cli.list_renderer(),
        cli.status_sink(),
        cli.session_options(),
    );

    if !cli.inputs.is_empty() {
        session.add_patterns(&cli.inputs)?;
    }

    if cli.merge {
        session.merge().await?;
        return Ok(());
    }

    interactive_loop(&mut session).await
}

/// One interactive command.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add(Vec<String>),
    List,
    Remove(usize),
    Move(usize, usize),
    Merge,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `Ok(None)` for a blank line; `Err` carries a
    /// usage message for the user.
    fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Ok(None);
        };

        let command = match word {
            "add" => {
                let patterns: Vec<String> = tokens.map(str::to_string).collect();
                if patterns.is_empty() {
                    return Err("Usage: add <pattern>...".to_string());
                }
                Command::Add(patterns)
            }
            "list" | "ls" => Command::List,
            "rm" | "remove" => {
                Command::Remove(parse_position(tokens.next(), "Usage: rm <n>")?)
            }
            "mv" | "move" => {
                let from = parse_position(tokens.next(), "Usage: mv <n> <m>")?;
                let to = parse_position(tokens.next(), "Usage: mv <n> <m>")?;
                Command::Move(from, to)
            }
            "merge" => Command::Merge,
            "save" => Command::Save(tokens.next().map(PathBuf::from)),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(format!("Unknown command: {other}. Type help for commands."));
            }
        };
        Ok(Some(command))
    }
}

/// Parse a 1-based list position into a 0-based index.
fn parse_position(token: Option<&str>, usage: &str) -> Result<usize, String> {
    token
        .and_then(|t| t.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| usage.to_string())
}

/// Read and dispatch commands until quit or end of input.
async fn interactive_loop<E: DocumentEngine>(
    session: &mut Session<E>,
) -> Result<(), PdfStackError> {
    session.notify("pdfstack interactive session. Type help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                session.notify(&usage);
                continue;
            }
        };

        let result = match command {
            Command::Add(patterns) => session.add_patterns(patterns),
            Command::List => {
                session.list();
                Ok(())
            }
            Command::Remove(position) => session.remove(position),
            Command::Move(from, to) => session.move_item(from, to),
            Command::Merge => session.merge().await,
            Command::Save(path) => session.save(path.as_deref()).await.map(|_| ()),
            Command::Help => {
                session.notify(HELP);
                Ok(())
            }
            Command::Quit => break,
        };

        if let Err(err) = result {
            if err.is_recoverable() {
                session.report_failure(&err);
            } else {
                return Err(err);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            Command::parse("add a.pdf ch*.pdf").unwrap(),
            Some(Command::Add(vec!["a.pdf".to_string(), "ch*.pdf".to_string()]))
        );
        assert!(Command::parse("add").is_err());
    }

    #[test]
    fn test_parse_positions_are_one_based() {
        assert_eq!(Command::parse("rm 1").unwrap(), Some(Command::Remove(0)));
        assert_eq!(Command::parse("mv 3 1").unwrap(), Some(Command::Move(2, 0)));
    }

    #[test]
    fn test_parse_rejects_zero_and_garbage_positions() {
        assert!(Command::parse("rm 0").is_err());
        assert!(Command::parse("rm x").is_err());
        assert!(Command::parse("mv 1").is_err());
    }

    #[test]
    fn test_parse_save_with_optional_path() {
        assert_eq!(Command::parse("save").unwrap(), Some(Command::Save(None)));
        assert_eq!(
            Command::parse("save out.pdf").unwrap(),
            Some(Command::Save(Some(PathBuf::from("out.pdf"))))
        );
    }

    #[test]
    fn test_parse_aliases_and_unknown() {
        assert_eq!(Command::parse("ls").unwrap(), Some(Command::List));
        assert_eq!(Command::parse("q").unwrap(), Some(Command::Quit));
        assert!(Command::parse("frobnicate").is_err());
    }
}
