//! CLI argument parsing for pdfstack.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, output mode selection, and help text
//! generation.

use clap::Parser;
use std::path::PathBuf;

use crate::artifact::DEFAULT_ARTIFACT_NAME;
use crate::render::{ConsoleRenderer, ListRenderer};
use crate::session::SessionOptions;
use crate::status::{ConsoleSink, JsonSink, StatusSink};

/// Interactively assemble PDF files into a single document.
///
/// pdfstack keeps an ordered selection of PDF files that can be extended,
/// pruned, and reordered before merging into one output document. Without
/// `--merge` it starts an interactive command session.
#[derive(Parser, Debug)]
#[command(name = "pdfstack")]
#[command(version)]
#[command(about = "Interactively assemble PDF files into a single document", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Initial PDF files, directories, or glob patterns (in order)
    ///
    /// Directories are searched recursively for PDF files. Files are
    /// selected in the order provided.
    ///
    /// Examples:
    ///   pdfstack file1.pdf file2.pdf
    ///   pdfstack chapter*.pdf --merge -o book.pdf
    #[arg(value_name = "PATTERN")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// The merged document is saved here automatically after each merge
    /// unless --no-auto-save is given.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_ARTIFACT_NAME)]
    pub output: PathBuf,

    /// Merge the given inputs immediately and exit
    ///
    /// Skips the interactive session: select the inputs, merge once, save
    /// to the output path, and exit.
    #[arg(short, long)]
    pub merge: bool,

    /// Do not save automatically after a merge
    ///
    /// The merged document stays available for a `save` command until it
    /// is released.
    #[arg(long)]
    pub no_auto_save: bool,

    /// Emit status messages as JSON lines
    ///
    /// One JSON object per status message. Useful for scripts and
    /// automation.
    #[arg(long, conflicts_with_all = ["quiet", "verbose"])]
    pub json: bool,

    /// Verbose output - print a version header and extra detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build the session delivery options from the arguments.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            output_path: self.output.clone(),
            auto_save: !self.no_auto_save,
            ..SessionOptions::default()
        }
    }

    /// The status sink matching the selected output mode.
    pub fn status_sink(&self) -> Box<dyn StatusSink> {
        if self.json {
            Box::new(JsonSink::new())
        } else {
            Box::new(ConsoleSink::new(self.quiet))
        }
    }

    /// The list renderer matching the selected output mode.
    ///
    /// JSON mode suppresses the rendered list; status records are the
    /// machine-readable channel.
    pub fn list_renderer(&self) -> Box<dyn ListRenderer> {
        Box::new(ConsoleRenderer::new(self.quiet || self.json))
    }
}
