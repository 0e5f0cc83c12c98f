//! pdfstack - Interactively assemble PDF files into a single document.
//!
//! This library implements an interactive PDF assembler: an ordered,
//! reorderable selection of input files that merges on request into one
//! output document. It provides:
//!
//! - An ordered selection store with append, positional removal, and
//!   permutation-based reordering
//! - A drag-gesture controller translating pointer interactions over the
//!   rendered list into permutations (preview-only until drop)
//! - A strictly sequential merge pipeline that aborts on the first file
//!   that fails to decode
//! - A pluggable document engine boundary, backed by `lopdf`
//! - Artifact delivery with automatic and manual saves and a bounded
//!   availability window
//!
//! # Examples
//!
//! ## One-shot merge
//!
//! ```no_run
//! use pdfstack::engine::LopdfEngine;
//! use pdfstack::input::SourceFile;
//! use pdfstack::merge::MergePipeline;
//! use pdfstack::selection::SelectionStore;
//! use pdfstack::status::ConsoleSink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SelectionStore::new();
//! store.append([
//!     SourceFile::from_path("a.pdf"),
//!     SourceFile::from_path("b.pdf"),
//! ]);
//!
//! let pipeline = MergePipeline::new(LopdfEngine::new());
//! let output = pipeline.merge(&store.snapshot(), &ConsoleSink::new(false)).await?;
//! println!("Merged {} pages", output.statistics.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving a session
//!
//! ```no_run
//! use pdfstack::cli::Cli;
//! use pdfstack::engine::LopdfEngine;
//! use pdfstack::merge::MergePipeline;
//! use pdfstack::session::{Session, SessionOptions};
//! use clap::Parser;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cli = Cli::parse();
//! let mut session = Session::new(
//!     MergePipeline::new(LopdfEngine::new()),
//!     cli.list_renderer(),
//!     cli.status_sink(),
//!     cli.session_options(),
//! );
//! session.add_patterns(&cli.inputs)?;
//! session.merge().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod cli;
pub mod engine;
pub mod error;
pub mod input;
pub mod merge;
pub mod render;
pub mod reorder;
pub mod selection;
pub mod session;
pub mod status;

// Re-export commonly used types
pub use error::{PdfStackError, Result};
pub use session::{Session, SessionOptions};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
