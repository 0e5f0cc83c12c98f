//! Error types for pdfstack.
//!
//! All failures surface through a single enum so that every user-visible
//! error carries a specific, actionable message. The taxonomy distinguishes
//! recoverable user-input errors (empty selection, bad position) from merge
//! aborts (a file that cannot be read or decoded), delivery warnings
//! (automatic save failed) and internal contract violations (a malformed
//! reorder permutation, which can only come from a gesture-translation bug).

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfstack operations.
pub type Result<T> = std::result::Result<T, PdfStackError>;

/// Main error type for pdfstack operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfStackError {
    /// A merge was requested with no files in the selection.
    #[error("Please select at least one PDF file.")]
    EmptySelection,

    /// A remove or drag request referenced a position outside the selection.
    #[error("Position {position} is out of range for a selection of {len} file(s)")]
    PositionOutOfRange {
        /// Requested 0-based position.
        position: usize,
        /// Current selection length.
        len: usize,
    },

    /// A reorder permutation was not a bijection over the current positions.
    ///
    /// This indicates a bug in gesture translation, not a user error.
    #[error("Internal error: reorder permutation is invalid: {detail}")]
    InvalidPermutation {
        /// What was wrong with the permutation.
        detail: String,
    },

    /// An input file's bytes could not be read.
    #[error("Failed to read {name}: {source}")]
    ReadFailed {
        /// Display name of the offending file.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An input file could not be decoded as a PDF.
    #[error("Error processing {name}: {reason}")]
    DecodeFailed {
        /// Display name of the offending file.
        name: String,
        /// Reason reported by the document engine.
        reason: String,
    },

    /// The document engine failed while assembling or serializing output.
    #[error("Failed to assemble output document: {reason}")]
    EngineFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Automatic save of the merged artifact failed (non-fatal).
    #[error("Automatic save failed: {reason}")]
    DeliveryFailed {
        /// Reason the save did not complete.
        reason: String,
    },

    /// The merged artifact has already been released.
    #[error("The merged document is no longer available; run merge again")]
    ArtifactReleased,

    /// Failed to create the output file.
    #[error("Failed to create output file: {path}\n  Reason: {source}")]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to the output file.
    #[error("Failed to write to output file: {path}\n  Reason: {source}")]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A glob pattern could not be parsed.
    #[error("Failed to parse glob pattern: {0}")]
    FailedToParseGlobPattern(#[from] glob::PatternError),

    /// A glob entry could not be read.
    #[error("Failed to process glob entry: {0}")]
    FailedToProcessGlobEntry(#[from] glob::GlobError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PdfStackError {
    /// Create a DecodeFailed error.
    pub fn decode_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EngineFailed error.
    pub fn engine_failed(reason: impl Into<String>) -> Self {
        Self::EngineFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidPermutation error.
    pub fn invalid_permutation(detail: impl Into<String>) -> Self {
        Self::InvalidPermutation {
            detail: detail.into(),
        }
    }

    /// Check if this error is recoverable within the running session.
    ///
    /// Recoverable errors terminate only the current operation; the
    /// selection is untouched and the user may adjust it and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection
                | Self::PositionOutOfRange { .. }
                | Self::ReadFailed { .. }
                | Self::DecodeFailed { .. }
                | Self::DeliveryFailed { .. }
                | Self::ArtifactReleased
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptySelection => 1,
            Self::PositionOutOfRange { .. } => 1,
            Self::InvalidPermutation { .. } => 70, // Internal software error
            Self::ReadFailed { .. } => 2,
            Self::DecodeFailed { .. } => 3,
            Self::EngineFailed { .. } => 6,
            Self::DeliveryFailed { .. } => 4,
            Self::ArtifactReleased => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::FailedToParseGlobPattern(_) => 2,
            Self::FailedToProcessGlobEntry(_) => 2,
            Self::Io(_) => 5,
        }
    }
}
