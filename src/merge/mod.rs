//! The merge pipeline.
//!
//! Turns a snapshot of the ordered selection into a single output
//! artifact. Strictly sequential per file, and aborted in full on the
//! first file that cannot be read or decoded.

pub mod pipeline;

pub use pipeline::{MergeOutput, MergePipeline, MergeStatistics};
