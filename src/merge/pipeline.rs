//! Core merge pipeline implementation.
//!
//! The pipeline consumes a snapshot of the selection taken at invocation
//! time, so reordering during an in-flight merge affects only subsequent
//! invocations. Files are ingested strictly sequentially; the output's
//! page order is exactly the concatenation of per-file page orders in
//! snapshot order. A file that fails to read or decode aborts the entire
//! invocation before any later file is touched, and no artifact is
//! produced.

use std::time::{Duration, Instant};

use crate::artifact::{Artifact, DEFAULT_ARTIFACT_NAME};
use crate::engine::DocumentEngine;
use crate::error::{PdfStackError, Result};
use crate::selection::FileHandle;
use crate::status::StatusSink;

/// Statistics about a merge invocation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of input files merged.
    pub files_merged: usize,
    /// Total number of pages in the output.
    pub total_pages: usize,
    /// Total time taken for the merge.
    pub merge_time: Duration,
}

/// Result of a successful merge invocation.
#[derive(Debug)]
pub struct MergeOutput {
    /// The packaged output document.
    pub artifact: Artifact,
    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Merge pipeline over a document engine.
#[derive(Debug, Clone)]
pub struct MergePipeline<E> {
    engine: E,
    artifact_name: String,
}

impl<E: DocumentEngine> MergePipeline<E> {
    /// Create a pipeline with the default artifact name.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
        }
    }

    /// Create a pipeline producing artifacts under a custom name.
    pub fn with_artifact_name(engine: E, name: impl Into<String>) -> Self {
        Self {
            engine,
            artifact_name: name.into(),
        }
    }

    /// The engine backing this pipeline.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Merge a selection snapshot into a single artifact.
    ///
    /// Writes a processing message to `sink` when work begins. Each file
    /// is read and decoded in snapshot order; every page of each decoded
    /// document is appended to the output in its original intra-document
    /// order.
    ///
    /// # Errors
    ///
    /// - [`PdfStackError::EmptySelection`] for an empty snapshot, before
    ///   any engine call is made.
    /// - [`PdfStackError::ReadFailed`] / [`PdfStackError::DecodeFailed`]
    ///   naming the offending file; the pipeline aborts immediately and
    ///   later files are never attempted.
    /// - [`PdfStackError::EngineFailed`] if page copying or serialization
    ///   fails.
    pub async fn merge(
        &self,
        snapshot: &[FileHandle],
        sink: &dyn StatusSink,
    ) -> Result<MergeOutput> {
        if snapshot.is_empty() {
            return Err(PdfStackError::EmptySelection);
        }

        sink.write(&format!("Processing {} file(s)...", snapshot.len()));
        let start = Instant::now();

        let mut output = self.engine.create_empty();
        let mut total_pages = 0;

        for handle in snapshot {
            let bytes = handle.read_bytes().await?;
            let decoded = self.engine.load(&bytes).map_err(|e| {
                PdfStackError::decode_failed(handle.name(), e.to_string())
            })?;

            let indices = self.engine.page_indices(&decoded);
            for page in self.engine.copy_pages(&decoded, &indices)? {
                self.engine.append_page(&mut output, page)?;
                total_pages += 1;
            }
        }

        let bytes = self.engine.serialize(&mut output)?;

        Ok(MergeOutput {
            artifact: Artifact::new(bytes, self.artifact_name.clone()),
            statistics: MergeStatistics {
                files_merged: snapshot.len(),
                total_pages,
                merge_time: start.elapsed(),
            },
        })
    }
}
