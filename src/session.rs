//! The interactive session.
//!
//! Glues the selection store, the drag controller, the merge pipeline, the
//! renderer, and the status sink into one unit of control. Every successful
//! mutation of the selection writes exactly one status message and rebuilds
//! the rendered list; drag hovers render the preview order without touching
//! the store.
//!
//! All session methods run on a single async task. A merge operates on a
//! snapshot of the selection taken at invocation time, so mutating the
//! selection afterwards only affects the next merge.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::artifact::{ArtifactSlot, DEFAULT_ARTIFACT_NAME, RELEASE_DELAY};
use crate::engine::DocumentEngine;
use crate::error::{PdfStackError, Result};
use crate::input::{collect_source_files, SourceFile};
use crate::merge::MergePipeline;
use crate::render::{project, ListRenderer, ListRow};
use crate::reorder::{DragController, HoverSide};
use crate::selection::SelectionStore;
use crate::status::StatusSink;

/// Delivery configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Where the automatic save writes the artifact.
    pub output_path: PathBuf,
    /// Whether to save automatically after a successful merge.
    pub auto_save: bool,
    /// How long the artifact stays available after packaging.
    pub release_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_ARTIFACT_NAME),
            auto_save: true,
            release_delay: RELEASE_DELAY,
        }
    }
}

/// One interactive assembly session.
pub struct Session<E: DocumentEngine> {
    store: SelectionStore,
    drag: DragController,
    pipeline: MergePipeline<E>,
    renderer: Box<dyn ListRenderer>,
    sink: Box<dyn StatusSink>,
    slot: ArtifactSlot,
    merging: bool,
    options: SessionOptions,
}

impl<E: DocumentEngine> Session<E> {
    /// Create a session over an engine-backed pipeline.
    pub fn new(
        pipeline: MergePipeline<E>,
        renderer: Box<dyn ListRenderer>,
        sink: Box<dyn StatusSink>,
        options: SessionOptions,
    ) -> Self {
        Self {
            store: SelectionStore::new(),
            drag: DragController::new(),
            pipeline,
            renderer,
            sink,
            slot: ArtifactSlot::empty(),
            merging: false,
            options,
        }
    }

    /// The current selection.
    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// The slot holding the most recent artifact, if not yet released.
    pub fn artifact_slot(&self) -> &ArtifactSlot {
        &self.slot
    }

    /// Resolve `patterns` and add the resulting batch to the selection.
    ///
    /// # Errors
    ///
    /// Propagates glob parse and filesystem errors from pattern expansion;
    /// the selection is unchanged in that case.
    pub fn add_patterns<T>(&mut self, patterns: T) -> Result<()>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let files = collect_source_files(patterns)?;
        self.add_files(files);
        Ok(())
    }

    /// Append a batch of files to the end of the selection.
    ///
    /// An empty batch leaves the selection untouched and reports
    /// "No files selected.".
    pub fn add_files(&mut self, files: Vec<SourceFile>) {
        if files.is_empty() {
            self.sink.write("No files selected.");
            return;
        }
        let added = self.store.append(files);
        self.sink.write(&format!(
            "{} file(s) added. Total: {} file(s).",
            added,
            self.store.len()
        ));
        self.render();
    }

    /// Remove the file at a 0-based position.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::PositionOutOfRange`] for an invalid
    /// position; the selection is unchanged.
    pub fn remove(&mut self, position: usize) -> Result<()> {
        self.store.remove_at(position)?;
        self.sink.write(&format!(
            "File removed. Total: {} file(s).",
            self.store.len()
        ));
        self.render();
        Ok(())
    }

    /// Move the file at `from` so it ends up at position `to`.
    ///
    /// Driven through the drag controller, so the resulting permutation is
    /// exactly what a pointer drag to that slot would produce.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::PositionOutOfRange`] if either position is
    /// invalid.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.store.len();
        if to >= len {
            return Err(PdfStackError::PositionOutOfRange { position: to, len });
        }
        if !self.drag.begin(from, len) {
            return Err(PdfStackError::PositionOutOfRange { position: from, len });
        }
        if from == to {
            self.drag.cancel();
            return Ok(());
        }
        // Dropping below the target's midline lands after it when moving
        // down; above lands before it when moving up. Either way the item
        // settles at `to`.
        let side = if from < to {
            HoverSide::Below
        } else {
            HoverSide::Above
        };
        self.drag.hover(to, side);
        self.drop_drag()
    }

    /// Begin a drag on the row carrying original position `source`.
    ///
    /// Returns whether the gesture started.
    pub fn begin_drag(&mut self, source: usize) -> bool {
        self.drag.begin(source, self.store.len())
    }

    /// Update the drag preview for a pointer over the row carrying original
    /// position `target`, and render the preview order.
    pub fn hover_drag(&mut self, target: usize, side: HoverSide) {
        self.drag.hover(target, side);
        if let Some(preview) = self.drag.preview() {
            let rows = self.preview_rows(preview);
            self.renderer.render(&rows);
        }
    }

    /// Drop the drag: commit the final visual order to the store.
    pub fn drop_drag(&mut self) -> Result<()> {
        let Some(permutation) = self.drag.drop() else {
            return Ok(());
        };
        self.store.reorder(&permutation)?;
        self.sink.write(&format!(
            "File order updated. Total: {} file(s).",
            self.store.len()
        ));
        self.render();
        Ok(())
    }

    /// Cancel the drag and revert the rendered list to the store's order.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.render();
    }

    /// Merge the current selection into a fresh artifact.
    ///
    /// On success the artifact is held in the session's slot, saved
    /// automatically when configured (a save failure is a non-fatal addendum
    /// to the success message), and released after the configured delay.
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors; the selection and any previously held
    /// artifact are unchanged on failure.
    pub async fn merge(&mut self) -> Result<()> {
        if self.merging {
            self.sink.write("A merge is already in progress.");
            return Ok(());
        }
        self.merging = true;
        let snapshot = self.store.snapshot();
        let result = self.pipeline.merge(&snapshot, self.sink.as_ref()).await;
        self.merging = false;
        let output = result?;

        let stats = output.statistics;
        self.slot = ArtifactSlot::holding(output.artifact);
        self.slot.release_after(self.options.release_delay);

        let mut message = format!(
            "PDFs merged successfully! {} page(s) from {} file(s).",
            stats.total_pages, stats.files_merged
        );
        if self.options.auto_save {
            match self.slot.save_to(&self.options.output_path).await {
                Ok(path) => {
                    message.push_str(&format!(" Saved to {}.", path.display()));
                }
                Err(err) => {
                    let warning = PdfStackError::DeliveryFailed {
                        reason: err.to_string(),
                    };
                    message.push_str(&format!(" ({warning}. Use the save command.)"));
                }
            }
        }
        self.sink.write(&message);
        Ok(())
    }

    /// Save the held artifact, to `path` or the configured output path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::ArtifactReleased`] once the bounded
    /// availability window has passed, or a write error.
    pub async fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let target = path.unwrap_or(&self.options.output_path);
        let saved = self.slot.save_to(target).await?;
        self.sink.write(&format!("Saved to {}.", saved.display()));
        Ok(saved)
    }

    /// Render the current selection.
    pub fn list(&mut self) {
        self.render();
    }

    /// Write a plain message to the status channel.
    pub fn notify(&self, message: &str) {
        self.sink.write(message);
    }

    /// Write a recoverable failure to the status channel.
    pub fn report_failure(&self, err: &PdfStackError) {
        match err {
            // These carry their own "Error processing ..." / "Failed to
            // read ..." prefix already.
            PdfStackError::DecodeFailed { .. } | PdfStackError::ReadFailed { .. } => {
                self.sink.write(&err.to_string());
            }
            _ => self.sink.write(&format!("Error: {err}")),
        }
    }

    fn render(&mut self) {
        let rows = project(&self.store);
        self.renderer.render(&rows);
    }

    /// Rows for a drag preview: visual order from `preview`, each row still
    /// carrying the original position it started the gesture with.
    fn preview_rows(&self, preview: &[usize]) -> Vec<ListRow> {
        preview
            .iter()
            .enumerate()
            .filter_map(|(rank0, &position)| {
                self.store.get(position).map(|handle| ListRow {
                    rank: rank0 + 1,
                    position,
                    id: handle.id(),
                    name: handle.name().to_string(),
                })
            })
            .collect()
    }
}
