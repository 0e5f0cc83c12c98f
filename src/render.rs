//! The list renderer boundary.
//!
//! The renderer projects the selection store's current sequence into a
//! visual list. Each row exposes its 1-based display rank, its name, the
//! 0-based position a removal request would use, and the stable handle id.
//! Rendering is a full rebuild and must be idempotent; the session calls it
//! after every successful mutation (and after a cancelled drag, to revert
//! the visual preview to the store's unchanged order).

use std::sync::{Arc, Mutex};

use crate::selection::{HandleId, SelectionStore};

/// One row of the projected list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// 1-based display rank.
    pub rank: usize,
    /// 0-based position in the store, used for removal and drag targeting.
    pub position: usize,
    /// Stable id of the handle backing this row.
    pub id: HandleId,
    /// Display name.
    pub name: String,
}

/// Project the store's current sequence into renderable rows.
pub fn project(store: &SelectionStore) -> Vec<ListRow> {
    store
        .iter()
        .enumerate()
        .map(|(position, handle)| ListRow {
            rank: position + 1,
            position,
            id: handle.id(),
            name: handle.name().to_string(),
        })
        .collect()
}

/// Rebuilds a visual list from the current rows.
pub trait ListRenderer {
    /// Replace the rendered list with `rows`. Safe to call repeatedly.
    fn render(&mut self, rows: &[ListRow]);
}

/// Console renderer printing the numbered list.
#[derive(Debug, Clone)]
pub struct ConsoleRenderer {
    quiet: bool,
}

impl ConsoleRenderer {
    /// Create a console renderer.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress list output
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ListRenderer for ConsoleRenderer {
    fn render(&mut self, rows: &[ListRow]) {
        if self.quiet {
            return;
        }
        if rows.is_empty() {
            println!("No files selected.");
            return;
        }
        for row in rows {
            println!("{}. {}", row.rank, row.name);
        }
    }
}

/// Recording renderer capturing every projection, for tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Mutex<Vec<Vec<ListRow>>>,
}

impl RecordingRenderer {
    /// Create an empty recording renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All projections rendered so far, oldest first.
    pub fn frames(&self) -> Vec<Vec<ListRow>> {
        self.lock().clone()
    }

    /// The most recent projection, if any.
    pub fn last_frame(&self) -> Option<Vec<ListRow>> {
        self.lock().last().cloned()
    }

    /// Number of times render was called.
    pub fn render_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<ListRow>>> {
        self.frames.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl ListRenderer for RecordingRenderer {
    fn render(&mut self, rows: &[ListRow]) {
        self.lock().push(rows.to_vec());
    }
}

// A shared handle renders too, so tests can keep a second reference for
// assertions while the session owns the renderer.
impl ListRenderer for Arc<RecordingRenderer> {
    fn render(&mut self, rows: &[ListRow]) {
        self.lock().push(rows.to_vec());
    }
}
