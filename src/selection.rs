//! The ordered selection model.
//!
//! [`SelectionStore`] owns the mutable, user-reorderable sequence of file
//! handles the merge pipeline consumes. Positions are 0-based and always
//! contiguous after any operation; the same underlying file may appear more
//! than once. Each handle additionally carries a stable [`HandleId`]
//! assigned at append time, so callers that outlive a re-render can resolve
//! a handle back to its current position instead of trusting a stale index.
//!
//! The store is a plain owned value with no rendering or status
//! dependencies; the session layer performs re-projection and status
//! reporting after each successful mutation.

use crate::error::{PdfStackError, Result};
use crate::input::SourceFile;

/// Stable opaque identifier for a file handle, unique within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

/// A file in the selection: a [`SourceFile`] plus its stable id.
#[derive(Debug, Clone)]
pub struct FileHandle {
    id: HandleId,
    file: SourceFile,
}

impl FileHandle {
    /// The stable id assigned when the file entered the selection.
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        self.file.name()
    }

    /// Read the file's full byte content.
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        self.file.read_bytes().await
    }
}

/// The ordered, reorderable sequence of selected files.
#[derive(Debug, Default)]
pub struct SelectionStore {
    items: Vec<FileHandle>,
    next_id: u64,
}

impl SelectionStore {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently selected.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the handles in order.
    pub fn iter(&self) -> impl Iterator<Item = &FileHandle> {
        self.items.iter()
    }

    /// Get the handle at a position, if valid.
    pub fn get(&self, position: usize) -> Option<&FileHandle> {
        self.items.get(position)
    }

    /// Resolve a stable id back to its current position.
    pub fn position_of(&self, id: HandleId) -> Option<usize> {
        self.items.iter().position(|h| h.id == id)
    }

    /// Append a batch of files at the end, preserving their relative order.
    ///
    /// Assigns a fresh [`HandleId`] to each file. An empty batch performs
    /// no mutation. Returns the number of files added.
    pub fn append(&mut self, files: impl IntoIterator<Item = SourceFile>) -> usize {
        let before = self.items.len();
        for file in files {
            let id = HandleId(self.next_id);
            self.next_id += 1;
            self.items.push(FileHandle { id, file });
        }
        self.items.len() - before
    }

    /// Remove the file at `position`, shifting subsequent positions down.
    ///
    /// Relative order of all remaining files is preserved. Returns the
    /// removed handle, which the caller now owns.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::PositionOutOfRange`] if `position` is not a
    /// valid current index; the selection is unchanged in that case.
    pub fn remove_at(&mut self, position: usize) -> Result<FileHandle> {
        if position >= self.items.len() {
            return Err(PdfStackError::PositionOutOfRange {
                position,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(position))
    }

    /// Apply a permutation: the element formerly at `permutation[i]` moves
    /// to position `i`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::InvalidPermutation`] if the multiset of
    /// values is not exactly `0..len`. This is a programming-contract
    /// violation (the gesture controller submitted a malformed order), not
    /// a recoverable user error; the selection is unchanged.
    pub fn reorder(&mut self, permutation: &[usize]) -> Result<()> {
        self.validate_permutation(permutation)?;
        self.items = permutation.iter().map(|&i| self.items[i].clone()).collect();
        Ok(())
    }

    /// Take an immutable snapshot of the current order.
    ///
    /// The merge pipeline operates on a snapshot so that concurrent
    /// reordering cannot affect an in-flight merge.
    pub fn snapshot(&self) -> Vec<FileHandle> {
        self.items.clone()
    }

    /// Check that `permutation` is a bijection over `0..len`.
    fn validate_permutation(&self, permutation: &[usize]) -> Result<()> {
        let len = self.items.len();
        if permutation.len() != len {
            return Err(PdfStackError::invalid_permutation(format!(
                "expected {} value(s), got {}",
                len,
                permutation.len()
            )));
        }
        let mut seen = vec![false; len];
        for &value in permutation {
            if value >= len {
                return Err(PdfStackError::invalid_permutation(format!(
                    "value {value} out of range 0..{len}"
                )));
            }
            if seen[value] {
                return Err(PdfStackError::invalid_permutation(format!(
                    "value {value} appears more than once"
                )));
            }
            seen[value] = true;
        }
        Ok(())
    }
}
