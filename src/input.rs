//! File input handling.
//!
//! This module is the boundary to the platform's file selection facility:
//! each `add` action resolves a fresh batch of [`SourceFile`]s from glob
//! patterns, plain paths, or directories. A batch is never redelivered; the
//! caller asks again to get a new one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{PdfStackError, Result};

/// Where a [`SourceFile`]'s bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes held in memory (e.g. handed over by an embedding caller).
    Memory(Arc<[u8]>),
    /// Bytes read from the filesystem on demand.
    Path(PathBuf),
}

/// A user-supplied file: a display name plus an async byte-read capability.
///
/// Immutable once created. Reading does not consume the file; the merge
/// pipeline reads the full content on each invocation.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    source: FileSource,
}

impl SourceFile {
    /// Create a source file backed by a filesystem path.
    ///
    /// The display name is the path's final component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    /// Create a source file backed by an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// The display name shown in the list and in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the file's full byte content.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::ReadFailed`] naming this file if the
    /// underlying read fails.
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| PdfStackError::ReadFailed {
                        name: self.name.clone(),
                        source,
                    })
            }
        }
    }
}

/// Expand input patterns into filesystem paths.
///
/// Each pattern may be a literal path, a glob (`chapter*.pdf`), or a
/// directory, which is walked recursively for `*.pdf` entries. Relative
/// order within the result follows the pattern order, with directory and
/// glob expansions sorted for a stable ordering.
///
/// # Errors
///
/// Propagates glob parse errors and filesystem errors from expansion.
pub fn resolve_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let pdf_matcher = pdf_matcher()?;
    let mut resolved = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let as_path = Path::new(pattern);

        if as_path.is_dir() {
            resolved.extend(walk_directory(as_path, &pdf_matcher)?);
        } else if as_path.is_file() {
            resolved.push(as_path.to_path_buf());
        } else {
            let mut matches = Vec::new();
            for entry in glob::glob(pattern)? {
                matches.push(entry?);
            }
            matches.sort();
            resolved.extend(matches);
        }
    }

    Ok(resolved)
}

/// Resolve patterns and wrap each hit as a [`SourceFile`].
pub fn collect_source_files<T>(patterns: T) -> Result<Vec<SourceFile>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    Ok(resolve_patterns(patterns)?
        .into_iter()
        .map(SourceFile::from_path)
        .collect())
}

/// Matcher for `*.pdf` entries, case-insensitive.
fn pdf_matcher() -> Result<GlobSet> {
    let glob = Glob::new("*.{pdf,PDF}")
        .map_err(|e| PdfStackError::engine_failed(e.to_string()))?;
    GlobSetBuilder::new()
        .add(glob)
        .build()
        .map_err(|e| PdfStackError::engine_failed(e.to_string()))
}

/// Walk a directory collecting PDF files in sorted order.
fn walk_directory(dir: &Path, matcher: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            PdfStackError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("walkdir loop detected")
            }))
        })?;
        if entry.file_type().is_file()
            && matcher.is_match(entry.file_name())
        {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}
