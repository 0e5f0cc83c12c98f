//! Artifact delivery.
//!
//! A successful merge packages its bytes as an [`Artifact`] held in an
//! [`ArtifactSlot`]: a transient reference usable for both automatic and
//! manual saves. The slot is released after a bounded window following
//! packaging, whether or not the automatic save succeeded; after release
//! the user must merge again to regain the artifact.
//!
//! Saves are atomic: bytes go to a temporary sibling file which is renamed
//! into place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{PdfStackError, Result};

/// Default name for the merged output artifact.
pub const DEFAULT_ARTIFACT_NAME: &str = "alltools.pdf";

/// How long an artifact stays available after packaging.
pub const RELEASE_DELAY: Duration = Duration::from_secs(60);

/// The merged output: a byte buffer plus its default file name.
#[derive(Debug, Clone)]
pub struct Artifact {
    bytes: Vec<u8>,
    name: String,
}

impl Artifact {
    /// Package merged bytes under a file name.
    pub fn new(bytes: Vec<u8>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            name: name.into(),
        }
    }

    /// The artifact's bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The artifact's default file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::FailedToCreateOutput`] or
    /// [`PdfStackError::FailedToWrite`] with the offending path.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        tokio::fs::write(&tmp_path, &self.bytes)
            .await
            .map_err(|source| PdfStackError::FailedToCreateOutput {
                path: tmp_path.clone(),
                source,
            })?;

        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|source| PdfStackError::FailedToWrite {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Shared, releasable reference to a packaged artifact.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSlot {
    inner: Arc<Mutex<Option<Arc<Artifact>>>>,
}

impl ArtifactSlot {
    /// Create an empty slot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a slot holding an artifact.
    pub fn holding(artifact: Artifact) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(Arc::new(artifact)))),
        }
    }

    /// Get the artifact, if it has not been released.
    pub fn get(&self) -> Option<Arc<Artifact>> {
        self.lock().clone()
    }

    /// Whether the artifact has been released.
    pub fn is_released(&self) -> bool {
        self.lock().is_none()
    }

    /// Release the artifact immediately.
    pub fn release(&self) {
        self.lock().take();
    }

    /// Release the artifact after `delay`, from a background task.
    pub fn release_after(&self, delay: Duration) {
        let slot = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            slot.release();
        });
    }

    /// Save the held artifact to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStackError::ArtifactReleased`] if the slot is empty,
    /// or a write error from the save itself.
    pub async fn save_to(&self, path: &Path) -> Result<PathBuf> {
        let artifact = self.get().ok_or(PdfStackError::ArtifactReleased)?;
        artifact.save_to(path).await?;
        Ok(path.to_path_buf())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<Artifact>>> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}
