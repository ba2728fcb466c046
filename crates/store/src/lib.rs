//! Filesystem store for generated artifacts.
//!
//! One designated output directory holds every downloaded model. Writes
//! use collision-resistant names (slug + content hash + timestamp) so
//! concurrent requests never need a lock; retention keeps the directory
//! bounded by age and count.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use hy3d_core::naming::artifact_filename;
use hy3d_core::retention::{format_bytes, ScannedFile};

pub mod retention;

pub use retention::enforce_retention;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the artifact store. Retention deliberately does not use
/// this type — cleanup failures are reported, never raised.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the artifact bytes failed.
    #[error("Failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Listing the output directory failed.
    #[error("Failed to scan output directory {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A persisted artifact. Created on a successful download, deleted only
/// by retention, never mutated.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub created_at: SystemTime,
    pub size: u64,
}

/// Aggregate usage of the output directory.
#[derive(Debug, Clone, Copy)]
pub struct StorageUsage {
    pub file_count: usize,
    pub total_bytes: u64,
}

impl std::fmt::Display for StorageUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files, {}",
            self.file_count,
            format_bytes(self.total_bytes)
        )
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Handle to the output directory.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The output directory this store manages.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist downloaded bytes as a new artifact.
    ///
    /// * `slug_source` — text the human-readable name fragment derives from.
    /// * `content_key` — bytes hashed into the filename (prompt or payload).
    ///
    /// Names are unique per (content, second), so an existing file is
    /// never overwritten.
    pub fn write(
        &self,
        slug_source: &str,
        content_key: &[u8],
        bytes: &[u8],
    ) -> Result<Artifact, StoreError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let path = self
            .dir
            .join(artifact_filename(slug_source, content_key, timestamp));

        std::fs::write(&path, bytes).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            size = bytes.len(),
            "Artifact written",
        );

        Ok(Artifact {
            path,
            created_at: SystemTime::now(),
            size: bytes.len() as u64,
        })
    }

    /// List the files currently in the output directory.
    ///
    /// Subdirectories are ignored; entries whose metadata cannot be read
    /// are skipped with a warning rather than failing the scan.
    pub fn scan(&self) -> Result<Vec<ScannedFile>, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::Scan {
            path: self.dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable directory entry skipped");
                    continue;
                }
            };
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Unreadable file metadata skipped",
                    );
                    continue;
                }
            };
            files.push(ScannedFile {
                path: entry.path(),
                modified: metadata.modified().unwrap_or(UNIX_EPOCH),
                size: metadata.len(),
            });
        }
        Ok(files)
    }

    /// Aggregate size and count of the output directory.
    pub fn usage(&self) -> Result<StorageUsage, StoreError> {
        let files = self.scan()?;
        Ok(StorageUsage {
            file_count: files.len(),
            total_bytes: files.iter().map(|f| f.size).sum(),
        })
    }
}
