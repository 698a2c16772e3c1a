//! Content-addressed blob store of a device backup.
//!
//! Blobs live at `root/<first two chars of fileID>/<fileID>`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, Result};

/// Read-only view over the sharded blob directory of one backup.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Creates a store rooted at a backup directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Backup directory this store reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path of a blob. IDs shorter than two characters shard on the whole ID.
    #[must_use]
    pub fn locate(&self, file_id: &str) -> PathBuf {
        let shard = file_id
            .char_indices()
            .nth(2)
            .map_or(file_id, |(i, _)| &file_id[..i]);
        self.root.join(shard).join(file_id)
    }

    /// Copies a blob byte-for-byte to `destination`.
    ///
    /// # Errors
    /// Returns `MissingBlob` if the blob is absent, or an IO error if the copy fails.
    pub fn copy_to(&self, file_id: &str, destination: &Path) -> Result<u64> {
        let source = self.existing(file_id)?;

        fs::copy(&source, destination).map_err(|e| {
            AppError::io(
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    destination.display()
                ),
                e,
            )
        })
    }

    /// Reads a blob into memory.
    #[cfg(test)]
    pub fn read(&self, file_id: &str) -> Result<Vec<u8>> {
        let source = self.existing(file_id)?;

        fs::read(&source)
            .map_err(|e| AppError::io(format!("Failed to read {}", source.display()), e))
    }

    fn existing(&self, file_id: &str) -> Result<PathBuf> {
        let path = self.locate(file_id);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AppError::MissingBlob {
                file_id: file_id.to_string(),
                path,
            })
        }
    }
}
