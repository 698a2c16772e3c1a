//! Index of WhatsApp media files in the manifest.
//!
//! The chat store records media paths relative to the `Message/` directory,
//! while the manifest records them from the app's root, so lookups prepend
//! that segment.

use std::collections::HashMap;

use crate::domain::{PathPattern, Result};

use super::ManifestIndex;

/// Manifest namespace holding message attachments.
pub const MEDIA_NAMESPACE: &str = "Message/Media/";

/// Directory segment the chat store omits from its media paths.
const MEDIA_PATH_PREFIX: &str = "Message/";

/// Mapping from manifest relative path to file ID for every message attachment.
#[derive(Debug, Default)]
pub struct MediaCache {
    entries: HashMap<String, String>,
}

impl MediaCache {
    /// Scans the manifest once for all attachment records.
    ///
    /// # Errors
    /// Returns error if the manifest query fails.
    pub fn build(manifest: &ManifestIndex) -> Result<Self> {
        let records = manifest.find(&PathPattern::StartsWith(MEDIA_NAMESPACE.into()))?;

        let entries: HashMap<String, String> = records
            .into_iter()
            .map(|r| (r.relative_path, r.file_id))
            .collect();

        tracing::info!(entries = entries.len(), "Built media cache");

        Ok(Self { entries })
    }

    /// Builds a cache from explicit `(relative_path, file_id)` pairs.
    #[cfg(test)]
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Manifest key for a chat store media path.
    #[must_use]
    pub fn key_for(media_path: &str) -> String {
        format!("{MEDIA_PATH_PREFIX}{media_path}")
    }

    /// Looks up the file ID for a chat store media path.
    #[must_use]
    pub fn lookup(&self, media_path: &str) -> Option<&str> {
        self.entries
            .get(&Self::key_for(media_path))
            .map(String::as_str)
    }

    /// Number of cached attachments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
