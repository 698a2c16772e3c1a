//! Per-run state shared by the exporters.
//!
//! Built once from the configuration and the chosen backup, then passed by
//! reference; nothing here is global.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};
use crate::infrastructure::{backup_dir, ContentStore, ManifestIndex, PandocConverter, MANIFEST_DB};

/// Where exported files go.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Transcripts (`<name>.md`, `<name>.html`) and the stylesheet.
    #[must_use]
    pub fn whatsapp_dir(&self) -> PathBuf {
        self.root.join("whatsapp")
    }

    /// Numbered attachment copies.
    #[must_use]
    pub fn whatsapp_media_dir(&self) -> PathBuf {
        self.whatsapp_dir().join("media")
    }

    #[must_use]
    pub fn voice_memos_dir(&self) -> PathBuf {
        self.root.join("voicememos")
    }

    /// Scratch copy of the chat database, removed after the export.
    #[must_use]
    pub fn chat_db_copy(&self) -> PathBuf {
        self.whatsapp_dir().join(".ChatStorage.sqlite")
    }
}

/// Create a directory and its parents.
///
/// # Errors
/// Returns error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| AppError::io(format!("Failed to create directory {}", path.display()), e))
}

/// Everything an export run needs to know about its backup and output.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Sharded blob store, rooted at the backup directory.
    pub store: ContentStore,
    /// Output locations.
    pub layout: OutputLayout,
    /// HTML renderer, if enabled.
    pub converter: Option<PandocConverter>,
}

impl RunContext {
    /// Resolve a backup by identifier and prepare the run.
    ///
    /// # Errors
    /// Returns `BackupNotFound` if the backup directory does not exist.
    pub fn new(config: &AppConfig, backup_id: &str) -> Result<Self> {
        let dir = backup_dir(&config.backups_dir(), backup_id)?;

        let converter = config
            .converter
            .enabled
            .then(|| PandocConverter::from_config(&config.converter));

        tracing::info!(backup = %dir.display(), "Opened backup");

        Ok(Self::from_parts(dir, &config.paths.output_dir, converter))
    }

    /// Build a context from already-resolved locations.
    #[must_use]
    pub fn from_parts(
        backup_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        converter: Option<PandocConverter>,
    ) -> Self {
        Self {
            store: ContentStore::new(backup_dir),
            layout: OutputLayout::new(output_dir),
            converter,
        }
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.store.root().join(MANIFEST_DB)
    }

    /// Open the backup's manifest.
    ///
    /// # Errors
    /// Returns error if `Manifest.db` is missing or cannot be opened.
    pub fn open_manifest(&self) -> Result<ManifestIndex> {
        let path = self.manifest_path();
        if !path.is_file() {
            return Err(AppError::Io {
                message: format!("Manifest not found: {}", path.display()),
                source: None,
            });
        }
        ManifestIndex::open(&path)
    }
}
