//! Application configuration.
//!
//! Every field has a default so a partial (or absent) config file works.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of device backups relative to the home directory (macOS Finder/iTunes).
const MOBILESYNC_BACKUP_DIR: &str = "Library/Application Support/MobileSync/Backup";

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory holding one subdirectory per backup.
    #[serde(default)]
    pub backups_dir: Option<PathBuf>,

    /// Root of all exported output.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            backups_dir: None,
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Markdown to HTML conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Whether to render an HTML file next to every transcript.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Converter executable.
    #[serde(default = "default_program")]
    pub program: String,

    /// Stylesheet copied next to the transcripts and linked from the HTML.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            program: default_program(),
            stylesheet: default_stylesheet(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

fn default_program() -> String {
    "pandoc".to_string()
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from("pandoc.css")
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Path configuration.
    #[serde(default)]
    pub paths: PathConfig,

    /// Document converter configuration.
    #[serde(default)]
    pub converter: ConverterConfig,
}

impl AppConfig {
    /// Get the backups directory, using the platform default if not configured.
    #[must_use]
    pub fn backups_dir(&self) -> PathBuf {
        self.paths
            .backups_dir
            .clone()
            .unwrap_or_else(Self::default_backups_dir)
    }

    /// Default MobileSync backup directory.
    #[must_use]
    pub fn default_backups_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(MOBILESYNC_BACKUP_DIR)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ios-backup-extract")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}
