//! CLI interface using clap.
//!
//! Without a backup identifier the tool lists available backups; with one it
//! runs the exporters against that backup.

use std::path::PathBuf;

use clap::Parser;

use crate::application::OutputFormat;
use crate::domain::AppConfig;

/// iOS Backup Extract - Export WhatsApp transcripts and voice memos from a device backup.
#[derive(Parser, Debug)]
#[command(name = "ios-backup-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backup identifier to extract (lists backups when omitted).
    pub backup_id: Option<String>,

    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Listing format: table, json, or plain.
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Configuration file (defaults to ~/.ios-backup-extract/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing device backups.
    #[arg(long)]
    pub backups_dir: Option<PathBuf>,

    /// Directory to write exported files into.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip HTML rendering of transcripts.
    #[arg(long)]
    pub no_html: bool,

    /// Skip the WhatsApp export.
    #[arg(long)]
    pub skip_whatsapp: bool,

    /// Skip the Voice Memos export.
    #[arg(long)]
    pub skip_voice_memos: bool,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.backups_dir {
            config.paths.backups_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.paths.output_dir = dir.clone();
        }
        if self.no_html {
            config.converter.enabled = false;
        }
    }
}
