//! Console formatting for backup listings and export summaries.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{BackupInfo, ExportStats, VoiceMemoStats};

/// Output format for the backup listing.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// JSON format for programmatic use.
    Json,
    /// One `<id>, created <date>` line per backup.
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "plain" | "text" => Ok(Self::Plain),
            _ => Err(format!("Unknown format: {s}. Use: table, json, plain")),
        }
    }
}

fn backup_date(backup: &BackupInfo) -> String {
    backup.last_backup_date.map_or_else(
        || "unknown".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// Formats a table listing of backups.
pub fn format_backups_table(backups: &[BackupInfo]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Backup", "Last Backup Date"]);

    for backup in backups {
        table.add_row(vec![backup.id.clone(), backup_date(backup)]);
    }

    table.to_string()
}

/// Formats backups one per line.
pub fn format_backups_plain(backups: &[BackupInfo]) -> String {
    backups
        .iter()
        .map(|b| format!("{}, created {}", b.id, backup_date(b)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats backups as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_backups_json(backups: &[BackupInfo]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(backups)
}

/// Formats the WhatsApp export summary.
pub fn format_whatsapp_summary(stats: &ExportStats) -> String {
    let mut out = format!(
        "WhatsApp: exported {} messages over {} groups",
        stats.message_count.to_string().cyan(),
        stats.conversation_count.to_string().cyan()
    );

    if stats.media_copied > 0 || stats.media_missing > 0 {
        out.push_str(&format!(
            "\n  Media copied: {}",
            stats.media_copied.to_string().green()
        ));
    }
    if stats.media_missing > 0 {
        out.push_str(&format!(
            "\n  Media missing: {}",
            stats.media_missing.to_string().yellow()
        ));
    }
    if stats.converter_failures > 0 {
        out.push_str(&format!(
            "\n  HTML conversions failed: {}",
            stats.converter_failures.to_string().red()
        ));
    }

    out
}

/// Formats the voice memo export summary.
pub fn format_voice_memo_summary(stats: &VoiceMemoStats) -> String {
    let mut out = format!(
        "Voice Memos: exported {} files",
        stats.exported.to_string().cyan()
    );
    if stats.missing > 0 {
        out.push_str(&format!(
            "\n  Recordings missing: {}",
            stats.missing.to_string().yellow()
        ));
    }
    out
}
