//! Domain models for iOS backup extraction.
//!
//! These models represent the manifest records, chat messages and run
//! summaries that flow between the infrastructure and application layers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A row of the backup manifest's `Files` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Content hash, also the physical blob filename.
    pub file_id: String,
    /// Logical path of the file on the device.
    pub relative_path: String,
}

/// Literal path matcher used for manifest lookups.
///
/// Only prefix and suffix literals are supported; no wildcard characters are
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Path ends with the given literal.
    EndsWith(String),
    /// Path starts with the given literal.
    StartsWith(String),
    /// Path starts with the first literal and ends with the second.
    Between { prefix: String, suffix: String },
}

impl PathPattern {
    /// Checks whether a relative path satisfies the pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::EndsWith(suffix) => path.ends_with(suffix.as_str()),
            Self::StartsWith(prefix) => path.starts_with(prefix.as_str()),
            Self::Between { prefix, suffix } => {
                path.len() >= prefix.len() + suffix.len()
                    && path.starts_with(prefix.as_str())
                    && path.ends_with(suffix.as_str())
            }
        }
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndsWith(suffix) => write!(f, "'*{suffix}'"),
            Self::StartsWith(prefix) => write!(f, "'{prefix}*'"),
            Self::Between { prefix, suffix } => write!(f, "'{prefix}*{suffix}'"),
        }
    }
}

/// A single chat message as produced by the chat store query.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Display name of the contact or group this message belongs to.
    pub conversation: String,
    /// Whether the device owner sent the message.
    pub is_from_me: bool,
    /// Seconds since 2001-01-01T00:00:00 UTC.
    pub timestamp_raw: f64,
    /// Push name of the group member who sent the message, if resolved.
    pub sender_name: Option<String>,
    /// Message body.
    pub text: Option<String>,
    /// Media path as stored in the chat store (without the `Message/` prefix).
    pub media_path: Option<String>,
}

impl ChatMessage {
    /// Label shown in front of the message line.
    ///
    /// Falls back to the conversation name for 1:1 chats, where no group
    /// member profile exists.
    #[must_use]
    pub fn sender_label(&self) -> &str {
        if self.is_from_me {
            "me"
        } else {
            non_empty(self.sender_name.as_deref()).unwrap_or(self.conversation.as_str())
        }
    }

    /// Media path, ignoring empty values.
    #[must_use]
    pub fn media(&self) -> Option<&str> {
        non_empty(self.media_path.as_deref())
    }

    /// Message body, ignoring empty values.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        non_empty(self.text.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// How an attachment is embedded in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Document,
}

impl MediaKind {
    /// Classifies an attachment by its file extension (without the dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "png" | "webp" => Self::Image,
            "aac" | "mp3" | "m4a" | "opus" => Self::Audio,
            "mp4" => Self::Video,
            _ => Self::Document,
        }
    }
}

/// Summary of a WhatsApp export run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ExportStats {
    /// Number of message lines written.
    pub message_count: usize,
    /// Number of conversation documents written.
    pub conversation_count: usize,
    /// Attachments copied into the media directory.
    pub media_copied: usize,
    /// Media references that could not be resolved.
    pub media_missing: usize,
    /// Conversations whose HTML rendering failed.
    pub converter_failures: usize,
}

/// Summary of a voice memo export run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct VoiceMemoStats {
    /// Recordings copied.
    pub exported: usize,
    /// Recordings listed in the manifest whose blob is absent.
    pub missing: usize,
}

/// A device backup found in the backups directory.
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup identifier (directory name).
    pub id: String,
    /// "Last Backup Date" from Info.plist, if it could be read.
    pub last_backup_date: Option<DateTime<Utc>>,
    /// Full path to the backup directory.
    pub path: PathBuf,
}
