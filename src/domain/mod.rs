//! Domain layer - core types and error taxonomy.
//!
//! This layer contains pure domain models, configuration types and the
//! Apple epoch conversion, without any database or filesystem access.

pub mod config;
pub mod error;
pub mod models;
pub mod timestamp;

pub use config::{AppConfig, ConverterConfig};
pub use error::{AppError, Result};
pub use models::{
    BackupInfo, ChatMessage, ExportStats, ManifestRecord, MediaKind, PathPattern, VoiceMemoStats,
};
