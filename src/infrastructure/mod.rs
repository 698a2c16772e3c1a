//! Infrastructure layer - external adapters (databases, blob store, processes).
//!
//! This layer handles all I/O against the backup and the outside world.

pub mod backups;
pub mod chat_source;
pub mod config;
pub mod content_store;
pub mod converter;
pub mod manifest;
pub mod media_cache;

pub use backups::{backup_dir, list_backups, MANIFEST_DB};
pub use chat_source::{chat_database_pattern, ChatSource, WhatsAppStore};
pub use config::load_config;
pub use content_store::ContentStore;
pub use converter::{DocumentConverter, PandocConverter};
pub use manifest::ManifestIndex;
pub use media_cache::MediaCache;
