//! Application layer - use cases and orchestration.
//!
//! This layer contains the transcript builder and the exporters that drive
//! the infrastructure adapters for one backup.

pub mod context;
pub mod formatter;
pub mod transcript;
pub mod voice_memos;
pub mod whatsapp;

pub use context::RunContext;
pub use formatter::{
    format_backups_json, format_backups_plain, format_backups_table, format_voice_memo_summary,
    format_whatsapp_summary, OutputFormat,
};
pub use voice_memos::export_voice_memos;
pub use whatsapp::export_whatsapp;
