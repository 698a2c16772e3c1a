//! WhatsApp transcript export.
//!
//! Locates the chat database through the manifest, copies it out of the
//! blob store, and streams its messages through the transcript builder.

use std::fs;
use std::path::Path;

use crate::domain::{ExportStats, Result};
use crate::infrastructure::{
    chat_database_pattern, ChatSource, ContentStore, DocumentConverter, MediaCache, WhatsAppStore,
};

use super::context::{ensure_dir, RunContext};
use super::transcript::TranscriptBuilder;

/// Exports every WhatsApp conversation in the backup.
///
/// # Errors
/// Returns error if the chat database cannot be found or copied, or if the
/// transcripts cannot be written. Missing attachments and converter failures
/// are counted, not returned.
pub fn export_whatsapp(ctx: &RunContext) -> Result<ExportStats> {
    let out_dir = ctx.layout.whatsapp_dir();
    ensure_dir(&ctx.layout.whatsapp_media_dir())?;

    let manifest = ctx.open_manifest()?;
    let record = manifest.find_unique(&chat_database_pattern())?;
    let media = MediaCache::build(&manifest)?;
    drop(manifest);

    let db_copy = ctx.layout.chat_db_copy();
    ctx.store.copy_to(&record.file_id, &db_copy)?;
    tracing::info!(
        file_id = %record.file_id,
        path = %record.relative_path,
        media_entries = media.len(),
        "Copied chat database"
    );

    let converter = match &ctx.converter {
        Some(pandoc) => {
            pandoc.install_stylesheet(&out_dir)?;
            Some(pandoc as &dyn DocumentConverter)
        }
        None => None,
    };

    let result = WhatsAppStore::open(&db_copy).and_then(|source| {
        export_transcripts(&source, &media, &ctx.store, converter, &out_dir)
    });

    if let Err(e) = fs::remove_file(&db_copy) {
        tracing::debug!("Failed to remove {}: {}", db_copy.display(), e);
    }

    let stats = result?;

    tracing::info!(
        messages = stats.message_count,
        conversations = stats.conversation_count,
        media = stats.media_copied,
        "WhatsApp export complete"
    );

    Ok(stats)
}

/// Streams messages from `source` into per-conversation transcripts in `out_dir`.
///
/// # Errors
/// Returns error if the source query fails or the transcripts cannot be written.
pub fn export_transcripts(
    source: &dyn ChatSource,
    media: &MediaCache,
    store: &ContentStore,
    converter: Option<&dyn DocumentConverter>,
    out_dir: &Path,
) -> Result<ExportStats> {
    let mut builder = TranscriptBuilder::new(media, store, converter, out_dir);
    source.visit_messages(&mut |message| builder.push(&message))?;
    builder.finish()
}
