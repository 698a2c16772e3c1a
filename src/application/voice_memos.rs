//! Voice Memos export: copies every recording out of the backup verbatim.

use std::path::Path;

use crate::domain::{AppError, PathPattern, Result, VoiceMemoStats};

use super::context::{ensure_dir, RunContext};

const RECORDINGS_PREFIX: &str = "Media/Recordings/";
const RECORDING_EXTENSION: &str = ".m4a";

/// Copies all recordings to the voice memos directory under their original names.
///
/// # Errors
/// Returns error if the manifest cannot be queried or a copy fails. Recordings
/// whose blob is absent are skipped and counted.
pub fn export_voice_memos(ctx: &RunContext) -> Result<VoiceMemoStats> {
    let out_dir = ctx.layout.voice_memos_dir();
    ensure_dir(&out_dir)?;

    let records = ctx.open_manifest()?.find(&PathPattern::Between {
        prefix: RECORDINGS_PREFIX.into(),
        suffix: RECORDING_EXTENSION.into(),
    })?;

    let mut stats = VoiceMemoStats::default();

    for record in records {
        let Some(name) = Path::new(&record.relative_path).file_name() else {
            continue;
        };

        match ctx.store.copy_to(&record.file_id, &out_dir.join(name)) {
            Ok(_) => stats.exported += 1,
            Err(AppError::MissingBlob { path, .. }) => {
                tracing::warn!(
                    recording = %record.relative_path,
                    blob = %path.display(),
                    "Recording blob missing"
                );
                stats.missing += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(exported = stats.exported, "Voice memo export complete");

    Ok(stats)
}
