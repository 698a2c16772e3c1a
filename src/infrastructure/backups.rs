//! Device backup discovery.
//!
//! Each backup is a directory named by its identifier, holding `Info.plist`,
//! `Manifest.db` and the sharded content blobs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::domain::{AppError, BackupInfo, Result};

/// Property list with backup metadata.
pub const INFO_PLIST: &str = "Info.plist";

/// Manifest database inside each backup.
pub const MANIFEST_DB: &str = "Manifest.db";

const LAST_BACKUP_DATE_KEY: &str = "Last Backup Date";

/// Lists all backups under `backups_dir`, sorted by identifier.
///
/// A backup with unreadable metadata is still listed, without a date.
///
/// # Errors
/// Returns error if the backups directory cannot be read.
pub fn list_backups(backups_dir: &Path) -> Result<Vec<BackupInfo>> {
    let entries = fs::read_dir(backups_dir).map_err(|e| {
        AppError::io(
            format!("Failed to read backups directory: {}", backups_dir.display()),
            e,
        )
    })?;

    let mut backups = Vec::new();
    for entry in entries.filter_map(std::result::Result::ok) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let id = entry.file_name().to_string_lossy().into_owned();
        let last_backup_date = match read_last_backup_date(&path.join(INFO_PLIST)) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(backup = %id, "{}", e);
                None
            }
        };

        backups.push(BackupInfo {
            id,
            last_backup_date,
            path,
        });
    }

    backups.sort_by(|a, b| a.id.cmp(&b.id));

    tracing::debug!("Found {} backups in {}", backups.len(), backups_dir.display());

    Ok(backups)
}

/// Reads the "Last Backup Date" field of an `Info.plist`.
///
/// # Errors
/// Returns `MalformedMetadata` if the file cannot be parsed or lacks the field.
pub fn read_last_backup_date(info_plist: &Path) -> Result<DateTime<Utc>> {
    let malformed = |message: String| AppError::MalformedMetadata {
        path: info_plist.to_path_buf(),
        message,
    };

    let value = plist::Value::from_file(info_plist).map_err(|e| malformed(e.to_string()))?;

    let date = value
        .as_dictionary()
        .ok_or_else(|| malformed("top-level value is not a dictionary".into()))?
        .get(LAST_BACKUP_DATE_KEY)
        .ok_or_else(|| malformed(format!("missing '{LAST_BACKUP_DATE_KEY}'")))?
        .as_date()
        .ok_or_else(|| malformed(format!("'{LAST_BACKUP_DATE_KEY}' is not a date")))?;

    Ok(DateTime::<Utc>::from(SystemTime::from(date)))
}

/// Directory of one backup, verified to exist.
///
/// # Errors
/// Returns `BackupNotFound` if there is no such directory.
pub fn backup_dir(backups_dir: &Path, backup_id: &str) -> Result<PathBuf> {
    let path = backups_dir.join(backup_id);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(AppError::BackupNotFound { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn info_plist(date: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Device Name</key>
	<string>iPhone</string>
	<key>Last Backup Date</key>
	<date>{date}</date>
</dict>
</plist>
"#
        )
    }

    #[test]
    fn test_read_last_backup_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(INFO_PLIST);
        fs::write(&path, info_plist("2023-04-05T10:20:30Z")).unwrap();

        let date = read_last_backup_date(&path).unwrap();
        assert_eq!(date.to_rfc3339(), "2023-04-05T10:20:30+00:00");
    }

    #[test]
    fn test_malformed_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(INFO_PLIST);
        fs::write(&path, "not a plist").unwrap();

        assert!(matches!(
            read_last_backup_date(&path),
            Err(AppError::MalformedMetadata { .. })
        ));
        assert!(matches!(
            read_last_backup_date(&dir.path().join("absent.plist")),
            Err(AppError::MalformedMetadata { .. })
        ));
    }

    #[test]
    fn test_list_backups_survives_malformed_entry() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("b-good");
        let bad = dir.path().join("a-bad");
        fs::create_dir_all(&good).unwrap();
        fs::create_dir_all(&bad).unwrap();
        fs::write(good.join(INFO_PLIST), info_plist("2022-01-02T03:04:05Z")).unwrap();
        fs::write(bad.join(INFO_PLIST), "<plist>").unwrap();
        fs::write(dir.path().join("stray-file"), "x").unwrap();

        let backups = list_backups(dir.path()).unwrap();

        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].id, "a-bad");
        assert!(backups[0].last_backup_date.is_none());
        assert_eq!(backups[1].id, "b-good");
        assert!(backups[1].last_backup_date.is_some());
    }

    #[test]
    fn test_backup_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("abc")).unwrap();

        assert_eq!(backup_dir(dir.path(), "abc").unwrap(), dir.path().join("abc"));
        assert!(matches!(
            backup_dir(dir.path(), "nope"),
            Err(AppError::BackupNotFound { .. })
        ));
    }
}
