//! `SQLite` reader for a backup's `Manifest.db`.
//!
//! Maps logical device paths to content-addressed file IDs via the `Files`
//! table.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::domain::{AppError, ManifestRecord, PathPattern, Result};

/// Read-only query layer over the backup manifest.
pub struct ManifestIndex {
    conn: Connection,
}

impl ManifestIndex {
    /// Opens a manifest database in read-only mode.
    ///
    /// # Errors
    /// Returns error if database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        Ok(Self { conn })
    }

    /// Finds all records whose relative path matches the pattern.
    ///
    /// An empty result is not an error; callers decide what a miss means.
    ///
    /// # Errors
    /// Returns error if query fails.
    pub fn find(&self, pattern: &PathPattern) -> Result<Vec<ManifestRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT fileID, relativePath FROM Files
                 WHERE relativePath LIKE ?1 ESCAPE '\\'
                 ORDER BY rowid",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([like_pattern(pattern)], |row| {
                Ok(ManifestRecord {
                    file_id: row.get(0)?,
                    relative_path: row.get(1)?,
                })
            })
            .map_err(AppError::database)?;

        let mut records = Vec::new();
        for row in rows {
            match row {
                // LIKE is case-insensitive; re-check the literal match.
                Ok(record) if pattern.matches(&record.relative_path) => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read manifest row: {}", e);
                }
            }
        }

        tracing::debug!("Found {} manifest entries matching {}", records.len(), pattern);

        Ok(records)
    }

    /// Finds the single record matching the pattern.
    ///
    /// # Errors
    /// Returns `MissingManifestEntry` when nothing matches and
    /// `AmbiguousManifestEntry` when more than one record does.
    pub fn find_unique(&self, pattern: &PathPattern) -> Result<ManifestRecord> {
        let mut records = self.find(pattern)?;

        match records.len() {
            0 => Err(AppError::MissingManifestEntry {
                pattern: pattern.to_string(),
            }),
            1 => Ok(records.remove(0)),
            count => Err(AppError::AmbiguousManifestEntry {
                pattern: pattern.to_string(),
                count,
            }),
        }
    }
}

/// Builds a `LIKE` prefilter for a literal pattern.
fn like_pattern(pattern: &PathPattern) -> String {
    match pattern {
        PathPattern::EndsWith(suffix) => format!("%{}", escape_like(suffix)),
        PathPattern::StartsWith(prefix) => format!("{}%", escape_like(prefix)),
        PathPattern::Between { prefix, suffix } => {
            format!("{}%{}", escape_like(prefix), escape_like(suffix))
        }
    }
}

fn escape_like(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
