//! WhatsApp `ChatStorage.sqlite` reader.
//!
//! The Core Data schema is an external contract; everything that knows its
//! table and column names lives in this file.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::domain::{AppError, ChatMessage, PathPattern, Result};

/// Manifest suffix of the WhatsApp message database.
pub const CHAT_DATABASE_SUFFIX: &str = "ChatStorage.sqlite";

/// Conversation name used when a session has no partner name.
const UNNAMED_CONVERSATION: &str = "unknown";

/// Messages joined with their session, media item and group sender profile,
/// ordered by conversation then time.
const MESSAGES_QUERY: &str = r"
    SELECT
        m.ZISFROMME,
        m.ZMESSAGEDATE,
        s.ZPARTNERNAME,
        prof.ZPUSHNAME,
        m.ZTEXT,
        med.ZMEDIALOCALPATH
    FROM ZWAMESSAGE m
    INNER JOIN ZWACHATSESSION s ON m.ZCHATSESSION = s.Z_PK
    LEFT JOIN ZWAMEDIAITEM med ON med.Z_PK = m.ZMEDIAITEM
    LEFT JOIN ZWAGROUPMEMBER g ON g.Z_PK = m.ZGROUPMEMBER
    LEFT JOIN ZWAPROFILEPUSHNAME prof ON prof.ZJID = g.ZMEMBERJID
    ORDER BY s.ZPARTNERNAME, m.ZMESSAGEDATE
";

/// A source of chat messages ordered by (conversation, timestamp).
pub trait ChatSource {
    /// Feeds every message to `visit` in conversation then timestamp order.
    ///
    /// # Errors
    /// Returns the first error from the query or from `visit`.
    fn visit_messages(&self, visit: &mut dyn FnMut(ChatMessage) -> Result<()>) -> Result<()>;
}

/// Manifest pattern locating the WhatsApp database.
#[must_use]
pub fn chat_database_pattern() -> PathPattern {
    PathPattern::EndsWith(CHAT_DATABASE_SUFFIX.into())
}

/// Reader over a local copy of WhatsApp's message store.
pub struct WhatsAppStore {
    conn: Connection,
}

impl WhatsAppStore {
    /// Opens a chat database in read-only mode.
    ///
    /// # Errors
    /// Returns error if database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch("PRAGMA query_only = ON;")
            .map_err(AppError::database)?;

        Ok(Self { conn })
    }
}

impl ChatSource for WhatsAppStore {
    fn visit_messages(&self, visit: &mut dyn FnMut(ChatMessage) -> Result<()>) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare(MESSAGES_QUERY)
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([], |row| {
                let is_from_me: Option<i64> = row.get(0)?;
                let timestamp: Option<f64> = row.get(1)?;
                let conversation: Option<String> = row.get(2)?;

                Ok(ChatMessage {
                    conversation: conversation
                        .unwrap_or_else(|| UNNAMED_CONVERSATION.to_string()),
                    is_from_me: is_from_me == Some(1),
                    timestamp_raw: timestamp.unwrap_or_default(),
                    sender_name: row.get(3)?,
                    text: row.get(4)?,
                    media_path: row.get(5)?,
                })
            })
            .map_err(AppError::database)?;

        let mut visited = 0_usize;
        for row in rows {
            visit(row.map_err(AppError::database)?)?;
            visited += 1;
        }

        tracing::debug!("Visited {} messages", visited);

        Ok(())
    }
}
