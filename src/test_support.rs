//! Fixture builders for synthetic backups used by unit tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};

/// Writes a `Manifest.db` with the given `(fileID, relativePath)` rows.
pub fn write_manifest(path: &Path, files: &[(&str, &str)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Files (
            fileID TEXT PRIMARY KEY,
            domain TEXT,
            relativePath TEXT,
            flags INTEGER,
            file BLOB
        );",
    )
    .unwrap();

    for (file_id, relative_path) in files {
        conn.execute(
            "INSERT INTO Files (fileID, domain, relativePath, flags)
             VALUES (?1, 'AppDomain', ?2, 1)",
            params![file_id, relative_path],
        )
        .unwrap();
    }
}

/// Writes a blob into the sharded store layout under `root`.
pub fn write_blob(root: &Path, file_id: &str, bytes: &[u8]) {
    let shard = root.join(&file_id[..2]);
    fs::create_dir_all(&shard).unwrap();
    fs::write(shard.join(file_id), bytes).unwrap();
}

/// One message row for [`write_chat_store`].
#[derive(Debug, Clone)]
pub struct FixtureMessage {
    pub conversation: &'static str,
    pub date: f64,
    pub from_me: bool,
    pub member: Option<&'static str>,
    pub text: Option<&'static str>,
    pub media: Option<&'static str>,
}

impl FixtureMessage {
    pub const fn text(conversation: &'static str, date: f64, text: &'static str) -> Self {
        Self {
            conversation,
            date,
            from_me: false,
            member: None,
            text: Some(text),
            media: None,
        }
    }

    pub const fn media(conversation: &'static str, date: f64, media: &'static str) -> Self {
        Self {
            conversation,
            date,
            from_me: false,
            member: None,
            text: None,
            media: Some(media),
        }
    }

    pub const fn notice(conversation: &'static str, date: f64) -> Self {
        Self {
            conversation,
            date,
            from_me: false,
            member: None,
            text: None,
            media: None,
        }
    }

    pub const fn from_me(mut self) -> Self {
        self.from_me = true;
        self
    }

    pub const fn from_member(mut self, push_name: &'static str) -> Self {
        self.member = Some(push_name);
        self
    }
}

/// Writes a minimal WhatsApp `ChatStorage.sqlite` containing `messages`.
pub fn write_chat_store(path: &Path, messages: &[FixtureMessage]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE ZWACHATSESSION (Z_PK INTEGER PRIMARY KEY, ZPARTNERNAME VARCHAR);
         CREATE TABLE ZWAMEDIAITEM (Z_PK INTEGER PRIMARY KEY, ZMEDIALOCALPATH VARCHAR);
         CREATE TABLE ZWAGROUPMEMBER (Z_PK INTEGER PRIMARY KEY, ZMEMBERJID VARCHAR);
         CREATE TABLE ZWAPROFILEPUSHNAME (
            Z_PK INTEGER PRIMARY KEY,
            ZJID VARCHAR,
            ZPUSHNAME VARCHAR
         );
         CREATE TABLE ZWAMESSAGE (
            Z_PK INTEGER PRIMARY KEY,
            ZISFROMME INTEGER,
            ZMESSAGEDATE TIMESTAMP,
            ZTEXT VARCHAR,
            ZMEDIAITEM INTEGER,
            ZCHATSESSION INTEGER,
            ZGROUPMEMBER INTEGER
         );",
    )
    .unwrap();

    let mut sessions: HashMap<&str, i64> = HashMap::new();
    let mut members: HashMap<&str, i64> = HashMap::new();

    for msg in messages {
        let next_session = i64::try_from(sessions.len()).unwrap() + 1;
        let session = *sessions.entry(msg.conversation).or_insert_with(|| {
            conn.execute(
                "INSERT INTO ZWACHATSESSION (Z_PK, ZPARTNERNAME) VALUES (?1, ?2)",
                params![next_session, msg.conversation],
            )
            .unwrap();
            next_session
        });

        let member = msg.member.map(|name| {
            let next_member = i64::try_from(members.len()).unwrap() + 1;
            *members.entry(name).or_insert_with(|| {
                let jid = format!("{next_member}@s.whatsapp.net");
                conn.execute(
                    "INSERT INTO ZWAGROUPMEMBER (Z_PK, ZMEMBERJID) VALUES (?1, ?2)",
                    params![next_member, jid],
                )
                .unwrap();
                conn.execute(
                    "INSERT INTO ZWAPROFILEPUSHNAME (ZJID, ZPUSHNAME) VALUES (?1, ?2)",
                    params![jid, name],
                )
                .unwrap();
                next_member
            })
        });

        let media_item = msg.media.map(|local_path| {
            conn.execute(
                "INSERT INTO ZWAMEDIAITEM (ZMEDIALOCALPATH) VALUES (?1)",
                params![local_path],
            )
            .unwrap();
            conn.last_insert_rowid()
        });

        conn.execute(
            "INSERT INTO ZWAMESSAGE
                (ZISFROMME, ZMESSAGEDATE, ZTEXT, ZMEDIAITEM, ZCHATSESSION, ZGROUPMEMBER)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                i64::from(msg.from_me),
                msg.date,
                msg.text,
                media_item,
                session,
                member
            ],
        )
        .unwrap();
    }
}

/// Replaces a message's text with bytes that cannot be decoded as a string.
pub fn corrupt_text(path: &Path, message_pk: i64) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "UPDATE ZWAMESSAGE SET ZTEXT = X'00FF' WHERE Z_PK = ?1",
        params![message_pk],
    )
    .unwrap();
}
