//! Builds throwaway chat databases for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDateTime;
use message_analysis_rust::db::ChatDatabase;
use message_analysis_rust::utils::{utc_to_reference_nanos, WallClock};
use rusqlite::{params, Connection};
use tempfile::TempDir;

pub struct ChatDbFixture {
    _dir: TempDir,
    pub path: PathBuf,
    conn: Connection,
}

impl ChatDbFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("chat.db");
        let conn = Connection::open(&path).expect("Failed to create chat.db");
        conn.execute_batch(
            "CREATE TABLE message (
                 ROWID INTEGER PRIMARY KEY AUTOINCREMENT,
                 guid TEXT,
                 text TEXT,
                 handle_id INTEGER DEFAULT 0,
                 date INTEGER,
                 is_sent INTEGER DEFAULT 0,
                 is_from_me INTEGER DEFAULT 0
             );
             CREATE TABLE handle (ROWID INTEGER PRIMARY KEY AUTOINCREMENT, id TEXT NOT NULL, service TEXT);
             CREATE TABLE chat_message_join (chat_id INTEGER, message_id INTEGER, message_date INTEGER DEFAULT 0);",
        )
        .expect("Failed to create schema");
        Self { _dir: dir, path, conn }
    }

    pub fn handle(&self, id: i64, sender: &str) -> &Self {
        self.conn
            .execute("INSERT INTO handle (ROWID, id, service) VALUES (?1, ?2, 'iMessage')", params![id, sender])
            .expect("Failed to insert handle");
        self
    }

    /// `at` is UTC, formatted `%Y-%m-%d %H:%M:%S`
    pub fn message(&self, id: i64, handle_id: i64, at: &str, chat_id: Option<i64>) -> &Self {
        let timestamp = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M:%S")
            .expect("Bad fixture timestamp")
            .and_utc();
        self.conn
            .execute(
                "INSERT INTO message (ROWID, guid, text, handle_id, date, is_sent) VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                params![id, format!("guid-{id}"), format!("message {id}"), handle_id, utc_to_reference_nanos(&timestamp)],
            )
            .expect("Failed to insert message");
        if let Some(chat_id) = chat_id {
            self.link(chat_id, id);
        }
        self
    }

    pub fn link(&self, chat_id: i64, message_id: i64) -> &Self {
        self.conn
            .execute(
                "INSERT INTO chat_message_join (chat_id, message_id) VALUES (?1, ?2)",
                params![chat_id, message_id],
            )
            .expect("Failed to insert chat link");
        self
    }

    pub fn open(&self) -> ChatDatabase {
        ChatDatabase::open(&self.path, WallClock::Utc).expect("Failed to open fixture")
    }
}
