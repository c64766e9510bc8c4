use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::models::{ChatMessageLink, Handle, Message, MessageTime};
use crate::repository::MessageSource;
use crate::schema::{chat_message_join, handle, message, REQUIRED_TABLES};
use crate::utils::WallClock;

/// Read-only view of an iMessage-style `chat.db`.
///
/// Holds a single connection for the life of the run; it is released on drop.
pub struct ChatDatabase {
    conn: Connection,
    wall_clock: WallClock,
}

/// A message row before its timestamp is converted
struct RawMessage {
    message_id: i64,
    text: Option<String>,
    handle_id: Option<i64>,
    date: i64,
    is_sent: Option<bool>,
}

impl ChatDatabase {
    /// Open the database file read-only and check it has the tables we need
    pub fn open(path: &Path, wall_clock: WallClock) -> Result<Self> {
        info!("Opening chat database at: {}", path.display());
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn, wall_clock)
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection, wall_clock: WallClock) -> Result<Self> {
        let db = Self { conn, wall_clock };
        db.verify_schema()?;
        Ok(db)
    }

    fn verify_schema(&self) -> Result<()> {
        for table in REQUIRED_TABLES {
            let exists: bool = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                params![table],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(AnalysisError::MissingTable(table.to_string()));
            }
        }
        Ok(())
    }

    fn map_raw_message(row: &Row) -> rusqlite::Result<RawMessage> {
        Ok(RawMessage {
            message_id: row.get(0)?,
            text: row.get(1)?,
            handle_id: row.get(2)?,
            date: row.get(3)?,
            is_sent: row.get(4)?,
        })
    }

    fn map_handle(row: &Row) -> rusqlite::Result<Handle> {
        Ok(Handle {
            handle_id: row.get(0)?,
            sender: row.get(1)?,
        })
    }

    fn map_link(row: &Row) -> rusqlite::Result<ChatMessageLink> {
        Ok(ChatMessageLink {
            chat_id: row.get(0)?,
            message_id: row.get(1)?,
        })
    }
}

impl MessageSource for ChatDatabase {
    fn load_messages(&self) -> Result<Vec<Message>> {
        let query = format!(
            "SELECT {}, {}, {}, {}, {} FROM {} ORDER BY {}",
            message::ROWID,
            message::TEXT,
            message::HANDLE_ID,
            message::DATE,
            message::IS_SENT,
            message::TABLE,
            message::ROWID
        );
        let mut stmt = self.conn.prepare(&query)?;
        let raw = stmt
            .query_map([], Self::map_raw_message)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let messages = raw
            .into_iter()
            .map(|row| {
                let timestamp = self.wall_clock.convert(row.date)?;
                Ok(Message {
                    message_id: row.message_id,
                    text: row.text,
                    handle_id: row.handle_id.unwrap_or(0),
                    raw_date: row.date,
                    time: MessageTime::from_timestamp(timestamp),
                    is_sent: row.is_sent.unwrap_or(false),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} messages", messages.len());
        Ok(messages)
    }

    fn load_handles(&self) -> Result<Vec<Handle>> {
        let query = format!(
            "SELECT {}, {} FROM {} ORDER BY {}",
            handle::ROWID,
            handle::ID,
            handle::TABLE,
            handle::ROWID
        );
        let mut stmt = self.conn.prepare(&query)?;
        let handles = stmt
            .query_map([], Self::map_handle)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Loaded {} handles", handles.len());
        Ok(handles)
    }

    fn load_chat_message_links(&self) -> Result<Vec<ChatMessageLink>> {
        let query = format!(
            "SELECT {}, {} FROM {}",
            chat_message_join::CHAT_ID,
            chat_message_join::MESSAGE_ID,
            chat_message_join::TABLE
        );
        let mut stmt = self.conn.prepare(&query)?;
        let links = stmt
            .query_map([], Self::map_link)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Loaded {} chat membership links", links.len());
        Ok(links)
    }
}
