//! Crash-safe work queues backed by SQLite.
//!
//! Each queue is a single-table database file. Messages are claimed with
//! [`PersistentQueue::front`] and removed only by [`PersistentQueue::ack`],
//! so a run that dies mid-download redelivers the message next time.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A metadata entity queued for signed-metadata download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedEntity {
    /// File name under the incoming directory.
    pub file: String,
    /// The entityID extracted from the file.
    pub entity_id: String,
    /// Hex SHA-1 of the entityID; the MDQ lookup key.
    pub sha1: String,
}

/// A message claimed from the queue; keep the id around to acknowledge it.
#[derive(Debug)]
pub struct ClaimedMessage {
    pub id: i64,
    pub entity: QueuedEntity,
}

/// FIFO queue persisted to a SQLite file.
pub struct PersistentQueue {
    conn: Connection,
}

impl PersistentQueue {
    /// Opens the queue at `path`, creating the database and table on first
    /// use.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS queue (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                payload  TEXT NOT NULL,
                enqueued INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(PersistentQueue { conn })
    }

    /// Appends an entity to the back of the queue.
    pub fn push(&self, entity: &QueuedEntity) -> Result<()> {
        let payload = serde_json::to_string(entity)?;
        self.conn.execute(
            "INSERT INTO queue (payload, enqueued) VALUES (?1, ?2)",
            rusqlite::params![payload, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Returns the oldest message without removing it.
    pub fn front(&self) -> Result<Option<ClaimedMessage>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, payload FROM queue ORDER BY id ASC LIMIT 1",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((id, payload)) => Ok(Some(ClaimedMessage {
                id,
                entity: serde_json::from_str(&payload)?,
            })),
            None => Ok(None),
        }
    }

    /// Removes a processed message.
    pub fn ack(&self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM queue WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Number of messages currently queued.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM queue", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
