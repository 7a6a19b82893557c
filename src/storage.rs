//! Session-scoped handoff slot between the request and result screens.
//!
//! Holds at most one serialized value under [`HANDOFF_KEY`]. Writing
//! overwrites, reading does not consume, and only the "new quote" action
//! clears it.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::consts::{EPHEMERAL_SESSION, HANDOFF_KEY};
use crate::quote::QuoteResult;

pub struct HandoffStorage {
    conn: Mutex<Connection>,
}

impl HandoffStorage {
    /// Open or create the handoff table at `path`.
    /// Use [`EPHEMERAL_SESSION`] for a slot that dies with the process.
    pub fn open(path: &str) -> Result<Self> {
        if path != EPHEMERAL_SESSION
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(path).context("failed to open session database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS handoff (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create handoff table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(EPHEMERAL_SESSION)
    }

    /// Raw stored value, if any.
    pub fn read(&self) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM handoff WHERE key = ?1")?;
        let mut rows = stmt.query([HANDOFF_KEY])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Store a raw value, replacing whatever was there.
    pub fn write_raw(&self, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO handoff (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [HANDOFF_KEY, value],
        )?;
        Ok(())
    }

    /// Serialize and store a quote.
    pub fn write(&self, quote: &QuoteResult) -> Result<()> {
        let json = serde_json::to_string(quote).context("failed to serialize quote")?;
        self.write_raw(&json)
    }

    /// Empty the slot. Clearing an empty slot is fine.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM handoff WHERE key = ?1", [HANDOFF_KEY])?;
        Ok(())
    }
}
