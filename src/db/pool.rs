//! SQLite connection wrapper.
//!
//! One `DbPool` per thread of control. Concurrent writers on the same
//! database file are serialised by SQLite's write lock; the busy timeout is
//! how long a caller is willing to wait for it.

use rusqlite::{Connection, Result, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

/// Default time a statement may wait on a locked database.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        Self::with_deadline(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open the database; lock waits longer than `deadline` fail with
    /// `SQLITE_BUSY` and the surrounding transaction rolls back.
    pub fn with_deadline(path: &str, deadline: Duration) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(deadline)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        // journal_mode returns the resulting mode as a row
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        Ok(Self { conn })
    }

    /// Begin a transaction that takes the write lock up front, so a
    /// read-then-write sequence cannot interleave with another writer.
    pub fn immediate(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
    }
}
