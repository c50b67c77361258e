//! Versioned schema migrations.
//!
//! Each migration runs once; applied versions are recorded in the `log`
//! table as `migration_applied` rows.

use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, Transaction, TransactionBehavior};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240301_0001_users_states_entries",
        description: "Created users, user_states and entries tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            uid         INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            admin       INTEGER NOT NULL DEFAULT 0 CHECK(admin IN (0, 1)),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_states (
            user          INTEGER PRIMARY KEY REFERENCES users(uid),
            state         TEXT NOT NULL CHECK(state IN ('I', 'O')),
            since_unix_s  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user         INTEGER NOT NULL REFERENCES users(uid),
            from_unix_s  INTEGER NOT NULL,
            to_unix_s    INTEGER NOT NULL,
            valid        INTEGER NOT NULL CHECK(valid IN (0, 1)),
            CHECK(from_unix_s <= to_unix_s)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_user_from ON entries(user, from_unix_s);
        CREATE INDEX IF NOT EXISTS idx_user_states_state ON user_states(state);
        "#,
    },
    Migration {
        version: "20240315_0002_protect_user_states",
        description: "Rejected deletion of user_states rows",
        sql: r#"
        CREATE TRIGGER IF NOT EXISTS user_states_no_delete
        BEFORE DELETE ON user_states
        BEGIN
            SELECT RAISE(ABORT, 'user_states rows are never deleted');
        END;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Apply one migration under the write lock. Returns `false` when another
/// connection applied it first.
fn apply(conn: &Connection, m: &Migration) -> Result<bool> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    if is_applied(&tx, m.version)? {
        return Ok(false);
    }
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;
    tx.commit()?;
    Ok(true)
}

/// Versions not yet applied, in order.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db() on every open.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        if !apply(conn, m)? {
            continue;
        }
        tracing::info!(version = m.version, "migration applied");
        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}
