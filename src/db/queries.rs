//! Data-access helpers shared by the attendance core.
//!
//! Every helper takes a plain `&Connection`; a `rusqlite::Transaction`
//! derefs to one, so the same helpers run inside or outside a transaction.
//! Errors are returned raw; callers attach operation context.

use crate::errors::AppError;
use crate::models::entry::{Entry, OnlineUser};
use crate::models::state::{AttendanceState, State};
use crate::models::user::{User, UserId};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_state(row: &Row) -> Result<State> {
    let raw: String = row.get("state")?;
    State::from_db_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid attendance state: {}", raw))),
        )
    })
}

pub fn map_entry(row: &Row) -> Result<Entry> {
    Ok(Entry {
        id: row.get("id")?,
        user: UserId(row.get("user")?),
        from: row.get("from_unix_s")?,
        to: row.get("to_unix_s")?,
        valid: row.get::<_, i32>("valid")? == 1,
    })
}

fn map_user(row: &Row) -> Result<User> {
    Ok(User {
        id: UserId(row.get("uid")?),
        email: row.get("email")?,
        admin: row.get::<_, i32>("admin")? == 1,
        created_at: row.get("created_at")?,
    })
}

// ---------------------------------------------------------------------------
// user_states
// ---------------------------------------------------------------------------

pub fn fetch_state(conn: &Connection, user: UserId) -> Result<Option<AttendanceState>> {
    conn.prepare_cached("SELECT user, state, since_unix_s FROM user_states WHERE user = ?1")?
        .query_row([user.0], |row| {
            Ok(AttendanceState {
                user: UserId(row.get("user")?),
                state: map_state(row)?,
                since: row.get("since_unix_s")?,
            })
        })
        .optional()
}

pub fn insert_state(conn: &Connection, user: UserId, state: State, since: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO user_states (user, state, since_unix_s) VALUES (?1, ?2, ?3)",
        params![user.0, state.to_db_str(), since],
    )?;
    Ok(())
}

/// Returns the number of rows changed (0 if the user has no state row).
pub fn write_state(conn: &Connection, user: UserId, state: State, since: i64) -> Result<usize> {
    conn.prepare_cached("UPDATE user_states SET state = ?1, since_unix_s = ?2 WHERE user = ?3")?
        .execute(params![state.to_db_str(), since, user.0])
}

/// Every user currently clocked in, oldest session first.
pub fn states_in(conn: &Connection) -> Result<Vec<AttendanceState>> {
    let mut stmt = conn.prepare(
        "SELECT user, state, since_unix_s FROM user_states
         WHERE state = 'I'
         ORDER BY since_unix_s ASC, user ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(AttendanceState {
            user: UserId(row.get("user")?),
            state: map_state(row)?,
            since: row.get("since_unix_s")?,
        })
    })?;

    rows.collect()
}

pub fn count_online(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM user_states WHERE state = 'I'",
        [],
        |row| row.get(0),
    )
}

pub fn list_online(conn: &Connection) -> Result<Vec<OnlineUser>> {
    let mut stmt = conn.prepare(
        "SELECT s.user, u.email, s.since_unix_s
         FROM user_states s JOIN users u ON u.uid = s.user
         WHERE s.state = 'I'
         ORDER BY s.since_unix_s ASC, s.user ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(OnlineUser {
            uid: UserId(row.get(0)?),
            email: row.get(1)?,
            since: row.get(2)?,
        })
    })?;

    rows.collect()
}

// ---------------------------------------------------------------------------
// entries
// ---------------------------------------------------------------------------

pub fn insert_entry(conn: &Connection, user: UserId, from: i64, to: i64, valid: bool) -> Result<i64> {
    conn.prepare_cached(
        "INSERT INTO entries (user, from_unix_s, to_unix_s, valid)
         VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![user.0, from, to, if valid { 1 } else { 0 }])?;
    Ok(conn.last_insert_rowid())
}

pub fn get_entry(conn: &Connection, id: i64) -> Result<Option<Entry>> {
    conn.query_row(
        "SELECT id, user, from_unix_s, to_unix_s, valid FROM entries WHERE id = ?1",
        [id],
        map_entry,
    )
    .optional()
}

/// All entries of a user, chronological.
pub fn list_entries(conn: &Connection, user: UserId) -> Result<Vec<Entry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user, from_unix_s, to_unix_s, valid FROM entries
         WHERE user = ?1
         ORDER BY from_unix_s ASC, id ASC",
    )?;

    let rows = stmt.query_map([user.0], map_entry)?;
    rows.collect()
}

/// Valid entries of a user lying entirely inside `[start, end)`.
pub fn valid_entries_within(conn: &Connection, user: UserId, start: i64, end: i64) -> Result<Vec<Entry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user, from_unix_s, to_unix_s, valid FROM entries
         WHERE user = ?1 AND valid = 1
           AND from_unix_s >= ?2 AND to_unix_s <= ?3
         ORDER BY from_unix_s ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![user.0, start, end], map_entry)?;
    rows.collect()
}

/// Returns the number of rows changed.
pub fn update_entry_interval(conn: &Connection, id: i64, from: i64, to: i64) -> Result<usize> {
    conn.execute(
        "UPDATE entries SET from_unix_s = ?1, to_unix_s = ?2 WHERE id = ?3",
        params![from, to, id],
    )
}

/// Returns the number of rows deleted.
pub fn delete_entry(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM entries WHERE id = ?1", [id])
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

pub fn insert_user(conn: &Connection, email: &str, admin: bool, created_at: &str) -> Result<UserId> {
    conn.execute(
        "INSERT INTO users (email, admin, created_at) VALUES (?1, ?2, ?3)",
        params![email, if admin { 1 } else { 0 }, created_at],
    )?;
    Ok(UserId(conn.last_insert_rowid()))
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT uid, email, admin, created_at FROM users WHERE email = ?1",
        [email],
        map_user,
    )
    .optional()
}

pub fn find_user(conn: &Connection, user: UserId) -> Result<Option<User>> {
    conn.query_row(
        "SELECT uid, email, admin, created_at FROM users WHERE uid = ?1",
        [user.0],
        map_user,
    )
    .optional()
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT uid, email, admin, created_at FROM users ORDER BY uid ASC")?;
    let rows = stmt.query_map([], map_user)?;
    rows.collect()
}

/// Users with no `user_states` row. Empty on a healthy ledger.
pub fn users_without_state(conn: &Connection) -> Result<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT u.uid FROM users u
         LEFT JOIN user_states s ON s.user = u.uid
         WHERE s.user IS NULL
         ORDER BY u.uid ASC",
    )?;
    let rows = stmt.query_map([], |row| Ok(UserId(row.get(0)?)))?;
    rows.collect()
}
