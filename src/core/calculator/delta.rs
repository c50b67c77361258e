use crate::core::calculator::expected::calculate_expected;
use crate::core::calculator::window::Window;
use crate::db::queries::valid_entries_within;
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::models::user::UserId;
use chrono::TimeZone;
use rusqlite::Connection;

/// Seconds of valid work lying entirely inside the window.
pub fn worked_seconds<Tz: TimeZone>(entries: &[Entry], window: &Window<Tz>) -> i64 {
    entries
        .iter()
        .filter(|e| e.valid && window.contains_interval(e.from, e.to))
        .map(Entry::duration_secs)
        .sum()
}

/// Worked minus expected. Positive is overtime, negative a shortfall.
pub fn calculate_delta<Tz: TimeZone>(entries: &[Entry], window: &Window<Tz>) -> AppResult<i64> {
    Ok(worked_seconds(entries, window) - calculate_expected(window)?)
}

pub struct Aggregator;

impl Aggregator {
    /// Delta of `user` over `window`, from the entries currently stored.
    pub fn delta<Tz: TimeZone>(conn: &Connection, user: UserId, window: &Window<Tz>) -> AppResult<i64> {
        let entries = valid_entries_within(conn, user, window.start_secs(), window.end_secs())
            .map_err(AppError::tx("aggregate", user.0))?;
        calculate_delta(&entries, window)
    }
}
