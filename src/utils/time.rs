//! Time utilities: parsing HH:MM and timestamps, formatting unix seconds and durations.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, NaiveTime, TimeZone};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

/// Accepts unix seconds (`1700000000`) or local `YYYY-MM-DD HH:MM`.
pub fn parse_timestamp(s: &str) -> AppResult<i64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| AppError::InvalidTimestamp(s.to_string()))
}

/// `YYYY-MM-DD HH:MM` in local time; falls back to the raw number.
pub fn format_unix_local(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

/// Elapsed time as `Hh MMm SSs`; seconds are dropped from 100 hours up.
pub fn format_duration(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    let hours = s / 3600;
    let minutes = (s / 60) % 60;
    let seconds = s % 60;

    if hours < 100 {
        format!("{}{}h {:02}m {:02}s", sign, hours, minutes, seconds)
    } else {
        format!("{}{}h {:02}m", sign, hours, minutes)
    }
}
