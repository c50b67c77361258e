//! Aggregation windows: half-open `[start, end)` ranges of local time.
//!
//! Month and day bounds are built from explicit calendar dates (`day 1` of
//! this month, `day 1` of the next), never from day-zero offsets, which
//! would slide the window into the previous month.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone};

#[derive(Debug, Clone)]
pub struct Window<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> Window<Tz> {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn start_secs(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_secs(&self) -> i64 {
        self.end.timestamp()
    }

    /// Whether `[from, to]` lies entirely inside the window.
    pub fn contains_interval(&self, from: i64, to: i64) -> bool {
        from >= self.start_secs() && to <= self.end_secs()
    }
}

/// The first instant of `date` in `tz`: 00:00, or the first existing
/// quarter hour when midnight falls into a DST gap.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> AppResult<DateTime<Tz>> {
    for quarter in 0..(4 * 4) {
        let t = NaiveTime::from_hms_opt(quarter / 4, (quarter % 4) * 15, 0)
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        if let Some(dt) = tz.from_local_datetime(&date.and_time(t)).earliest() {
            return Ok(dt);
        }
    }
    Err(AppError::InvalidDate(date.to_string()))
}

/// `[day 1 00:00, next month day 1 00:00)` for the month containing `date`.
pub fn month_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> AppResult<Window<Tz>> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;

    let (next_y, next_m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;

    Ok(Window::new(
        start_of_day(tz, first)?,
        start_of_day(tz, next_first)?,
    ))
}

/// `[date 00:00, next day 00:00)`.
pub fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> AppResult<Window<Tz>> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;

    Ok(Window::new(start_of_day(tz, date)?, start_of_day(tz, next)?))
}
