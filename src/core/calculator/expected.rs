use crate::core::calculator::window::{Window, start_of_day};
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, TimeZone, Weekday};

/// Expected work per weekday. Holidays are not modelled.
pub const EXPECTED_WEEKDAY_SECS: i64 = 8 * 60 * 60;

pub fn is_workday(day: Weekday) -> bool {
    !matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Monday-Friday calendar days whose start lies inside the window.
pub fn weekdays_in<Tz: TimeZone>(window: &Window<Tz>) -> AppResult<i64> {
    let tz = window.start.timezone();
    let mut date = window.start.date_naive();
    let mut count = 0;

    loop {
        let day_start = start_of_day(&tz, date)?;
        if day_start >= window.end {
            break;
        }
        if day_start >= window.start && is_workday(date.weekday()) {
            count += 1;
        }
        date = date
            .succ_opt()
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    }

    Ok(count)
}

/// Baseline for the window: 8 hours per weekday.
pub fn calculate_expected<Tz: TimeZone>(window: &Window<Tz>) -> AppResult<i64> {
    Ok(weekdays_in(window)? * EXPECTED_WEEKDAY_SECS)
}
