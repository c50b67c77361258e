use chrono::{Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use wms::core::attendance::AttendanceLogic;
use wms::core::calculator::delta::{Aggregator, calculate_delta, worked_seconds};
use wms::core::calculator::expected::{EXPECTED_WEEKDAY_SECS, calculate_expected, weekdays_in};
use wms::core::calculator::window::{Window, day_window, month_window};
use wms::core::clock::FixedClock;
use wms::core::status::StatusLogic;
use wms::db::queries::insert_entry;
use wms::errors::AppError;
use wms::models::entry::Entry;
use wms::models::state::State;
use wms::models::user::UserId;

mod common;
use common::{open_db, provision, utc};

const H: i64 = 3600;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(from: i64, to: i64, valid: bool) -> Entry {
    Entry {
        id: 0,
        user: UserId(1),
        from,
        to,
        valid,
    }
}

#[test]
fn test_month_window_bounds() {
    let w = month_window(date(2024, 3, 17), &Utc).unwrap();
    assert_eq!(w.start_secs(), utc(2024, 3, 1, 0, 0));
    assert_eq!(w.end_secs(), utc(2024, 4, 1, 0, 0));
    // never slides into the previous month
    assert_eq!(w.start.month(), 3);
}

#[test]
fn test_month_window_on_the_first_and_last_day() {
    let first = month_window(date(2024, 5, 1), &Utc).unwrap();
    let last = month_window(date(2024, 5, 31), &Utc).unwrap();
    assert_eq!(first.start_secs(), last.start_secs());
    assert_eq!(first.end_secs(), utc(2024, 6, 1, 0, 0));
    assert_eq!(last.end_secs(), utc(2024, 6, 1, 0, 0));
}

#[test]
fn test_december_window_ends_in_january() {
    let w = month_window(date(2024, 12, 10), &Utc).unwrap();
    assert_eq!(w.start_secs(), utc(2024, 12, 1, 0, 0));
    assert_eq!(w.end_secs(), utc(2025, 1, 1, 0, 0));
    // Dec 2024 starts on a Sunday: 22 weekdays
    assert_eq!(weekdays_in(&w).unwrap(), 22);
}

#[test]
fn test_leap_february_window() {
    let w = month_window(date(2024, 2, 29), &Utc).unwrap();
    assert_eq!(w.end_secs(), utc(2024, 3, 1, 0, 0));
    // Feb 2024: Thu 1st .. Thu 29th
    assert_eq!(weekdays_in(&w).unwrap(), 21);
}

#[test]
fn test_day_window_in_a_fixed_offset_zone() {
    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let w = day_window(date(2024, 3, 4), &plus_two).unwrap();
    assert_eq!(w.start_secs(), utc(2024, 3, 3, 22, 0));
    assert_eq!(w.end_secs() - w.start_secs(), 24 * H);
}

#[test]
fn test_expected_is_eight_hours_per_weekday() {
    // Monday
    let monday = day_window(date(2024, 3, 4), &Utc).unwrap();
    assert_eq!(calculate_expected(&monday).unwrap(), EXPECTED_WEEKDAY_SECS);

    // Saturday
    let saturday = day_window(date(2024, 3, 9), &Utc).unwrap();
    assert_eq!(calculate_expected(&saturday).unwrap(), 0);

    // March 2024: Fri 1st .. Sun 31st
    let march = month_window(date(2024, 3, 1), &Utc).unwrap();
    assert_eq!(calculate_expected(&march).unwrap(), 21 * 8 * H);
}

#[test]
fn test_delta_without_entries_is_minus_the_baseline() {
    let march = month_window(date(2024, 3, 1), &Utc).unwrap();
    assert_eq!(calculate_delta(&[], &march).unwrap(), -21 * 8 * H);

    let sunday = day_window(date(2024, 3, 10), &Utc).unwrap();
    assert_eq!(calculate_delta(&[], &sunday).unwrap(), 0);
}

#[test]
fn test_full_workday_balances_the_day() {
    let monday = day_window(date(2024, 3, 4), &Utc).unwrap();
    let entries = [entry(utc(2024, 3, 4, 9, 0), utc(2024, 3, 4, 17, 0), true)];
    assert_eq!(calculate_delta(&entries, &monday).unwrap(), 0);
}

#[test]
fn test_invalid_entries_do_not_count() {
    let monday = day_window(date(2024, 3, 4), &Utc).unwrap();
    let entries = [
        entry(utc(2024, 3, 4, 9, 0), utc(2024, 3, 4, 12, 0), true),
        entry(utc(2024, 3, 4, 13, 0), utc(2024, 3, 4, 20, 0), false),
    ];
    assert_eq!(worked_seconds(&entries, &monday), 3 * H);
}

#[test]
fn test_only_fully_contained_entries_count() {
    let monday = day_window(date(2024, 3, 4), &Utc).unwrap();
    let entries = [
        // across midnight into Monday
        entry(utc(2024, 3, 3, 22, 0), utc(2024, 3, 4, 2, 0), true),
        // ends exactly at the window end
        entry(utc(2024, 3, 4, 22, 0), utc(2024, 3, 5, 0, 0), true),
        // starts exactly at the window end
        entry(utc(2024, 3, 5, 0, 0), utc(2024, 3, 5, 1, 0), true),
    ];
    assert_eq!(worked_seconds(&entries, &monday), 2 * H);
}

#[test]
fn test_custom_window() {
    let w = Window::new(
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
    );
    assert_eq!(weekdays_in(&w).unwrap(), 5);
    assert!(w.contains_interval(w.start_secs(), w.end_secs()));
    assert!(!w.contains_interval(w.start_secs() - 1, w.end_secs()));
}

#[test]
fn test_aggregator_reads_only_the_users_valid_entries() {
    let (_db, mut pool) = open_db("aggregation_store");
    let alice = provision(&mut pool, "alice@example.com", false);
    let bob = provision(&mut pool, "bob@example.com", false);

    insert_entry(&pool.conn, alice, utc(2024, 3, 4, 9, 0), utc(2024, 3, 4, 18, 0), true).unwrap();
    insert_entry(&pool.conn, alice, utc(2024, 3, 5, 9, 0), utc(2024, 3, 5, 20, 0), false).unwrap();
    insert_entry(&pool.conn, bob, utc(2024, 3, 4, 9, 0), utc(2024, 3, 4, 12, 0), true).unwrap();

    let monday = day_window(date(2024, 3, 4), &Utc).unwrap();
    let tuesday = day_window(date(2024, 3, 5), &Utc).unwrap();
    let march = month_window(date(2024, 3, 4), &Utc).unwrap();

    assert_eq!(Aggregator::delta(&pool.conn, alice, &monday).unwrap(), H);
    assert_eq!(Aggregator::delta(&pool.conn, alice, &tuesday).unwrap(), -8 * H);
    assert_eq!(Aggregator::delta(&pool.conn, bob, &monday).unwrap(), -5 * H);
    assert_eq!(
        Aggregator::delta(&pool.conn, alice, &march).unwrap(),
        9 * H - 21 * 8 * H
    );
}

#[test]
fn test_status_report() {
    let (_db, mut pool) = open_db("aggregation_status");
    let alice = provision(&mut pool, "alice@example.com", false);
    let bob = provision(&mut pool, "bob@example.com", false);

    let morning = FixedClock::new(utc(2024, 3, 4, 8, 0));
    let evening = FixedClock::new(utc(2024, 3, 4, 16, 30));
    AttendanceLogic::clock_in(&mut pool, &morning, alice).unwrap();
    AttendanceLogic::clock_out(&mut pool, &evening, alice).unwrap();
    AttendanceLogic::clock_in(&mut pool, &morning, bob).unwrap();

    let report = StatusLogic::report(&mut pool, alice, date(2024, 3, 4), &Utc).unwrap();

    assert_eq!(report.state, State::Out);
    assert_eq!(report.since, utc(2024, 3, 4, 16, 30));
    assert_eq!(report.online, 1);
    assert_eq!(report.delta_for_day, H / 2);
    assert_eq!(report.delta_for_month, 8 * H + H / 2 - 21 * 8 * H);

    // the open session of bob does not count yet
    let report = StatusLogic::report(&mut pool, bob, date(2024, 3, 4), &Utc).unwrap();
    assert_eq!(report.state, State::In);
    assert_eq!(report.delta_for_day, -8 * H);
}

#[test]
fn test_status_of_a_user_without_state_fails() {
    let (_db, mut pool) = open_db("aggregation_status_missing");
    let err = StatusLogic::report(&mut pool, UserId(42), date(2024, 3, 4), &Utc).unwrap_err();
    assert!(matches!(err, AppError::MissingState(42)));
}

#[test]
fn test_status_report_json_shape() {
    let (_db, mut pool) = open_db("aggregation_status_json");
    let alice = provision(&mut pool, "alice@example.com", false);

    let report = StatusLogic::report(&mut pool, alice, date(2024, 3, 9), &Utc).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["state"], "out");
    assert_eq!(json["online"], 0);
    assert_eq!(json["deltaForDay"], 0);
    assert_eq!(json["deltaForMonth"], -21 * 8 * H);
}

#[test]
fn test_status_store_fault_names_operation_and_user() {
    let (db_path, mut pool) = open_db("aggregation_status_fault");
    let alice = provision(&mut pool, "alice@example.com", false);

    // a state symbol the store should never hold
    {
        let raw = rusqlite::Connection::open(&db_path).unwrap();
        raw.pragma_update(None, "ignore_check_constraints", "ON").unwrap();
        raw.execute("UPDATE user_states SET state = 'X' WHERE user = ?1", [alice.0])
            .unwrap();
    }

    let err = StatusLogic::report(&mut pool, alice, date(2024, 3, 4), &Utc).unwrap_err();
    assert!(
        matches!(err, AppError::Transaction { op: "status", user, .. } if user == alice.0),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_internal());
}
