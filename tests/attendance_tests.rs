use chrono::{NaiveDate, Utc};
use wms::core::attendance::{AttendanceLogic, ClockOutcome};
use wms::core::clock::FixedClock;
use wms::core::log::LogLogic;
use wms::core::status::StatusLogic;
use wms::db::queries::{insert_user, list_entries};
use wms::errors::AppError;
use wms::models::state::State;

mod common;
use common::{open_db, provision};

#[test]
fn test_clock_in_then_out_records_one_valid_entry() {
    let (_db, mut pool) = open_db("attendance_round_trip");
    let user = provision(&mut pool, "alice@example.com", false);

    let outcome = AttendanceLogic::clock_in(&mut pool, &FixedClock::new(1000), user).unwrap();
    assert_eq!(outcome, ClockOutcome::ClockedIn { since: 1000 });

    let state = AttendanceLogic::state(&pool, user).unwrap();
    assert_eq!(state.state, State::In);
    assert_eq!(state.since, 1000);

    let outcome = AttendanceLogic::clock_out(&mut pool, &FixedClock::new(4600), user).unwrap();
    let entry = match outcome {
        ClockOutcome::ClockedOut { entry } => entry,
        other => panic!("expected a clock-out, got {:?}", other),
    };
    assert_eq!((entry.from, entry.to, entry.valid), (1000, 4600, true));
    assert_eq!(entry.duration_secs(), 3600);

    let state = AttendanceLogic::state(&pool, user).unwrap();
    assert_eq!(state.state, State::Out);
    // the new `since` is the entry's end
    assert_eq!(state.since, 4600);

    let entries = list_entries(&pool.conn, user).unwrap();
    assert_eq!(entries, vec![entry]);
}

#[test]
fn test_clock_in_twice_is_a_no_op() {
    let (_db, mut pool) = open_db("attendance_in_twice");
    let user = provision(&mut pool, "bob@example.com", false);

    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(1000), user).unwrap();
    let again = AttendanceLogic::clock_in(&mut pool, &FixedClock::new(2000), user).unwrap();

    assert_eq!(again, ClockOutcome::AlreadyIn { since: 1000 });
    assert!(!again.changed());
    assert_eq!(AttendanceLogic::state(&pool, user).unwrap().since, 1000);
}

#[test]
fn test_clock_out_when_out_writes_nothing() {
    let (_db, mut pool) = open_db("attendance_out_when_out");
    let user = provision(&mut pool, "carol@example.com", false);

    let outcome = AttendanceLogic::clock_out(&mut pool, &FixedClock::new(500), user).unwrap();

    assert_eq!(outcome, ClockOutcome::AlreadyOut { since: 0 });
    assert!(list_entries(&pool.conn, user).unwrap().is_empty());
    assert_eq!(AttendanceLogic::state(&pool, user).unwrap().since, 0);
}

#[test]
fn test_clock_out_behind_session_start_is_clamped() {
    let (_db, mut pool) = open_db("attendance_clamped");
    let user = provision(&mut pool, "dave@example.com", false);

    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(5000), user).unwrap();
    let outcome = AttendanceLogic::clock_out(&mut pool, &FixedClock::new(4000), user).unwrap();

    let entry = match outcome {
        ClockOutcome::ClockedOut { entry } => entry,
        other => panic!("expected a clock-out, got {:?}", other),
    };
    assert_eq!((entry.from, entry.to), (5000, 5000));
    assert_eq!(AttendanceLogic::state(&pool, user).unwrap().since, 5000);
}

#[test]
fn test_missing_state_row_is_reported() {
    let (_db, mut pool) = open_db("attendance_missing_state");
    // bypass provisioning: a user without a state row
    let user = insert_user(&pool.conn, "ghost@example.com", false, "2024-01-01").unwrap();

    let err = AttendanceLogic::clock_in(&mut pool, &FixedClock::new(10), user).unwrap_err();
    assert!(matches!(err, AppError::MissingState(id) if id == user.0));
    assert!(err.is_internal());

    let err = AttendanceLogic::clock_out(&mut pool, &FixedClock::new(10), user).unwrap_err();
    assert!(matches!(err, AppError::MissingState(_)));
}

#[test]
fn test_transitions_are_audited() {
    let (_db, mut pool) = open_db("attendance_audited");
    let user = provision(&mut pool, "erin@example.com", false);

    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(100), user).unwrap();
    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(150), user).unwrap();
    AttendanceLogic::clock_out(&mut pool, &FixedClock::new(200), user).unwrap();

    let ins = LogLogic::load(&pool, Some("clock_in")).unwrap();
    let outs = LogLogic::load(&pool, Some("clock_out")).unwrap();

    // the no-op second clock-in leaves no trace
    assert_eq!(ins.len(), 1);
    assert_eq!(outs.len(), 1);
    assert_eq!(outs[0].target, user.to_string());
    assert!(outs[0].message.contains("from=100 to=200"));
}

#[test]
fn test_sessions_of_different_users_are_independent() {
    let (_db, mut pool) = open_db("attendance_independent");
    let a = provision(&mut pool, "a@example.com", false);
    let b = provision(&mut pool, "b@example.com", false);

    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(100), a).unwrap();
    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(200), b).unwrap();
    AttendanceLogic::clock_out(&mut pool, &FixedClock::new(300), a).unwrap();

    assert_eq!(AttendanceLogic::state(&pool, a).unwrap().state, State::Out);
    assert_eq!(AttendanceLogic::state(&pool, b).unwrap().state, State::In);
    assert_eq!(list_entries(&pool.conn, a).unwrap().len(), 1);
    assert!(list_entries(&pool.conn, b).unwrap().is_empty());
}

#[test]
fn test_round_trip_is_visible_in_entries_and_status() {
    let (_db, mut pool) = open_db("attendance_status_scenario");
    let user = provision(&mut pool, "frank@example.com", false);

    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(1000), user).unwrap();
    AttendanceLogic::clock_out(&mut pool, &FixedClock::new(4600), user).unwrap();

    let entries = list_entries(&pool.conn, user).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!((entries[0].from, entries[0].to, entries[0].valid), (1000, 4600, true));

    // 1970-01-01 was a Thursday
    let day = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let report = StatusLogic::report(&mut pool, user, day, &Utc).unwrap();
    assert_eq!((report.state, report.since), (State::Out, 4600));
    assert_eq!(report.delta_for_day, 3600 - 8 * 3600);
}
