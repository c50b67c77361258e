use wms::core::clock::FixedClock;
use wms::core::attendance::AttendanceLogic;
use wms::core::entries::EntriesLogic;
use wms::core::log::LogLogic;
use wms::db::queries::{get_entry, insert_entry};
use wms::errors::AppError;

mod common;
use common::{open_db, provision};

#[test]
fn test_list_is_chronological() {
    let (_db, mut pool) = open_db("entries_list");
    let user = provision(&mut pool, "alice@example.com", false);

    insert_entry(&pool.conn, user, 5000, 6000, true).unwrap();
    insert_entry(&pool.conn, user, 1000, 2000, false).unwrap();

    let entries = EntriesLogic::list(&pool, user).unwrap();
    let starts: Vec<i64> = entries.iter().map(|e| e.from).collect();
    assert_eq!(starts, vec![1000, 5000]);
}

#[test]
fn test_edit_replaces_the_interval() {
    let (_db, mut pool) = open_db("entries_edit");
    let admin = provision(&mut pool, "root@example.com", true);
    let user = provision(&mut pool, "bob@example.com", false);

    AttendanceLogic::clock_in(&mut pool, &FixedClock::new(1000), user).unwrap();
    AttendanceLogic::clock_out(&mut pool, &FixedClock::new(2000), user).unwrap();
    let id = EntriesLogic::list(&pool, user).unwrap()[0].id;

    let edited = EntriesLogic::edit(&mut pool, admin, id, 900, 2100).unwrap();
    assert_eq!((edited.from, edited.to, edited.valid), (900, 2100, true));
    assert_eq!(edited.user, user);

    let rows = LogLogic::load(&pool, Some("edit")).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].message.contains(&format!("by={}", admin)));
}

#[test]
fn test_edit_with_reversed_interval_is_rejected() {
    let (_db, mut pool) = open_db("entries_edit_reversed");
    let admin = provision(&mut pool, "root@example.com", true);
    let id = insert_entry(&pool.conn, admin, 1000, 2000, true).unwrap();

    let err = EntriesLogic::edit(&mut pool, admin, id, 3000, 2000).unwrap_err();
    assert!(matches!(err, AppError::InvalidInterval { from: 3000, to: 2000 }));

    // nothing changed
    let entry = get_entry(&pool.conn, id).unwrap().unwrap();
    assert_eq!((entry.from, entry.to), (1000, 2000));
}

#[test]
fn test_edit_and_delete_of_unknown_entry() {
    let (_db, mut pool) = open_db("entries_unknown");
    let admin = provision(&mut pool, "root@example.com", true);

    assert!(matches!(
        EntriesLogic::edit(&mut pool, admin, 404, 1, 2),
        Err(AppError::EntryNotFound(404))
    ));
    assert!(matches!(
        EntriesLogic::delete(&mut pool, admin, 404),
        Err(AppError::EntryNotFound(404))
    ));
}

#[test]
fn test_delete_removes_the_entry() {
    let (_db, mut pool) = open_db("entries_delete");
    let admin = provision(&mut pool, "root@example.com", true);
    let id = insert_entry(&pool.conn, admin, 1000, 2000, false).unwrap();

    EntriesLogic::delete(&mut pool, admin, id).unwrap();

    assert!(get_entry(&pool.conn, id).unwrap().is_none());
    assert_eq!(LogLogic::load(&pool, Some("del")).unwrap().len(), 1);
}

#[test]
fn test_store_rejects_reversed_intervals() {
    let (_db, mut pool) = open_db("entries_check_constraint");
    let user = provision(&mut pool, "carol@example.com", false);

    assert!(insert_entry(&pool.conn, user, 2000, 1000, true).is_err());
}

#[test]
fn test_list_store_fault_names_operation_and_user() {
    let (db_path, mut pool) = open_db("entries_list_fault");
    let user = provision(&mut pool, "dave@example.com", false);
    let id = insert_entry(&pool.conn, user, 1000, 2000, true).unwrap();

    // a `valid` column that no longer reads as an integer
    {
        let raw = rusqlite::Connection::open(&db_path).unwrap();
        raw.pragma_update(None, "ignore_check_constraints", "ON").unwrap();
        raw.execute("UPDATE entries SET valid = 'yes' WHERE id = ?1", [id])
            .unwrap();
    }

    let err = EntriesLogic::list(&pool, user).unwrap_err();
    assert!(
        matches!(err, AppError::Transaction { op: "entries_list", user: u, .. } if u == user.0),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_edit_returns_the_row_it_wrote() {
    let (_db, mut pool) = open_db("entries_edit_reread");
    let admin = provision(&mut pool, "root@example.com", true);
    let id = insert_entry(&pool.conn, admin, 1000, 2000, false).unwrap();

    let edited = EntriesLogic::edit(&mut pool, admin, id, 1500, 1500).unwrap();

    assert_eq!(edited, get_entry(&pool.conn, id).unwrap().unwrap());
    assert_eq!((edited.from, edited.to, edited.valid), (1500, 1500, false));
}
