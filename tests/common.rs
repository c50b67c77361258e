#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{TimeZone, Utc};
use std::env;
use std::fs;
use std::path::PathBuf;
use wms::core::identity::UserLogic;
use wms::db::initialize::init_db;
use wms::db::pool::DbPool;
use wms::models::user::UserId;

pub fn wms() -> Command {
    cargo_bin_cmd!("wms")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// existing file (WAL side files included)
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_wms.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{}{}", db_path, suffix)).ok();
    }
    db_path
}

/// Fresh database with the schema applied.
pub fn open_db(name: &str) -> (String, DbPool) {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    (db_path, pool)
}

pub fn provision(pool: &mut DbPool, email: &str, admin: bool) -> UserId {
    UserLogic::provision(pool, email, admin, 0).expect("provision user")
}

/// Unix seconds of a UTC wall-clock instant.
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid instant")
        .timestamp()
}

/// `wms --db <path> init` in test mode.
pub fn init_cli_db(db_path: &str) {
    wms()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}
