use crate::db::pool::DbPool;
use crate::db::queries::{count_online, users_without_state};
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW};
use crate::utils::time::format_unix_local;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) USERS / ONLINE
    //
    let users: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    let online = count_online(&pool.conn)?;
    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, users, RESET);
    println!("{}• Clocked in:{} {}", CYAN, RESET, online);

    //
    // 3) ENTRIES (valid / disqualified)
    //
    let (valid, invalid): (i64, i64) = pool.conn.query_row(
        "SELECT COALESCE(SUM(valid = 1), 0), COALESCE(SUM(valid = 0), 0) FROM entries",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!(
        "{}• Entries:{} {}{}{} valid, {}{}{} disqualified",
        CYAN, RESET, GREEN, valid, RESET, RED, invalid, RESET
    );

    //
    // 4) TIME RANGE
    //
    let (first, last): (Option<i64>, Option<i64>) = pool.conn.query_row(
        "SELECT MIN(from_unix_s), MAX(to_unix_s) FROM entries",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let fmt = |ts: Option<i64>| {
        ts.map(format_unix_local)
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Time range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    //
    // 5) LEDGER CONSISTENCY
    //
    let orphans = users_without_state(&pool.conn)?;
    if orphans.is_empty() {
        println!("{}• Attendance states:{} one per user", CYAN, RESET);
    } else {
        println!(
            "{}• Attendance states:{} {}{} user(s) without a state row{}",
            CYAN,
            RESET,
            RED,
            orphans.len(),
            RESET
        );
    }

    println!();
    Ok(())
}
