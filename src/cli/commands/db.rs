use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::queries::users_without_state;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    // migrations are NOT run implicitly here: `--migrate` does it
    let pool = DbPool::with_deadline(&cfg.database, cfg.busy_timeout())?;

    if *migrate {
        println!("{}▶ Running migrations…{}", CYAN, RESET);
        let applied = run_pending_migrations(&pool.conn)
            .map_err(|e| AppError::Migration(e.to_string()))?;
        println!(
            "{}✔ Migration completed ({} applied).{}\n",
            GREEN, applied, RESET
        );
    }

    if *info {
        stats::print_db_info(&pool, &cfg.database)?;
    }

    if *check {
        println!("{}▶ Running integrity check…{}", CYAN, RESET);

        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            println!("{}✔ Integrity check passed.{}", GREEN, RESET);
        } else {
            println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
        }

        let pending = pending_migrations(&pool.conn)?;
        if pending.is_empty() {
            println!("{}✔ Schema up to date.{}", GREEN, RESET);
        } else {
            println!(
                "{}⚠ Pending migrations:{} {}",
                YELLOW,
                RESET,
                pending.join(", ")
            );
        }

        // every user must own exactly one state row
        let orphans = if pending.is_empty() {
            users_without_state(&pool.conn)?
        } else {
            Vec::new()
        };
        if orphans.is_empty() {
            println!("{}✔ Every user has a state row.{}\n", GREEN, RESET);
        } else {
            let ids: Vec<String> = orphans.iter().map(|u| u.to_string()).collect();
            println!(
                "{}✘ Users without a state row:{} {}\n",
                RED,
                RESET,
                ids.join(", ")
            );
        }
    }

    if *vacuum {
        println!("{}▶ Running VACUUM…{}", CYAN, RESET);
        pool.conn.execute_batch("VACUUM;")?;
        println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
    }

    Ok(())
}
