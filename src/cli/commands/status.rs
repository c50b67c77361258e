use crate::cli::commands::{current_user, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::identity::{Directory, require_admin};
use crate::core::status::{StatusLogic, StatusReport};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_delta, color_for_state};
use crate::utils::date::today;
use crate::utils::secs2readable;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_unix_local;
use chrono::Local;

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Other(e.to_string()))
}

/// Handle `status` and `online`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;
    let user = current_user(&pool, cfg)?;

    match cmd {
        Commands::Status { json } => {
            let report = StatusLogic::report(&mut pool, user, today(), &Local)?;
            if *json {
                println!("{}", to_json(&report)?);
            } else {
                print_status(&report);
            }
        }

        Commands::Online { list, json } => {
            if *list {
                require_admin(&Directory::new(&pool.conn), user)?;
                let online = StatusLogic::list_online(&pool)?;
                if *json {
                    println!("{}", to_json(&online)?);
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("ID", 3),
                    Column::new("EMAIL", 10),
                    Column::new("SINCE", 16),
                ]);
                for o in online {
                    table.add_row(vec![o.uid.to_string(), o.email, format_unix_local(o.since)]);
                }
                print!("{}", table.render());
            } else {
                let count = StatusLogic::count_online(&pool)?;
                if *json {
                    println!("{}", count);
                } else {
                    println!("👥 Online: {}", count);
                }
            }
        }

        _ => {}
    }

    Ok(())
}

fn print_status(r: &StatusReport) {
    header("Status");
    println!(
        "State : {}{}{} since {}",
        color_for_state(r.state.is_in()),
        r.state.label(),
        RESET,
        format_unix_local(r.since)
    );
    println!("Online: {}", r.online);
    println!(
        "Month : {}{}{}",
        color_for_delta(r.delta_for_month),
        secs2readable(r.delta_for_month, true, false),
        RESET
    );
    println!(
        "Today : {}{}{}",
        color_for_delta(r.delta_for_day),
        secs2readable(r.delta_for_day, true, false),
        RESET
    );
}
