use crate::cli::commands::{current_user, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::entries::EntriesLogic;
use crate::core::identity::{Directory, require_admin};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{GREY, RED, RESET};
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_duration, format_unix_local, parse_timestamp};
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

/// Handle `entries`, `edit` and `del`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;
    let user = current_user(&pool, cfg)?;

    match cmd {
        Commands::Entries { json } => {
            let entries = EntriesLogic::list(&pool, user)?;
            if *json {
                let js = serde_json::to_string_pretty(&entries)
                    .map_err(|e| AppError::Other(e.to_string()))?;
                println!("{}", js);
            } else {
                print_entries(&entries);
            }
        }

        Commands::Edit { id, from, to } => {
            // validate input before anything else
            let from = parse_timestamp(from)?;
            let to = parse_timestamp(to)?;
            if to < from {
                return Err(AppError::InvalidInterval { from, to });
            }

            require_admin(&Directory::new(&pool.conn), user)?;
            let entry = EntriesLogic::edit(&mut pool, user, *id, from, to)?;
            success(format!(
                "Entry #{} now {} → {}",
                entry.id,
                format_unix_local(entry.from),
                format_unix_local(entry.to)
            ));
        }

        Commands::Del { id, yes } => {
            require_admin(&Directory::new(&pool.conn), user)?;

            if !*yes
                && !ask_confirmation(&format!(
                    "Delete entry #{}? This action is irreversible.",
                    id
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }

            EntriesLogic::delete(&mut pool, user, *id)?;
            success(format!("Entry #{} has been deleted.", id));
        }

        _ => {}
    }

    Ok(())
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        info("No entries recorded.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 3),
        Column::new("FROM", 16),
        Column::new("TO", 16),
        Column::new("DURATION", 8),
        Column::new("VALID", 5),
    ]);

    for e in entries {
        table.add_row(vec![
            e.id.to_string(),
            format_unix_local(e.from),
            format_unix_local(e.to),
            format_duration(e.duration_secs()),
            if e.valid { "yes".into() } else { "no".into() },
        ]);
    }

    print!("{}", table.render());

    let disqualified = entries.iter().filter(|e| !e.valid).count();
    if disqualified > 0 {
        println!(
            "{}{} disqualified entr{} not counted in deltas{}",
            RED,
            disqualified,
            if disqualified == 1 { "y" } else { "ies" },
            RESET
        );
    } else {
        println!("{}{} entries{}", GREY, entries.len(), RESET);
    }
}
