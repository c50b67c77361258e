use crate::cli::commands::{current_user, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, ClockOutcome};
use crate::core::clock::SystemClock;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time::{format_duration, format_unix_local};

/// Handle `in` and `out`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;
    let user = current_user(&pool, cfg)?;

    let outcome = match cmd {
        Commands::In => AttendanceLogic::clock_in(&mut pool, &SystemClock, user)?,
        Commands::Out => AttendanceLogic::clock_out(&mut pool, &SystemClock, user)?,
        _ => return Ok(()),
    };

    match outcome {
        ClockOutcome::ClockedIn { since } => {
            success(format!("Clocked in at {}", format_unix_local(since)))
        }
        ClockOutcome::AlreadyIn { since } => {
            info(format!("Already clocked in since {}", format_unix_local(since)))
        }
        ClockOutcome::ClockedOut { entry } => success(format!(
            "Clocked out at {} (entry #{}, {})",
            format_unix_local(entry.to),
            entry.id,
            format_duration(entry.duration_secs())
        )),
        ClockOutcome::AlreadyOut { since } => {
            info(format!("Already clocked out since {}", format_unix_local(since)))
        }
    }

    Ok(())
}
