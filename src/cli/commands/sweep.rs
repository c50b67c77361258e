use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::disqualifier::DisqualifyLogic;
use crate::core::scheduler::{DailySchedule, SleepTimer, SweepScheduler};
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::time::format_unix_local;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;

/// How often the daemon re-checks the clock while waiting.
const WAIT_SLICE: Duration = Duration::from_secs(30);

/// Handle `sweep` (one pass now) and `daemon` (daily loop).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match cmd {
        Commands::Sweep => {
            let report = DisqualifyLogic::sweep(&mut pool, &SystemClock)?;

            if report.disqualified.is_empty() {
                info("Nobody to disqualify.");
            }
            for e in &report.disqualified {
                warning(format!(
                    "User {} disqualified: {} → {} (entry #{})",
                    e.user,
                    format_unix_local(e.from),
                    format_unix_local(e.to),
                    e.id
                ));
            }
            for (user, reason) in &report.failed {
                error(format!("User {} could not be disqualified: {}", user, reason));
            }
            if report.is_clean() {
                success(format!(
                    "Sweep completed: {} disqualified, {} skipped",
                    report.disqualified.len(),
                    report.skipped.len()
                ));
            }
        }

        Commands::Daemon => {
            let clock: Arc<dyn Clock> = Arc::new(SystemClock);
            let schedule = DailySchedule::new(cfg.cutoff()?, Local);
            let next = schedule.next_after(clock.now_secs())?;

            info(format!(
                "Disqualifier running; daily cutoff {} (next: {})",
                schedule.cutoff().format("%H:%M"),
                format_unix_local(next)
            ));

            let scheduler = SweepScheduler::new(schedule, Arc::clone(&clock));
            let timer = SleepTimer::new(clock, WAIT_SLICE);
            scheduler.run(&mut pool, &timer, None)?;
        }

        _ => {}
    }

    Ok(())
}
