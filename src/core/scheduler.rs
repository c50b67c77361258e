//! Daily disqualification schedule.
//!
//! A single loop: wait for the next cutoff, sweep, repeat. The loop never
//! runs two sweeps at once, and it always waits for a cutoff strictly in the
//! future, so a sweep finishing after the cutoff waits for the next day.

use crate::core::clock::Clock;
use crate::core::disqualifier::DisqualifyLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, TimeZone};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

/// A fixed wall-clock cutoff in a given time zone.
#[derive(Debug, Clone)]
pub struct DailySchedule<Tz: TimeZone> {
    cutoff: NaiveTime,
    tz: Tz,
}

impl<Tz: TimeZone> DailySchedule<Tz> {
    pub fn new(cutoff: NaiveTime, tz: Tz) -> Self {
        Self { cutoff, tz }
    }

    pub fn cutoff(&self) -> NaiveTime {
        self.cutoff
    }

    /// First cutoff instant strictly after `now` (unix seconds).
    ///
    /// A day whose cutoff falls into a DST gap is skipped.
    pub fn next_after(&self, now: i64) -> AppResult<i64> {
        let now_local = self
            .tz
            .timestamp_opt(now, 0)
            .single()
            .ok_or_else(|| AppError::Other(format!("timestamp out of range: {}", now)))?;

        let mut date = now_local.date_naive();
        for _ in 0..4 {
            if let Some(at) = self.tz.from_local_datetime(&date.and_time(self.cutoff)).earliest()
                && at.timestamp() > now
            {
                return Ok(at.timestamp());
            }
            date = date
                .succ_opt()
                .ok_or_else(|| AppError::Other("date out of range".into()))?;
        }

        Err(AppError::Other(format!(
            "no valid cutoff at {} after {}",
            self.cutoff, now
        )))
    }
}

/// Waits for a deadline on behalf of the scheduler.
pub trait Timer {
    /// Block until `deadline` (unix seconds) is reached. Returns `false` if
    /// `shutdown` was raised first.
    fn wait_until(&self, deadline: i64, shutdown: &AtomicBool) -> bool;
}

/// Sleeps on the real clock in short slices, re-reading the clock after each
/// one so wall-clock adjustments and shutdown requests are noticed.
pub struct SleepTimer {
    clock: Arc<dyn Clock>,
    slice: Duration,
}

impl SleepTimer {
    pub fn new(clock: Arc<dyn Clock>, slice: Duration) -> Self {
        Self { clock, slice }
    }
}

impl Timer for SleepTimer {
    fn wait_until(&self, deadline: i64, shutdown: &AtomicBool) -> bool {
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return false;
            }
            let remaining = deadline - self.clock.now_secs();
            if remaining <= 0 {
                return true;
            }
            let nap = Duration::from_secs(remaining as u64).min(self.slice);
            std::thread::sleep(nap);
        }
    }
}

pub struct SweepScheduler<Tz: TimeZone> {
    schedule: DailySchedule<Tz>,
    clock: Arc<dyn Clock>,
    shutdown: Arc<AtomicBool>,
}

impl<Tz: TimeZone> SweepScheduler<Tz> {
    pub fn new(schedule: DailySchedule<Tz>, clock: Arc<dyn Clock>) -> Self {
        Self {
            schedule,
            clock,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the loop at its next wake-up.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run until shutdown, or until `max_runs` sweeps have happened.
    /// Returns the number of sweeps run. A failed sweep is logged and the
    /// loop carries on with the next cutoff.
    pub fn run(&self, pool: &mut DbPool, timer: &dyn Timer, max_runs: Option<usize>) -> AppResult<usize> {
        let mut runs = 0;

        while max_runs.is_none_or(|max| runs < max) {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            let now = self.clock.now_secs();
            let next = self.schedule.next_after(now)?;
            info!(next_cutoff = next, in_secs = next - now, "waiting for disqualification cutoff");

            if !timer.wait_until(next, &self.shutdown) {
                break;
            }

            match DisqualifyLogic::sweep(pool, self.clock.as_ref()) {
                Ok(report) if report.is_clean() => {}
                Ok(report) => warn!(failed = report.failed.len(), "sweep finished with failures"),
                Err(e) => error!(error = %e, "disqualification sweep aborted"),
            }
            runs += 1;
        }

        info!(runs, "disqualification scheduler stopped");
        Ok(runs)
    }
}
