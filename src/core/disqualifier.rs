//! Force-closes sessions nobody clocked out of.
//!
//! Each clocked-in user is closed with an invalid entry in a transaction of
//! its own. A failure for one user is logged and the sweep moves on.

use crate::core::attendance::closing_time;
use crate::core::clock::Clock;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{fetch_state, insert_entry, states_in, write_state};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::models::state::{AttendanceState, State};
use crate::models::user::UserId;
use tracing::{error, info};

#[derive(Debug, Default)]
pub struct SweepReport {
    /// Invalid entries written by this sweep.
    pub disqualified: Vec<Entry>,
    /// Candidates whose session changed before their turn came.
    pub skipped: Vec<UserId>,
    pub failed: Vec<(UserId, String)>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct DisqualifyLogic;

impl DisqualifyLogic {
    /// One pass over every user currently clocked in.
    ///
    /// Fails only when the candidate list itself cannot be read.
    pub fn sweep(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<SweepReport> {
        let candidates = states_in(&pool.conn)?;
        let mut report = SweepReport::default();

        info!(candidates = candidates.len(), "disqualification sweep started");

        for candidate in candidates {
            match Self::disqualify(pool, clock, &candidate) {
                Ok(Some(entry)) => report.disqualified.push(entry),
                Ok(None) => report.skipped.push(candidate.user),
                Err(e) => {
                    error!(user = %candidate.user, error = %e, "failed to disqualify user, skipping");
                    report.failed.push((candidate.user, e.to_string()));
                }
            }
        }

        info!(
            disqualified = report.disqualified.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "disqualification sweep finished"
        );
        audit(
            &pool.conn,
            "sweep",
            "",
            &format!(
                "disqualified={} skipped={} failed={}",
                report.disqualified.len(),
                report.skipped.len(),
                report.failed.len()
            ),
        );

        Ok(report)
    }

    /// Close one candidate's session. Returns `None` when, under the lock,
    /// the user is no longer in the session the candidate was selected for
    /// (clocked out meanwhile, or clocked out and back in).
    fn disqualify(
        pool: &mut DbPool,
        clock: &dyn Clock,
        candidate: &AttendanceState,
    ) -> AppResult<Option<Entry>> {
        const OP: &str = "disqualify";
        let user = candidate.user;
        let fault = || AppError::tx(OP, user.0);

        let tx = pool.immediate().map_err(fault())?;
        let current = fetch_state(&tx, user)
            .map_err(fault())?
            .ok_or(AppError::MissingState(user.0))?;

        if current.state != State::In || current.since != candidate.since {
            return Ok(None);
        }

        let now = closing_time(clock, &current);
        let id = insert_entry(&tx, user, current.since, now, false).map_err(fault())?;
        write_state(&tx, user, State::Out, now).map_err(fault())?;
        tx.commit().map_err(fault())?;

        info!(%user, entry = id, from = current.since, to = now, "user disqualified");
        audit(
            &pool.conn,
            OP,
            &user.to_string(),
            &format!("entry={} from={} to={}", id, current.since, now),
        );

        Ok(Some(Entry {
            id,
            user,
            from: current.since,
            to: now,
            valid: false,
        }))
    }
}
