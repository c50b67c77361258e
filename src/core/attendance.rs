//! The attendance state machine: clock in, clock out.
//!
//! Both transitions run as one IMMEDIATE transaction against the user's
//! state row. The write lock is held from the first read to the commit, so
//! two callers racing on the same user observe a single order of
//! transitions: exactly one of them sees `In` and closes the session.

use crate::core::clock::Clock;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{fetch_state, insert_entry, write_state};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::models::state::{AttendanceState, State};
use crate::models::user::UserId;
use tracing::{debug, info, warn};

/// What a clock-in / clock-out did. The `Already*` variants are no-ops and
/// still count as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockOutcome {
    ClockedIn { since: i64 },
    AlreadyIn { since: i64 },
    ClockedOut { entry: Entry },
    AlreadyOut { since: i64 },
}

impl ClockOutcome {
    /// `true` when the state row was written.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            ClockOutcome::ClockedIn { .. } | ClockOutcome::ClockedOut { .. }
        )
    }
}

pub struct AttendanceLogic;

impl AttendanceLogic {
    pub fn clock_in(pool: &mut DbPool, clock: &dyn Clock, user: UserId) -> AppResult<ClockOutcome> {
        const OP: &str = "clock_in";
        let fault = || AppError::tx(OP, user.0);

        let tx = pool.immediate().map_err(fault())?;
        let current = fetch_state(&tx, user)
            .map_err(fault())?
            .ok_or(AppError::MissingState(user.0))?;

        if current.state == State::In {
            debug!(%user, since = current.since, "already clocked in");
            return Ok(ClockOutcome::AlreadyIn {
                since: current.since,
            });
        }

        let now = clock.now_secs();
        write_state(&tx, user, State::In, now).map_err(fault())?;
        tx.commit().map_err(fault())?;

        info!(%user, since = now, "clocked in");
        audit(&pool.conn, OP, &user.to_string(), &format!("since={}", now));

        Ok(ClockOutcome::ClockedIn { since: now })
    }

    pub fn clock_out(pool: &mut DbPool, clock: &dyn Clock, user: UserId) -> AppResult<ClockOutcome> {
        const OP: &str = "clock_out";
        let fault = || AppError::tx(OP, user.0);

        let tx = pool.immediate().map_err(fault())?;
        let current = fetch_state(&tx, user)
            .map_err(fault())?
            .ok_or(AppError::MissingState(user.0))?;

        if current.state == State::Out {
            debug!(%user, since = current.since, "already clocked out");
            return Ok(ClockOutcome::AlreadyOut {
                since: current.since,
            });
        }

        // captured once: the entry end and the new `since` must match
        let now = closing_time(clock, &current);

        let id = insert_entry(&tx, user, current.since, now, true).map_err(fault())?;
        write_state(&tx, user, State::Out, now).map_err(fault())?;
        tx.commit().map_err(fault())?;

        let entry = Entry {
            id,
            user,
            from: current.since,
            to: now,
            valid: true,
        };

        info!(%user, entry = id, from = entry.from, to = entry.to, "clocked out");
        audit(
            &pool.conn,
            OP,
            &user.to_string(),
            &format!("entry={} from={} to={}", id, entry.from, entry.to),
        );

        Ok(ClockOutcome::ClockedOut { entry })
    }

    /// Current state row of a user, read from the store on every call.
    pub fn state(pool: &DbPool, user: UserId) -> AppResult<AttendanceState> {
        fetch_state(&pool.conn, user)?.ok_or(AppError::MissingState(user.0))
    }
}

/// `now`, clamped so an interval never ends before it started.
pub(crate) fn closing_time(clock: &dyn Clock, current: &AttendanceState) -> i64 {
    let now = clock.now_secs();
    if now < current.since {
        warn!(
            user = %current.user,
            since = current.since,
            now,
            "clock is behind the session start, closing at the start instant"
        );
        return current.since;
    }
    now
}
