use crate::core::calculator::delta::Aggregator;
use crate::core::calculator::window::{day_window, month_window};
use crate::db::pool::DbPool;
use crate::db::queries::{count_online, fetch_state, list_online};
use crate::errors::{AppError, AppResult};
use crate::models::entry::OnlineUser;
use crate::models::state::State;
use crate::models::user::UserId;
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub state: State,
    pub since: i64,
    pub online: i64,
    pub delta_for_month: i64,
    pub delta_for_day: i64,
}

pub struct StatusLogic;

impl StatusLogic {
    /// State, online count and deltas for the month and the day of `today`.
    ///
    /// All reads share one read transaction, so the report is a single
    /// consistent snapshot of the ledger.
    pub fn report<Tz: TimeZone>(
        pool: &mut DbPool,
        user: UserId,
        today: NaiveDate,
        tz: &Tz,
    ) -> AppResult<StatusReport> {
        let month = month_window(today, tz)?;
        let day = day_window(today, tz)?;

        const OP: &str = "status";
        let fault = || AppError::tx(OP, user.0);

        let tx = pool.conn.transaction().map_err(fault())?;
        let current = fetch_state(&tx, user)
            .map_err(fault())?
            .ok_or(AppError::MissingState(user.0))?;
        let online = count_online(&tx).map_err(fault())?;
        let delta_for_month = Aggregator::delta(&tx, user, &month)?;
        let delta_for_day = Aggregator::delta(&tx, user, &day)?;
        // read-only: dropping rolls back

        Ok(StatusReport {
            state: current.state,
            since: current.since,
            online,
            delta_for_month,
            delta_for_day,
        })
    }

    pub fn count_online(pool: &DbPool) -> AppResult<i64> {
        count_online(&pool.conn).map_err(AppError::tx("count_online", 0))
    }

    pub fn list_online(pool: &DbPool) -> AppResult<Vec<OnlineUser>> {
        list_online(&pool.conn).map_err(AppError::tx("list_online", 0))
    }
}
