//! Reading a user's entries, and the administrative corrections that bypass
//! the state machine (plain validated update / delete by id).

use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_entry, get_entry, list_entries, update_entry_interval};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::models::user::UserId;
use tracing::info;

pub struct EntriesLogic;

impl EntriesLogic {
    /// All entries of `user`, oldest first.
    pub fn list(pool: &DbPool, user: UserId) -> AppResult<Vec<Entry>> {
        list_entries(&pool.conn, user).map_err(AppError::tx("entries_list", user.0))
    }

    /// Replace the interval of an entry. `to < from` is rejected before the
    /// store is touched. The update and the re-read share one transaction,
    /// so the returned row is the one written.
    pub fn edit(pool: &mut DbPool, actor: UserId, id: i64, from: i64, to: i64) -> AppResult<Entry> {
        const OP: &str = "entries_edit";
        if to < from {
            return Err(AppError::InvalidInterval { from, to });
        }

        let fault = || AppError::tx(OP, actor.0);
        let tx = pool.immediate().map_err(fault())?;
        if update_entry_interval(&tx, id, from, to).map_err(fault())? == 0 {
            return Err(AppError::EntryNotFound(id));
        }
        let entry = get_entry(&tx, id)
            .map_err(fault())?
            .ok_or(AppError::EntryNotFound(id))?;
        tx.commit().map_err(fault())?;

        info!(%actor, entry = id, from, to, "entry edited");
        audit(
            &pool.conn,
            "edit",
            &format!("entry {}", id),
            &format!("by={} from={} to={}", actor, from, to),
        );

        Ok(entry)
    }

    pub fn delete(pool: &mut DbPool, actor: UserId, id: i64) -> AppResult<()> {
        let removed =
            delete_entry(&pool.conn, id).map_err(AppError::tx("entries_delete", actor.0))?;
        if removed == 0 {
            return Err(AppError::EntryNotFound(id));
        }

        info!(%actor, entry = id, "entry deleted");
        audit(
            &pool.conn,
            "del",
            &format!("entry {}", id),
            &format!("by={}", actor),
        );

        Ok(())
    }
}
