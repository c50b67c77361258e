pub mod clock;
pub mod config;
pub mod db;
pub mod entries;
pub mod init;
pub mod log;
pub mod status;
pub mod sweep;
pub mod user;

use crate::config::Config;
use crate::core::identity::{Directory, IdentityResolver};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::user::UserId;

/// Open the configured database with the configured lock deadline and bring
/// the schema up to date.
pub fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::with_deadline(&cfg.database, cfg.busy_timeout())?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Resolve the acting user once; the id is then passed explicitly.
pub fn current_user(pool: &DbPool, cfg: &Config) -> AppResult<UserId> {
    let credential = cfg.default_user.as_deref().ok_or_else(|| {
        AppError::Unauthenticated("no user given (use --user or set default_user)".into())
    })?;
    Directory::new(&pool.conn).resolve(credential)
}
