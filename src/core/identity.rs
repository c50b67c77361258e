//! User provisioning and the identity seams used by the command layer.
//!
//! Callers resolve an identity once and pass the resulting [`UserId`] into
//! every core operation; nothing below this layer looks identities up on
//! its own.

use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{find_user, find_user_by_email, insert_state, insert_user, list_users};
use crate::errors::{AppError, AppResult};
use crate::models::state::State;
use crate::models::user::{User, UserId};
use chrono::Local;
use rusqlite::Connection;
use tracing::info;

/// Turns a presented credential into a user identity, or fails as
/// unauthenticated.
pub trait IdentityResolver {
    fn resolve(&self, credential: &str) -> AppResult<UserId>;
}

/// Whether a user may correct raw entries.
pub trait AdminCheck {
    fn is_admin(&self, user: UserId) -> AppResult<bool>;
}

/// The `users` table as identity directory: the credential is the e-mail.
pub struct Directory<'a> {
    conn: &'a Connection,
}

impl<'a> Directory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl IdentityResolver for Directory<'_> {
    fn resolve(&self, credential: &str) -> AppResult<UserId> {
        let email = credential.trim();
        find_user_by_email(self.conn, email)
            .map_err(AppError::tx("resolve", 0))?
            .map(|u| u.id)
            .ok_or_else(|| AppError::Unauthenticated(format!("unknown user '{}'", email)))
    }
}

impl AdminCheck for Directory<'_> {
    fn is_admin(&self, user: UserId) -> AppResult<bool> {
        find_user(self.conn, user)
            .map_err(AppError::tx("admin_check", user.0))?
            .map(|u| u.admin)
            .ok_or_else(|| AppError::Unauthenticated(format!("unknown user id {}", user)))
    }
}

pub fn require_admin(check: &dyn AdminCheck, user: UserId) -> AppResult<()> {
    if check.is_admin(user)? {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "user {} is not an administrator",
            user
        )))
    }
}

pub struct UserLogic;

impl UserLogic {
    /// Create a user together with its attendance state row (`Out` since
    /// `now`), in one transaction.
    pub fn provision(pool: &mut DbPool, email: &str, admin: bool, now: i64) -> AppResult<UserId> {
        const OP: &str = "user_add";
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::InvalidEmail(email.to_string()));
        }

        let tx = pool.immediate().map_err(AppError::tx(OP, 0))?;
        if find_user_by_email(&tx, email)
            .map_err(AppError::tx(OP, 0))?
            .is_some()
        {
            return Err(AppError::UserExists(email.to_string()));
        }

        let created_at = Local::now().to_rfc3339();
        let uid = insert_user(&tx, email, admin, &created_at).map_err(AppError::tx(OP, 0))?;
        insert_state(&tx, uid, State::Out, now).map_err(AppError::tx(OP, uid.0))?;
        tx.commit().map_err(AppError::tx(OP, uid.0))?;

        info!(user = %uid, email, admin, "user provisioned");
        audit(
            &pool.conn,
            OP,
            email,
            &format!("uid={} admin={}", uid, admin),
        );

        Ok(uid)
    }

    pub fn list(pool: &DbPool) -> AppResult<Vec<User>> {
        list_users(&pool.conn).map_err(AppError::tx("user_list", 0))
    }
}
