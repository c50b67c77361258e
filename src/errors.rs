//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// A begin/commit/rollback or statement failure inside an attendance
    /// transaction. Nothing was written.
    #[error("Transaction '{op}' failed for user {user}: {source}")]
    Transaction {
        op: &'static str,
        user: i64,
        #[source]
        source: rusqlite::Error,
    },

    /// Every user gets a state row at provisioning; a missing one means the
    /// ledger is corrupt.
    #[error("No attendance state row for user {0}")]
    MissingState(i64),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid interval: to ({to}) is before from ({from})")]
    InvalidInterval { from: i64, to: i64 },

    #[error("Invalid timestamp: {0} (expected unix seconds or 'YYYY-MM-DD HH:MM')")]
    InvalidTimestamp(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Invalid e-mail address: '{0}'")]
    InvalidEmail(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    // ---------------------------
    // Identity
    // ---------------------------
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Wrap a store error with the operation and the user it happened for.
    pub fn tx(op: &'static str, user: i64) -> impl FnOnce(rusqlite::Error) -> AppError {
        move |source| AppError::Transaction { op, user, source }
    }

    /// Faults whose detail must not reach the user: store failures,
    /// corrupt ledger state, migrations and anything unexpected.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::Db(_)
                | AppError::Migration(_)
                | AppError::Transaction { .. }
                | AppError::MissingState(_)
                | AppError::Other(_)
        )
    }

    /// Message shown to the caller. Internal faults collapse to a generic
    /// line; the detail goes to the log.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "internal error (details were logged)".to_string()
        } else {
            self.to_string()
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
