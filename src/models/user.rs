use serde::Serialize;
use std::fmt;

/// Resolved identity of a user (`users.uid`).
///
/// Obtained once per request through an identity resolver and passed
/// explicitly into every core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub admin: bool,
    pub created_at: String, // ⇔ users.created_at (TEXT, ISO8601)
}
