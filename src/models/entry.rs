use super::user::UserId;
use serde::Serialize;

/// A recorded work interval. `from <= to` always holds (enforced by a
/// CHECK constraint as well).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: i64,
    #[serde(skip)]
    pub user: UserId,
    pub from: i64, // ⇔ entries.from_unix_s
    pub to: i64,   // ⇔ entries.to_unix_s
    pub valid: bool,
}

impl Entry {
    pub fn duration_secs(&self) -> i64 {
        self.to - self.from
    }
}

/// A user currently clocked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlineUser {
    pub uid: UserId,
    pub email: String,
    pub since: i64,
}
