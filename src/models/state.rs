use super::user::UserId;
use serde::Serialize;

/// The two attendance states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    In,
    Out,
}

impl State {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            State::In => "I",
            State::Out => "O",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "I" => Some(State::In),
            "O" => Some(State::Out),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            State::In => "in",
            State::Out => "out",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, State::In)
    }
}

/// One row of `user_states`: where a user currently is, and since when
/// (unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceState {
    pub user: UserId,
    pub state: State,
    pub since: i64,
}
