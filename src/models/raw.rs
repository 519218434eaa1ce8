use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A user as enrolled on the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub user_id: i64,
    pub name: String,
}

impl RawUser {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

/// One attendance punch as stored by the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttendancePunch {
    pub user_id: i64,
    pub timestamp: NaiveDateTime,
    pub punch_code: i32,
    pub status: i32,
}

impl RawAttendancePunch {
    pub fn new(user_id: i64, timestamp: NaiveDateTime, punch_code: i32, status: i32) -> Self {
        Self {
            user_id,
            timestamp,
            punch_code,
            status,
        }
    }

    /// Inclusive on both ends.
    pub fn within(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.timestamp && self.timestamp <= end
    }
}
