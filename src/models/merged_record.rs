use super::TIME_FORMAT;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Name used when a punch has no matching user on the device.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A punch joined with its user: the unit exported and archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub user_id: i64,
    pub name: String,
    pub time: NaiveDateTime,
    pub punch: String,
    pub status: i32,
}

impl MergedRecord {
    pub fn time_str(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// Case-insensitive substring match on the user name.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
