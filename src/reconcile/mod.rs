//! Joins attendance punches with the users enrolled on the terminal.

use crate::device::DeviceSession;
use crate::errors::AppResult;
use crate::models::merged_record::UNKNOWN_NAME;
use crate::models::{MergedRecord, PunchType, RawAttendancePunch, RawUser};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::debug;

pub struct AttendanceReconciler;

impl AttendanceReconciler {
    /// Pull users and punches through `session` and merge them.
    pub fn reconcile(
        session: &mut DeviceSession,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> AppResult<Vec<MergedRecord>> {
        let users = session.fetch_users()?;
        let punches = session.fetch_attendance(start, end)?;
        let merged = Self::merge(&users, &punches);
        debug!(
            users = users.len(),
            punches = punches.len(),
            "attendance reconciled"
        );
        Ok(merged)
    }

    /// One record per punch, in device order. Duplicate user ids: last one wins.
    pub fn merge(users: &[RawUser], punches: &[RawAttendancePunch]) -> Vec<MergedRecord> {
        let names: HashMap<i64, &str> = users
            .iter()
            .map(|u| (u.user_id, u.name.as_str()))
            .collect();

        punches
            .iter()
            .map(|p| MergedRecord {
                user_id: p.user_id,
                name: names
                    .get(&p.user_id)
                    .copied()
                    .unwrap_or(UNKNOWN_NAME)
                    .to_string(),
                time: p.timestamp,
                punch: PunchType::label_for_code(p.punch_code),
                status: p.status,
            })
            .collect()
    }

    /// Records whose name contains `needle`, ignoring case. Empty needle keeps everything.
    pub fn filter_by_name(records: &[MergedRecord], needle: &str) -> Vec<MergedRecord> {
        let needle = needle.trim();
        if needle.is_empty() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|r| r.name_matches(needle))
            .cloned()
            .collect()
    }
}
