// src/export/model.rs

use crate::models::{MergedRecord, RawAttendancePunch, RawUser, TIME_FORMAT};

/// Header of a merged export.
pub const MERGED_HEADERS: [&str; 5] = ["User ID", "Name", "Time", "Type", "Status"];

/// Header of a raw attendance export.
pub const RAW_HEADERS: [&str; 3] = ["id", "timestamp", "punch"];

/// Header of a users listing export.
pub const USER_HEADERS: [&str; 2] = ["id", "name"];

/// How a column is typed in spreadsheet output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Text,
    Integer,
    DateTime,
}

/// Typed columns are the known id/code/time columns; everything else is text.
pub(crate) fn column_kind(header: &str) -> ColumnKind {
    match header {
        "User ID" | "Status" | "id" | "punch" => ColumnKind::Integer,
        "Time" | "timestamp" => ColumnKind::DateTime,
        _ => ColumnKind::Text,
    }
}

pub(crate) fn record_to_row(r: &MergedRecord) -> Vec<String> {
    vec![
        r.user_id.to_string(),
        r.name.clone(),
        r.time_str(),
        r.punch.clone(),
        r.status.to_string(),
    ]
}

pub(crate) fn punch_to_row(p: &RawAttendancePunch) -> Vec<String> {
    vec![
        p.user_id.to_string(),
        p.timestamp.format(TIME_FORMAT).to_string(),
        p.punch_code.to_string(),
    ]
}

pub fn records_to_table(records: &[MergedRecord]) -> Vec<Vec<String>> {
    records.iter().map(record_to_row).collect()
}

pub fn users_to_table(users: &[RawUser]) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|u| vec![u.user_id.to_string(), u.name.clone()])
        .collect()
}

pub fn punches_to_table(punches: &[RawAttendancePunch]) -> Vec<Vec<String>> {
    punches.iter().map(punch_to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn rows_follow_header_order() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let rec = MergedRecord {
            user_id: 7,
            name: "Ann".into(),
            time: t,
            punch: "Check-In".into(),
            status: 1,
        };
        assert_eq!(
            records_to_table(&[rec]),
            vec![vec!["7", "Ann", "2024-01-01 08:00:00", "Check-In", "1"]]
        );

        let punch = RawAttendancePunch::new(7, t, 3, 1);
        assert_eq!(
            punches_to_table(&[punch]),
            vec![vec!["7", "2024-01-01 08:00:00", "3"]]
        );
    }

    #[test]
    fn only_known_columns_are_typed() {
        assert_eq!(column_kind("User ID"), ColumnKind::Integer);
        assert_eq!(column_kind("timestamp"), ColumnKind::DateTime);
        assert_eq!(column_kind("Name"), ColumnKind::Text);
        assert_eq!(column_kind("name"), ColumnKind::Text);
        assert_eq!(column_kind("Type"), ColumnKind::Text);
    }

    #[test]
    fn users_rows_are_id_then_name() {
        let users = vec![RawUser::new(3, "007")];
        assert_eq!(users_to_table(&users), vec![vec!["3", "007"]]);
    }
}
