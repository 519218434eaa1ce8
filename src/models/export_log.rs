use serde::Serialize;

/// One row of `export_logs`: a completed export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportLogEntry {
    pub id: i64,
    pub device_name: String,
    pub record_count: i64,
    pub filter_start: Option<String>,
    pub filter_end: Option<String>,
    pub file_path: String,
    pub created_at: String,
}

impl ExportLogEntry {
    /// Human-readable filter range, `all` when the export was unfiltered.
    pub fn range_label(&self) -> String {
        match (&self.filter_start, &self.filter_end) {
            (Some(s), Some(e)) => format!("{s} → {e}"),
            (Some(s), None) => format!("from {s}"),
            (None, Some(e)) => format!("until {e}"),
            (None, None) => "all".to_string(),
        }
    }
}
