// src/export/mod.rs

mod excel_date;
pub mod fs_utils;
mod json_csv;
pub mod model;
pub mod pipeline;
pub mod sink;
mod xlsx;

pub use pipeline::{
    AuditSettings, AuditStatus, CancelToken, ExportOutcome, ExportPipeline, ExportRequest,
    ExportRun,
};
pub use sink::{FileSink, TabularSink};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    #[serde(alias = "excel")]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// What an export run writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportKind {
    /// Punches joined with user names: `[User ID, Name, Time, Type, Status]`.
    #[default]
    Merged,
    /// Punches only: `[id, timestamp, punch]`.
    Raw,
}
