// src/export/sink.rs

use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::json_csv::{write_csv, write_json};
use crate::export::xlsx::write_xlsx;
use std::path::Path;
use tracing::info;

/// Writes a header plus rows of cells to `path`.
pub trait TabularSink: Send + Sync {
    fn write(&self, rows: &[Vec<String>], header: &[&str], path: &Path) -> AppResult<()>;
}

/// File writer for one of the supported formats.
pub struct FileSink {
    format: ExportFormat,
}

impl FileSink {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }
}

impl TabularSink for FileSink {
    fn write(&self, rows: &[Vec<String>], header: &[&str], path: &Path) -> AppResult<()> {
        match self.format {
            ExportFormat::Xlsx => write_xlsx(rows, header, path)?,
            ExportFormat::Csv => write_csv(rows, header, path)?,
            ExportFormat::Json => write_json(rows, header, path)?,
        }
        info!(format = self.format.as_str(), rows = rows.len(), path = %path.display(), "export written");
        Ok(())
    }
}
