// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// JSON array of objects keyed by header, pretty-printed.
pub(crate) fn write_json(rows: &[Vec<String>], header: &[&str], path: &Path) -> AppResult<()> {
    let items: Vec<Value> = rows
        .iter()
        .map(|row| {
            let obj: Map<String, Value> = header
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.to_string(), Value::String(v.clone())))
                .collect();
            Value::Object(obj)
        })
        .collect();

    let json_data = serde_json::to_string_pretty(&items)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

/// CSV with a header line.
pub(crate) fn write_csv(rows: &[Vec<String>], header: &[&str], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(header)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for row in rows {
        wtr.write_record(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;
    Ok(())
}
