// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Upper bound on `_N` suffixes tried for one timestamp.
const MAX_SUFFIX: u32 = 1000;

/// Reserve `<dir>/<prefix>_<YYYY-MM-DD_HH-MM-SS>.<ext>` and return it.
///
/// The file is created empty (`create_new`) so a concurrent export in the
/// same second gets `<...>_2.<ext>`, `<...>_3.<ext>` instead of the same
/// path. Creates `dir` if missing.
pub fn export_file_path(
    dir: &Path,
    prefix: &str,
    format: ExportFormat,
    now: NaiveDateTime,
) -> AppResult<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }

    let stem = format!("{prefix}_{}", now.format("%Y-%m-%d_%H-%M-%S"));

    for n in 1..=MAX_SUFFIX {
        let name = if n == 1 {
            format!("{stem}.{}", format.as_str())
        } else {
            format!("{stem}_{n}.{}", format.as_str())
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Export(format!(
        "no free file name for {stem} in {}",
        dir.display()
    )))
}
