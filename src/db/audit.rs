//! Durable history of exports.
//!
//! `export_logs` holds one row per completed export, `attendance_records`
//! optionally holds the exported rows so an export can be browsed or
//! re-exported later. Deleting a log row cascades to its records.
//!
//! Writers from different threads/processes each open their own store;
//! SQLite serializes them (busy timeout + transactions).

use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{ExportLogEntry, MergedRecord, STORAGE_TIME_FORMAT, TIME_FORMAT};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub struct AuditStore {
    pool: DbPool,
}

impl AuditStore {
    /// Open (creating if needed) the store at `path` and run migrations.
    pub fn open(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let pool = DbPool::new(path)?;
        run_pending_migrations(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    /// Insert one `export_logs` row and return its id.
    /// A missing bound is stored as NULL.
    pub fn log_export(
        &self,
        device_name: &str,
        record_count: usize,
        file_path: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> AppResult<i64> {
        let created_at = Local::now().format(TIME_FORMAT).to_string();
        let fmt = |t: Option<NaiveDateTime>| t.map(|t| t.format(TIME_FORMAT).to_string());

        self.pool.conn.execute(
            "INSERT INTO export_logs (device_name, record_count, file_path, filter_start, filter_end, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                device_name,
                record_count as i64,
                file_path,
                fmt(start),
                fmt(end),
                created_at
            ],
        )?;

        let id = self.pool.conn.last_insert_rowid();
        info!(export_id = id, device = device_name, record_count, "export logged");
        Ok(id)
    }

    /// Bulk insert of the exported rows, in one transaction.
    /// Fails (nothing inserted) when `export_id` does not exist.
    pub fn save_details(&mut self, export_id: i64, records: &[MergedRecord]) -> AppResult<()> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO attendance_records (export_id, user_id, name, timestamp, punch_type, status)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for r in records {
                    stmt.execute(params![
                        export_id,
                        r.user_id,
                        r.name,
                        r.time.format(STORAGE_TIME_FORMAT).to_string(),
                        r.punch,
                        r.status
                    ])?;
                }
            }
            tx.commit()
        })?;

        debug!(export_id, rows = records.len(), "export details saved");
        Ok(())
    }

    /// Newest first.
    pub fn list_history(&self) -> AppResult<Vec<ExportLogEntry>> {
        let mut stmt = self.pool.conn.prepare(
            "SELECT id, device_name, record_count, filter_start, filter_end, file_path, timestamp
             FROM export_logs
             ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt.query_map([], map_entry)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get_entry(&self, export_id: i64) -> AppResult<ExportLogEntry> {
        self.pool
            .conn
            .query_row(
                "SELECT id, device_name, record_count, filter_start, filter_end, file_path, timestamp
                 FROM export_logs
                 WHERE id = ?1",
                [export_id],
                map_entry,
            )
            .optional()?
            .ok_or(AppError::NotFound(export_id))
    }

    /// Stored rows in insertion order; empty when none were saved.
    pub fn get_details(&self, export_id: i64) -> AppResult<Vec<MergedRecord>> {
        let mut stmt = self.pool.conn.prepare(
            "SELECT user_id, name, timestamp, punch_type, status
             FROM attendance_records
             WHERE export_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([export_id], map_record)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Remove the log row and (cascade) its records. Unknown id → `NotFound`.
    pub fn delete_export(&self, export_id: i64) -> AppResult<()> {
        let deleted = self
            .pool
            .conn
            .execute("DELETE FROM export_logs WHERE id = ?1", [export_id])?;

        if deleted == 0 {
            return Err(AppError::NotFound(export_id));
        }

        info!(export_id, "export deleted");
        Ok(())
    }
}

fn map_entry(row: &Row) -> rusqlite::Result<ExportLogEntry> {
    Ok(ExportLogEntry {
        id: row.get(0)?,
        device_name: row.get(1)?,
        record_count: row.get(2)?,
        filter_start: row.get(3)?,
        filter_end: row.get(4)?,
        file_path: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_record(row: &Row) -> rusqlite::Result<MergedRecord> {
    let ts: String = row.get(2)?;
    let time = NaiveDateTime::parse_from_str(&ts, STORAGE_TIME_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(ts.clone())),
        )
    })?;

    Ok(MergedRecord {
        user_id: row.get(0)?,
        name: row.get(1)?,
        time,
        punch: row.get(3)?,
        status: row.get(4)?,
    })
}
