use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the internal `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create `export_logs` + `attendance_records` (cascade on delete).
fn create_audit_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS export_logs (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            device_name  TEXT NOT NULL,
            record_count INTEGER NOT NULL,
            filter_start TEXT,
            filter_end   TEXT,
            file_path    TEXT NOT NULL,
            timestamp    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS attendance_records (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            export_id  INTEGER NOT NULL,
            user_id    INTEGER NOT NULL,
            name       TEXT NOT NULL,
            timestamp  TEXT NOT NULL,
            punch_type TEXT NOT NULL,
            status     INTEGER NOT NULL,
            FOREIGN KEY(export_id) REFERENCES export_logs(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_records_export ON attendance_records(export_id);
        CREATE INDEX IF NOT EXISTS idx_export_logs_ts ON export_logs(timestamp);
        "#,
    )?;
    Ok(())
}

/// Public entry point: run all pending migrations. Idempotent.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "export_logs")? {
        create_audit_tables(conn)?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', 'audit_schema', 'Created export_logs and attendance_records')",
            [],
        )?;
        info!("audit schema created");
    } else {
        // older files may miss the indexes
        create_audit_tables(conn)?;
    }

    Ok(())
}
