use crate::cli::commands::ask_confirmation;
use crate::cli::parser::HistoryAction;
use crate::config::Config;
use crate::db::AuditStore;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::export::fs_utils::export_file_path;
use crate::export::model::{MERGED_HEADERS, records_to_table};
use crate::export::{ExportFormat, FileSink, TabularSink};
use crate::reconcile::AttendanceReconciler;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;
use chrono::Local;

pub fn handle(action: &HistoryAction, cfg: &Config) -> AppResult<()> {
    let store = AuditStore::open(&cfg.database)?;

    match action {
        HistoryAction::List => list(&store),
        HistoryAction::Show { id, name } => show(&store, *id, name.as_deref()),
        HistoryAction::Delete { id, yes } => delete(&store, *id, *yes),
        HistoryAction::Export { id, format } => {
            reexport(&store, cfg, *id, format.unwrap_or(cfg.file_format))
        }
    }
}

fn list(store: &AuditStore) -> AppResult<()> {
    let entries = store.list_history()?;
    if entries.is_empty() {
        info("No exports recorded yet.");
        return Ok(());
    }

    let mut table = Table::new(&["ID", "Created", "Device", "Records", "Range", "File"]);
    for e in &entries {
        table.add_row(vec![
            e.id.to_string(),
            e.created_at.clone(),
            e.device_name.clone(),
            e.record_count.to_string(),
            e.range_label(),
            e.file_path.clone(),
        ]);
    }

    println!("🗂️  Export history:\n");
    print!("{}", table.render());
    Ok(())
}

fn show(store: &AuditStore, id: i64, name: Option<&str>) -> AppResult<()> {
    let entry = store.get_entry(id)?;
    let mut records = store.get_details(id)?;
    if let Some(needle) = name {
        records = AttendanceReconciler::filter_by_name(&records, needle);
    }

    println!(
        "📄 Export #{} · {} · {} · {}\n",
        entry.id,
        entry.device_name,
        entry.created_at,
        entry.range_label()
    );

    if records.is_empty() {
        warning("No stored records for this export.");
        return Ok(());
    }

    let mut table = Table::new(&MERGED_HEADERS);
    for row in records_to_table(&records) {
        table.add_row(row);
    }
    print!("{}", table.render());
    info(format!("{} record(s)", records.len()));
    Ok(())
}

fn delete(store: &AuditStore, id: i64, yes: bool) -> AppResult<()> {
    let entry = store.get_entry(id)?;

    let prompt = format!(
        "Delete export #{id} ({} records from {})? This action is irreversible.",
        entry.record_count, entry.device_name
    );
    if !yes && !ask_confirmation(&prompt) {
        info("Operation cancelled.");
        return Ok(());
    }

    store.delete_export(id)?;
    success(format!("Export #{id} and its records have been deleted."));

    if let Err(e) = ttlog(store.conn(), "delete", &entry.file_path, &format!("Deleted export #{id}")) {
        warning(format!("Failed to write internal log: {e}"));
    }
    Ok(())
}

fn reexport(store: &AuditStore, cfg: &Config, id: i64, format: ExportFormat) -> AppResult<()> {
    store.get_entry(id)?;
    let records = store.get_details(id)?;
    if records.is_empty() {
        warning(format!(
            "Export #{id} has no stored records (saved without details or raw export)."
        ));
        return Ok(());
    }

    let path = export_file_path(
        &cfg.export_dir(),
        &format!("history_{id}"),
        format,
        Local::now().naive_local(),
    )?;
    FileSink::new(format).write(&records_to_table(&records), &MERGED_HEADERS, &path)?;

    success(format!(
        "Re-exported {} records of export #{id} to {}",
        records.len(),
        path.display()
    ));

    if let Err(e) = ttlog(
        store.conn(),
        "reexport",
        &path.to_string_lossy(),
        &format!("Re-exported export #{id}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }
    Ok(())
}
