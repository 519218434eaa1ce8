use crate::cli::commands::open_active_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::device::SharedSession;
use crate::errors::AppResult;
use crate::export::{
    AuditSettings, AuditStatus, ExportKind, ExportOutcome, ExportPipeline, ExportRequest, FileSink,
};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_optional_bound;
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Export {
        from,
        to,
        name,
        format,
        raw,
        no_details,
    } = cmd
    else {
        return Ok(());
    };

    let request = ExportRequest {
        start: parse_optional_bound(from.as_deref(), false)?,
        end: parse_optional_bound(to.as_deref(), true)?,
        name_filter: name.clone(),
        kind: if *raw {
            ExportKind::Raw
        } else {
            ExportKind::Merged
        },
    };

    if request.start.is_some() != request.end.is_some() {
        warning("Only one range bound given: all records will be exported.");
    }

    let format = format.unwrap_or(cfg.file_format);
    let session = SharedSession::new(open_active_session(cfg)?);

    let pipeline = ExportPipeline::new(
        session.clone(),
        Arc::new(FileSink::new(format)),
        format,
        cfg.export_dir(),
    )
    .with_audit(AuditSettings {
        database: cfg.database.clone(),
        save_details: cfg.save_details && !*no_details,
    });

    info(format!("Exporting attendance as {}…", format.as_str()));
    let outcome = pipeline.run_blocking(request)?;
    finish(outcome, &session)
}

/// Report the outcome, then close the session. A close failure after a
/// successful export is only a warning: the file and its history row exist.
fn finish(outcome: ExportOutcome, session: &SharedSession) -> AppResult<()> {
    let result = report(outcome);

    if let Err(e) = session.lock().and_then(|mut s| s.close()) {
        warning(format!("Device session did not close cleanly: {e}"));
    }

    result
}

fn report(outcome: ExportOutcome) -> AppResult<()> {
    match outcome {
        ExportOutcome::Exported { path, count, audit } => {
            success(format!(
                "Successfully exported {count} records to {}",
                path.display()
            ));
            match audit {
                AuditStatus::Logged { export_id } => info(format!("Recorded as export #{export_id}")),
                AuditStatus::DetailsFailed { export_id, message } => warning(format!(
                    "Export #{export_id} logged, but its records were not stored: {message}"
                )),
                AuditStatus::Skipped => {}
            }
        }
        ExportOutcome::NothingToExport => {
            warning("No attendance data retrieved for the selected range.");
        }
        ExportOutcome::Cancelled => warning("Export cancelled."),
        ExportOutcome::Failed(e) => return Err(e),
    }

    Ok(())
}
