// src/export/pipeline.rs
//
// One export = reconcile (device pull) + sink write (+ audit rows), executed on
// a worker thread. The caller gets the outcome exactly once through a callback.

use crate::db::AuditStore;
use crate::db::log::ttlog;
use crate::device::{ExportSlot, SharedSession};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::export_file_path;
use crate::export::model::{MERGED_HEADERS, RAW_HEADERS, punches_to_table, records_to_table};
use crate::export::{ExportFormat, ExportKind, TabularSink};
use crate::models::MergedRecord;
use crate::reconcile::AttendanceReconciler;
use chrono::{Local, NaiveDateTime};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

const EXPORT_PREFIX: &str = "attendance";

/// Parameters of a single run.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// Case-insensitive name filter, merged exports only.
    pub name_filter: Option<String>,
    pub kind: ExportKind,
}

/// Where (and how much) to persist in the audit store after a successful write.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub database: String,
    pub save_details: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditStatus {
    /// No audit store configured for this pipeline.
    Skipped,
    Logged { export_id: i64 },
    /// The log row exists but its records could not be stored.
    DetailsFailed { export_id: i64, message: String },
}

#[derive(Debug)]
pub enum ExportOutcome {
    Exported {
        path: PathBuf,
        count: usize,
        audit: AuditStatus,
    },
    /// The device returned nothing for the request. Not an error.
    NothingToExport,
    Cancelled,
    Failed(AppError),
}

impl ExportOutcome {
    pub fn count(&self) -> usize {
        match self {
            ExportOutcome::Exported { count, .. } => *count,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExportOutcome::Failed(_))
    }
}

/// Cooperative cancellation, checked before the device pull and before the write.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle to a started run.
pub struct ExportRun {
    handle: JoinHandle<()>,
    cancel: CancelToken,
}

impl ExportRun {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the worker (and its completion callback) has returned.
    pub fn wait(self) {
        if self.handle.join().is_err() {
            error!("export completion callback panicked");
        }
    }
}

pub struct ExportPipeline {
    session: SharedSession,
    sink: Arc<dyn TabularSink>,
    format: ExportFormat,
    export_dir: PathBuf,
    audit: Option<AuditSettings>,
}

/// Everything the worker needs, moved onto its thread.
struct Job {
    session: SharedSession,
    sink: Arc<dyn TabularSink>,
    format: ExportFormat,
    export_dir: PathBuf,
    audit: Option<AuditSettings>,
    request: ExportRequest,
    cancel: CancelToken,
}

impl ExportPipeline {
    pub fn new(
        session: SharedSession,
        sink: Arc<dyn TabularSink>,
        format: ExportFormat,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session,
            sink,
            format,
            export_dir: export_dir.into(),
            audit: None,
        }
    }

    /// Chain audit persistence onto every run.
    pub fn with_audit(mut self, settings: AuditSettings) -> Self {
        self.audit = Some(settings);
        self
    }

    pub fn is_running(&self) -> bool {
        self.session.is_exporting()
    }

    /// Start a run on a worker thread.
    ///
    /// Fails immediately with `Busy` if this session already has a run in
    /// flight, or `InvalidState` if the session is not open. Otherwise
    /// `on_complete` is called exactly once with the outcome.
    pub fn start<F>(&self, request: ExportRequest, on_complete: F) -> AppResult<ExportRun>
    where
        F: FnOnce(ExportOutcome) + Send + 'static,
    {
        let slot = self.session.try_begin_export().ok_or(AppError::Busy)?;

        if !self.session.lock()?.is_open() {
            return Err(AppError::InvalidState(
                "cannot export: no open device session".into(),
            ));
        }

        let cancel = CancelToken::default();
        let job = Job {
            session: self.session.clone(),
            sink: Arc::clone(&self.sink),
            format: self.format,
            export_dir: self.export_dir.clone(),
            audit: self.audit.clone(),
            request,
            cancel: cancel.clone(),
        };

        let handle = thread::Builder::new()
            .name("zkexport-worker".into())
            .spawn(move || run_job(job, slot, on_complete))?;

        Ok(ExportRun { handle, cancel })
    }

    /// Start a run and wait for its outcome on the calling thread.
    pub fn run_blocking(&self, request: ExportRequest) -> AppResult<ExportOutcome> {
        let (tx, rx) = mpsc::channel();
        let run = self.start(request, move |outcome| {
            let _ = tx.send(outcome);
        })?;

        let outcome = rx
            .recv()
            .map_err(|_| AppError::Export("export worker exited without reporting".into()))?;
        run.wait();
        Ok(outcome)
    }
}

fn run_job<F>(job: Job, slot: ExportSlot, on_complete: F)
where
    F: FnOnce(ExportOutcome),
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| execute(&job))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            error!(error = %e, "export failed");
            ExportOutcome::Failed(e)
        }
        Err(_) => {
            error!("export worker panicked");
            ExportOutcome::Failed(AppError::Export("export worker panicked".into()))
        }
    };

    // free the slot first so the callback may start the next run
    drop(slot);
    on_complete(outcome);
}

fn execute(job: &Job) -> AppResult<ExportOutcome> {
    let req = &job.request;

    if job.cancel.is_cancelled() {
        return Ok(ExportOutcome::Cancelled);
    }

    info!(kind = ?req.kind, start = ?req.start, end = ?req.end, "export started");

    let (device_name, rows, header, details): (String, _, &[&str], Option<Vec<MergedRecord>>) = {
        let mut session = job.session.lock()?;
        let device_name = session.device_name().unwrap_or_default().to_string();

        match req.kind {
            ExportKind::Merged => {
                let merged = AttendanceReconciler::reconcile(&mut session, req.start, req.end)?;
                let merged = match req.name_filter.as_deref() {
                    Some(needle) => AttendanceReconciler::filter_by_name(&merged, needle),
                    None => merged,
                };
                (device_name, records_to_table(&merged), &MERGED_HEADERS[..], Some(merged))
            }
            ExportKind::Raw => {
                if req.name_filter.is_some() {
                    warn!("name filter ignored for raw exports");
                }
                let punches = session.fetch_attendance(req.start, req.end)?;
                (device_name, punches_to_table(&punches), &RAW_HEADERS[..], None)
            }
        }
    };

    if rows.is_empty() {
        info!("no attendance data retrieved for the selected range");
        return Ok(ExportOutcome::NothingToExport);
    }

    if job.cancel.is_cancelled() {
        return Ok(ExportOutcome::Cancelled);
    }

    let path = export_file_path(
        &job.export_dir,
        EXPORT_PREFIX,
        job.format,
        Local::now().naive_local(),
    )?;
    let written = panic::catch_unwind(AssertUnwindSafe(|| job.sink.write(&rows, header, &path)))
        .unwrap_or_else(|_| Err(AppError::Export("export writer panicked".into())));
    if let Err(e) = written {
        // remove the empty reservation
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }

    let count = rows.len();
    let audit = match &job.audit {
        Some(settings) => persist(settings, &device_name, count, &path, req, details.as_deref())?,
        None => AuditStatus::Skipped,
    };

    info!(count, path = %path.display(), "export completed");
    Ok(ExportOutcome::Exported { path, count, audit })
}

/// Log the export; a failure on the detail rows leaves the log row in place.
fn persist(
    settings: &AuditSettings,
    device_name: &str,
    count: usize,
    path: &std::path::Path,
    req: &ExportRequest,
    details: Option<&[MergedRecord]>,
) -> AppResult<AuditStatus> {
    let mut store = AuditStore::open(&settings.database)?;
    let file_path = path.to_string_lossy();
    let export_id = store.log_export(device_name, count, &file_path, req.start, req.end)?;

    if let Err(e) = ttlog(
        store.conn(),
        "export",
        &file_path,
        &format!("Exported {count} records from {device_name}"),
    ) {
        warn!(error = %e, "failed to write internal log");
    }

    let Some(records) = details.filter(|_| settings.save_details) else {
        return Ok(AuditStatus::Logged { export_id });
    };

    match store.save_details(export_id, records) {
        Ok(()) => Ok(AuditStatus::Logged { export_id }),
        Err(e) => {
            warn!(export_id, error = %e, "export logged but its records were not saved");
            Ok(AuditStatus::DetailsFailed {
                export_id,
                message: e.to_string(),
            })
        }
    }
}
