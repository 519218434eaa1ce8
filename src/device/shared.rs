//! A session shared between the caller and export workers.

use super::session::DeviceSession;
use crate::errors::AppResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Clone)]
pub struct SharedSession {
    session: Arc<Mutex<DeviceSession>>,
    exporting: Arc<AtomicBool>,
}

/// Held by the export worker; releases the session's export slot on drop.
pub struct ExportSlot {
    flag: Arc<AtomicBool>,
}

impl Drop for ExportSlot {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SharedSession {
    pub fn new(session: DeviceSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            exporting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Lock the session. If a worker panicked while holding it, the session
    /// is closed (best-effort) and handed back closed; reopen it to continue.
    pub fn lock(&self) -> AppResult<MutexGuard<'_, DeviceSession>> {
        match self.session.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                warn!("device session poisoned by a panicked worker, closing it");
                let mut guard = poisoned.into_inner();
                guard.close_on_teardown();
                self.session.clear_poison();
                Ok(guard)
            }
        }
    }

    /// Claim the single export slot of this session, `None` if taken.
    pub fn try_begin_export(&self) -> Option<ExportSlot> {
        self.exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportSlot {
                flag: Arc::clone(&self.exporting),
            })
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }
}
