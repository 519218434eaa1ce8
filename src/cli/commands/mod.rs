pub mod config;
pub mod device;
pub mod export;
pub mod history;
pub mod init;
pub mod log;

use crate::config::Config;
use crate::device::{DeviceSession, SnapshotDriver};
use crate::errors::AppResult;
use crate::ui::messages::warning;
use std::io::{self, Write};
use std::sync::Arc;

/// Open a session on the configured active device.
pub(crate) fn open_active_session(cfg: &Config) -> AppResult<DeviceSession> {
    let device = cfg.active_device()?;
    let driver = SnapshotDriver::for_device(device)?;

    let mut session = DeviceSession::new(Arc::new(driver));
    session.open(device.clone())?;
    Ok(session)
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
