//! Driver backed by a JSON capture of a terminal:
//!
//! ```json
//! { "users": [ { "user_id": 1, "name": "Ann" } ],
//!   "attendance": [ { "user_id": 1, "timestamp": "2024-01-01T08:00:00", "punch_code": 0, "status": 1 } ] }
//! ```

use super::capability::{CapabilityResult, DeviceDriver, DeviceLink};
use super::memory::MemoryDevice;
use crate::config::DeviceConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{RawAttendancePunch, RawUser};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<RawUser>,
    #[serde(default)]
    attendance: Vec<RawAttendancePunch>,
}

pub struct SnapshotDriver {
    device: MemoryDevice,
}

impl SnapshotDriver {
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Connection(format!("cannot read snapshot {}: {e}", path.display()))
        })?;
        let snap: Snapshot = serde_json::from_str(&content).map_err(|e| {
            AppError::Connection(format!("invalid snapshot {}: {e}", path.display()))
        })?;

        debug!(
            path = %path.display(),
            users = snap.users.len(),
            punches = snap.attendance.len(),
            "snapshot loaded"
        );

        Ok(Self {
            device: MemoryDevice::new(snap.users, snap.attendance),
        })
    }

    /// Driver for a configured device; only snapshot-backed devices are reachable.
    pub fn for_device(cfg: &DeviceConfig) -> AppResult<Self> {
        match &cfg.snapshot {
            Some(p) => Self::from_file(&crate::utils::path::expand_tilde(p)),
            None => Err(AppError::Connection(format!(
                "device '{}' ({}) has no snapshot configured and no live driver is available",
                cfg.name,
                cfg.address()
            ))),
        }
    }
}

impl DeviceDriver for SnapshotDriver {
    fn connect(
        &self,
        ip: &str,
        port: u16,
        timeout: u32,
        password: &str,
    ) -> CapabilityResult<Box<dyn DeviceLink>> {
        self.device.connect(ip, port, timeout, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn loads_users_and_punches() {
        let mut path = env::temp_dir();
        path.push("snapshot_driver_loads.json");
        fs::write(
            &path,
            r#"{"users":[{"user_id":1,"name":"Ann"}],
                "attendance":[{"user_id":1,"timestamp":"2024-01-01T08:00:00","punch_code":0,"status":1}]}"#,
        )
        .unwrap();

        let driver = SnapshotDriver::from_file(&path).unwrap();
        let mut link = driver.connect("10.0.0.1", 4370, 5, "").unwrap();
        assert_eq!(link.list_users().unwrap(), vec![RawUser::new(1, "Ann")]);
        assert_eq!(link.list_attendance().unwrap().len(), 1);
    }

    #[test]
    fn device_without_snapshot_is_unreachable() {
        let cfg = DeviceConfig {
            name: "Gate".into(),
            ip: "10.0.0.1".into(),
            port: 4370,
            timeout: 5,
            password: String::new(),
            snapshot: None,
        };
        assert!(matches!(
            SnapshotDriver::for_device(&cfg),
            Err(AppError::Connection(_))
        ));
    }
}
