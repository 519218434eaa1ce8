//! Lifecycle of one terminal connection.
//!
//! ```text
//! Disconnected ──open──► DeviceDisabled ◄──disable── DeviceEnabled
//!      ▲                      │   └──────enable──────►   │
//!      └────────close─────────┴──────────────────────────┘
//! ```
//!
//! `open` disables the terminal right away so nobody punches while data is
//! being pulled; `close` re-enables it before disconnecting.

use super::capability::{DeviceDriver, DeviceLink};
use crate::config::DeviceConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{RawAttendancePunch, RawUser};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    DeviceEnabled,
    DeviceDisabled,
}

pub struct DeviceSession {
    driver: Arc<dyn DeviceDriver>,
    config: Option<DeviceConfig>,
    link: Option<Box<dyn DeviceLink>>,
    state: SessionState,
}

impl DeviceSession {
    pub fn new(driver: Arc<dyn DeviceDriver>) -> Self {
        Self {
            driver,
            config: None,
            link: None,
            state: SessionState::Disconnected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    pub fn config(&self) -> Option<&DeviceConfig> {
        self.config.as_ref()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.config.as_ref().map(|c| c.name.as_str())
    }

    /// Validate `config`, connect and disable the terminal.
    /// An already open session is closed first (best-effort).
    pub fn open(&mut self, config: DeviceConfig) -> AppResult<()> {
        config.validate()?;

        if self.is_open() {
            warn!(
                old = self.device_name().unwrap_or_default(),
                new = %config.name,
                "session already open, closing it first"
            );
            self.close_on_teardown();
        }

        let address = config.address();
        let mut link = self
            .driver
            .connect(&config.ip, config.port, config.timeout, &config.password)
            .map_err(|e| {
                error!(%address, cause = %e, "device connect failed");
                AppError::Connection(format!("failed to connect to device {address}: {e}"))
            })?;
        self.state = SessionState::Connected;
        debug!(%address, "connected");

        if let Err(e) = link.disable() {
            error!(%address, cause = %e, "could not disable device after connect");
            if let Err(e) = link.disconnect() {
                warn!(%address, cause = %e, "disconnect after failed disable also failed");
            }
            self.state = SessionState::Disconnected;
            return Err(AppError::Connection(format!(
                "connected to {address} but could not disable the device: {e}"
            )));
        }

        info!(device = %config.name, %address, "device session opened");
        self.link = Some(link);
        self.config = Some(config);
        self.state = SessionState::DeviceDisabled;
        Ok(())
    }

    fn link_mut(&mut self, action: &str) -> AppResult<&mut Box<dyn DeviceLink>> {
        self.link
            .as_mut()
            .ok_or_else(|| AppError::InvalidState(format!("cannot {action}: no open device session")))
    }

    pub fn enable_device(&mut self) -> AppResult<()> {
        self.link_mut("enable device")?.enable().map_err(|e| {
            error!(cause = %e, "enable failed");
            AppError::Connection(format!("failed to enable device: {e}"))
        })?;
        self.state = SessionState::DeviceEnabled;
        Ok(())
    }

    pub fn disable_device(&mut self) -> AppResult<()> {
        self.link_mut("disable device")?.disable().map_err(|e| {
            error!(cause = %e, "disable failed");
            AppError::Connection(format!("failed to disable device: {e}"))
        })?;
        self.state = SessionState::DeviceDisabled;
        Ok(())
    }

    /// An absent flag reads as `false`.
    pub fn is_device_enabled(&mut self) -> AppResult<bool> {
        let flag = self.link_mut("query device")?.is_enabled().map_err(|e| {
            error!(cause = %e, "status query failed");
            AppError::Query(format!("error checking device status: {e}"))
        })?;
        Ok(flag.unwrap_or(false))
    }

    /// Re-enable the terminal (best-effort), then disconnect.
    pub fn close(&mut self) -> AppResult<()> {
        let Some(mut link) = self.link.take() else {
            return Err(AppError::InvalidState(
                "cannot close: no open device session".into(),
            ));
        };
        let name = self.config.take().map(|c| c.name).unwrap_or_default();
        self.state = SessionState::Disconnected;

        if let Err(e) = link.enable() {
            warn!(device = %name, cause = %e, "could not re-enable device before disconnect");
        }

        link.disconnect().map_err(|e| {
            error!(device = %name, cause = %e, "disconnect failed");
            AppError::Connection(format!("failed to disconnect from device: {e}"))
        })?;

        info!(device = %name, "device session closed");
        Ok(())
    }

    /// Application shutdown path: never fails, logs instead.
    pub fn close_on_teardown(&mut self) {
        if self.is_open()
            && let Err(e) = self.close()
        {
            warn!(cause = %e, "ignoring error while closing device session");
        }
    }

    pub fn fetch_users(&mut self) -> AppResult<Vec<RawUser>> {
        let users = self.link_mut("fetch users")?.list_users().map_err(|e| {
            error!(cause = %e, "user pull failed");
            AppError::Retrieval(format!("error retrieving users data: {e}"))
        })?;
        if users.is_empty() {
            warn!("no users data found");
        }
        Ok(users)
    }

    /// Full pull, then client-side `start <= t <= end` when both bounds are set.
    pub fn fetch_attendance(
        &mut self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> AppResult<Vec<RawAttendancePunch>> {
        let mut punches = self
            .link_mut("fetch attendance")?
            .list_attendance()
            .map_err(|e| {
                error!(cause = %e, "attendance pull failed");
                AppError::Retrieval(format!("error retrieving attendance data: {e}"))
            })?;

        if punches.is_empty() {
            warn!("no attendance data found");
        }

        if let (Some(s), Some(e)) = (start, end) {
            punches.retain(|p| p.within(s, e));
            debug!(kept = punches.len(), "attendance filtered by range");
        }

        Ok(punches)
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.close_on_teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{MemoryDevice, Op};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn config() -> DeviceConfig {
        DeviceConfig {
            name: "Lobby".into(),
            ip: "192.168.1.201".into(),
            port: 4370,
            timeout: 5,
            password: "1234".into(),
            snapshot: None,
        }
    }

    fn device() -> MemoryDevice {
        MemoryDevice::new(
            vec![RawUser::new(1, "Ann")],
            vec![
                RawAttendancePunch::new(1, at(8, 0, 0), 0, 1),
                RawAttendancePunch::new(1, at(12, 0, 0), 2, 1),
                RawAttendancePunch::new(1, at(17, 0, 0), 1, 1),
            ],
        )
    }

    fn session(dev: &MemoryDevice) -> DeviceSession {
        DeviceSession::new(Arc::new(dev.clone()))
    }

    #[test]
    fn open_disables_device_and_close_reenables() {
        let dev = device();
        let mut s = session(&dev);

        s.open(config()).unwrap();
        assert_eq!(s.state(), SessionState::DeviceDisabled);
        assert_eq!(dev.enabled_flag(), Some(false));
        assert!(dev.is_connected());

        s.close().unwrap();
        assert_eq!(s.state(), SessionState::Disconnected);
        assert_eq!(dev.enabled_flag(), Some(true));
        assert!(!dev.is_connected());
    }

    #[test]
    fn password_is_passed_through_unmodified() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        assert_eq!(dev.last_password().as_deref(), Some("1234"));
    }

    #[test]
    fn invalid_config_never_reaches_the_device() {
        let dev = device();
        let mut s = session(&dev);
        let mut cfg = config();
        cfg.ip = "localhost".into();

        assert!(matches!(s.open(cfg), Err(AppError::Configuration(_))));
        assert_eq!(dev.connect_count(), 0);
        assert_eq!(s.state(), SessionState::Disconnected);
    }

    #[test]
    fn connect_failure_is_connection_error_with_cause() {
        let dev = device();
        dev.fail(Op::Connect);
        let mut s = session(&dev);

        match s.open(config()) {
            Err(AppError::Connection(msg)) => assert!(msg.contains("no route")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(s.state(), SessionState::Disconnected);
    }

    #[test]
    fn operations_without_session_are_invalid_state() {
        let mut s = session(&device());
        assert!(matches!(s.enable_device(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.disable_device(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.is_device_enabled(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.close(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.fetch_users(), Err(AppError::InvalidState(_))));
        assert!(matches!(
            s.fetch_attendance(None, None),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn enable_disable_toggle_state() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();

        s.enable_device().unwrap();
        assert_eq!(s.state(), SessionState::DeviceEnabled);
        assert!(s.is_device_enabled().unwrap());

        s.disable_device().unwrap();
        assert_eq!(s.state(), SessionState::DeviceDisabled);
        assert!(!s.is_device_enabled().unwrap());
    }

    #[test]
    fn missing_enabled_flag_reads_false() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        dev.hide_enabled_flag();
        assert!(!s.is_device_enabled().unwrap());
    }

    #[test]
    fn status_query_failure_is_query_error() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        dev.fail(Op::IsEnabled);
        assert!(matches!(s.is_device_enabled(), Err(AppError::Query(_))));
    }

    #[test]
    fn reopen_closes_previous_connection() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        s.open(config()).unwrap();
        assert_eq!(dev.connect_count(), 2);
        assert!(s.is_open());
    }

    #[test]
    fn close_reports_disconnect_failure_but_ends_session() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        dev.fail(Op::Disconnect);

        assert!(matches!(s.close(), Err(AppError::Connection(_))));
        assert_eq!(s.state(), SessionState::Disconnected);
        // teardown on an already closed session is a no-op
        s.close_on_teardown();
    }

    #[test]
    fn close_survives_enable_failure() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        dev.fail(Op::Enable);
        s.close().unwrap();
        assert!(!dev.is_connected());
    }

    #[test]
    fn drop_restores_terminal() {
        let dev = device();
        {
            let mut s = session(&dev);
            s.open(config()).unwrap();
        }
        assert!(!dev.is_connected());
        assert_eq!(dev.enabled_flag(), Some(true));
    }

    #[test]
    fn attendance_range_is_inclusive() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();

        let all = s.fetch_attendance(None, None).unwrap();
        assert_eq!(all.len(), 3);

        let both_ends = s
            .fetch_attendance(Some(at(8, 0, 0)), Some(at(12, 0, 0)))
            .unwrap();
        assert_eq!(both_ends.len(), 2);

        let instant = s
            .fetch_attendance(Some(at(17, 0, 0)), Some(at(17, 0, 0)))
            .unwrap();
        assert_eq!(instant.len(), 1);
        assert_eq!(instant[0].timestamp, at(17, 0, 0));

        // a single bound does not filter
        let half = s.fetch_attendance(Some(at(16, 0, 0)), None).unwrap();
        assert_eq!(half.len(), 3);
    }

    #[test]
    fn pull_failures_are_retrieval_errors() {
        let dev = device();
        let mut s = session(&dev);
        s.open(config()).unwrap();
        dev.fail(Op::ListUsers);
        dev.fail(Op::ListAttendance);
        assert!(matches!(s.fetch_users(), Err(AppError::Retrieval(_))));
        assert!(matches!(
            s.fetch_attendance(None, None),
            Err(AppError::Retrieval(_))
        ));
    }

    #[test]
    fn empty_pull_is_not_an_error() {
        let dev = MemoryDevice::new(vec![], vec![]);
        let mut s = session(&dev);
        s.open(config()).unwrap();
        assert!(s.fetch_users().unwrap().is_empty());
        assert!(s.fetch_attendance(None, None).unwrap().is_empty());
    }
}
