use crate::models::{RawAttendancePunch, RawUser};
use thiserror::Error;

/// Opaque failure reported by a device capability.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Opens connections to a terminal. The password is handed over as configured.
pub trait DeviceDriver: Send + Sync {
    fn connect(
        &self,
        ip: &str,
        port: u16,
        timeout: u32,
        password: &str,
    ) -> CapabilityResult<Box<dyn DeviceLink>>;
}

/// An established connection (the "handle").
pub trait DeviceLink: Send {
    fn disconnect(&mut self) -> CapabilityResult<()>;
    fn enable(&mut self) -> CapabilityResult<()>;
    fn disable(&mut self) -> CapabilityResult<()>;
    /// `None` when the terminal does not report the flag.
    fn is_enabled(&mut self) -> CapabilityResult<Option<bool>>;
    fn list_users(&mut self) -> CapabilityResult<Vec<RawUser>>;
    fn list_attendance(&mut self) -> CapabilityResult<Vec<RawAttendancePunch>>;
}
