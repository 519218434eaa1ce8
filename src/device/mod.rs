//! Terminal access: the capability seam, the session state machine and the
//! drivers shipped with the crate.

pub mod capability;
pub mod memory;
pub mod session;
pub mod shared;
pub mod snapshot;

pub use capability::{CapabilityError, CapabilityResult, DeviceDriver, DeviceLink};
pub use memory::{MemoryDevice, Op};
pub use session::{DeviceSession, SessionState};
pub use shared::{ExportSlot, SharedSession};
pub use snapshot::SnapshotDriver;
