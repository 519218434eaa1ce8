//! Domain records flowing from the device to the export files and the audit store.

pub mod export_log;
pub mod merged_record;
pub mod punch_type;
pub mod raw;

pub use export_log::ExportLogEntry;
pub use merged_record::MergedRecord;
pub use punch_type::PunchType;
pub use raw::{RawAttendancePunch, RawUser};

/// Storage/display format for every timestamp handled by the crate.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lossless form used for stored punch times; `%.f` writes nothing for whole
/// seconds and accepts both shapes when parsing.
pub const STORAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
