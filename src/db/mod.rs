pub mod audit;
pub mod log;
pub mod migrate;
pub mod pool;

pub use audit::AuditStore;
