//! Unified application error type.
//! Device, reconciliation, export and audit code all return AppError so the
//! CLI can report every failure the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Device session
    // ---------------------------
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Device query failed: {0}")]
    Query(String),

    #[error("Data retrieval failed: {0}")]
    Retrieval(String),

    // ---------------------------
    // Export
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("An export is already running for this device")]
    Busy,

    // ---------------------------
    // Audit store
    // ---------------------------
    #[error("Persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Export #{0} not found")]
    NotFound(i64),

    // ---------------------------
    // IO / parsing
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),
}

pub type AppResult<T> = Result<T, AppError>;
