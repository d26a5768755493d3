// libcedula/src/error.rs

use thiserror::Error;

use crate::protocol::status::StatusOutcome;

/// Common error type for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[cfg(feature = "pcsc")]
    #[error("pcsc error: {0}")]
    Pcsc(#[from] pcsc::Error),

    #[error("reader not found: {0}")]
    ReaderNotFound(String),

    #[error("no readers available")]
    NoReadersAvailable,

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("lc/data mismatch: lc={lc}, data={data} bytes")]
    LcMismatch { lc: usize, data: usize },

    #[error("response too short: {actual} bytes, need at least 2")]
    ResponseTooShort { actual: usize },

    #[error("card returned status {}: {}", .0.sw_hex(), .0.text)]
    Status(StatusOutcome),

    #[error("operation failed")]
    OperationFailed(StatusOutcome),

    #[error("operation not supported")]
    OperationNotSupported(StatusOutcome),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("tag not formattable: {0}")]
    NotFormattable(&'static str),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("operation timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, Error>;
