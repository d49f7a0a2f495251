//! Error types for the station ledger

use crate::types::StationId;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced station position has no record
    #[error("Station not found: {0}")]
    StationNotFound(StationId),

    /// Referenced assignment id has no record
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(StationId),

    /// Update would write a negative value to a queue field
    #[error("Negative queue value for station {position}: {field} = {value}")]
    NegativeQueue {
        /// Station the update targeted
        position: StationId,
        /// Field name (`toBuy` or `toSell`)
        field: &'static str,
        /// Rejected value
        value: i64,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
