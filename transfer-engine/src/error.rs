//! Error types for the transfer engine

use station_ledger::StationId;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Negative quantity, rejected before any engine state is touched
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The source station cannot pull from a predecessor
    #[error("Station {0} has no predecessor")]
    NoPredecessor(StationId),

    /// The sink station cannot push to a successor
    #[error("Station {0} has no successor")]
    NoSuccessor(StationId),

    /// Ledger error (missing record, storage failure, ...)
    #[error(transparent)]
    Ledger(#[from] station_ledger::Error),
}
