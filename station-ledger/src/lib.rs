//! ChainRail Station Ledger
//!
//! Authoritative store for the station chain: one record per position,
//! plus the per-station claim records.
//!
//! # Architecture
//!
//! - **Single Writer**: one actor task owns the document store, so every
//!   read-modify-write is serialized
//! - **Document Store**: a flat JSON document (`resources` + `users`
//!   collections), optionally file-backed
//! - **Atomic Pair Writes**: both records of a transfer land together or
//!   not at all
//!
//! # Invariants
//!
//! - `toBuy >= 0` and `toSell >= 0` at all times
//! - Positions are stable identities, never reassigned
//! - Claim flags only ever flip false → true

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actor;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod storage;
pub mod types;

// Re-exports
pub use config::{ChainConfig, Config};
pub use error::{Error, Result};
pub use ledger::StationLedger;
pub use types::{AssignmentRecord, Station, StationId, StationUpdate};
