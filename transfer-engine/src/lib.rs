//! ChainRail Transfer Engine
//!
//! Moves quantity between adjacent stations in the chain: a station's
//! pending-sell queue drains into its neighbor's pending-buy queue, the
//! actual transferred amount is reconciled when supply and demand mismatch,
//! and every state change is broadcast through the notification bus.
//!
//! The engine holds no persistent state: the station ledger is the single
//! source of truth, and the bus is fire-and-forget. Both are injected at
//! construction so independent engines can run against independent ledgers
//! in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod roster;

pub use config::Config;
pub use engine::{StockAdjustment, StockResponse, TransferEngine};
pub use error::{Error, Result};
pub use reconcile::{reconcile, Reconciliation};
pub use roster::Roster;
