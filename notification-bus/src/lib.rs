//! ChainRail Notification Bus
//!
//! Topic-based publish mechanism for station state changes:
//! - Fixed, typed topics; every current subscriber gets the same payload
//! - Independent per-subscriber queues; dropping the handle cancels
//! - Best-effort delivery: publishers never block on slow subscribers and
//!   no payload is persisted or replayed

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod bus;
pub mod error;
pub mod metrics;
pub mod notification;
pub mod topic;

pub use bus::{BusConfig, NotificationBus, Subscription};
pub use error::{Error, Result};
pub use notification::{Notification, TransferNotice};
pub use topic::Topic;
