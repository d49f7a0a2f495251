//! Error types for the notification bus

use thiserror::Error;

/// Result type for bus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bus errors
///
/// Publishing never fails; these surface only on the subscriber side.
#[derive(Error, Debug)]
pub enum Error {
    /// Subscriber fell behind and missed notifications
    #[error("Subscription lagged, {0} notifications skipped")]
    Lagged(u64),

    /// Bus was dropped while the subscription was still open
    #[error("Notification channel closed")]
    Closed,
}
