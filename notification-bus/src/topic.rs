//! Fixed topics for the notification bus

use serde::{Deserialize, Serialize};

/// Notification topic
///
/// Topics are fixed, typed channels: every subscriber on a topic receives
/// the same payload, and subscriptions never affect published history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Full station snapshot after any ledger change
    AvailableResourcesChanged,
    /// Quantity received by a station
    BoughtResource,
    /// Quantity sent by a station
    SoldResource,
    /// Filtered assignment snapshot after a claim
    UsersChanged,
}

impl Topic {
    /// Stable subject string for this topic
    pub fn subject(&self) -> &'static str {
        match self {
            Topic::AvailableResourcesChanged => "chainrail.resources.available",
            Topic::BoughtResource => "chainrail.resources.bought",
            Topic::SoldResource => "chainrail.resources.sold",
            Topic::UsersChanged => "chainrail.users.changed",
        }
    }
}
