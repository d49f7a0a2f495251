//! Notification envelope for pub/sub

use crate::topic::Topic;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use station_ledger::StationId;
use uuid::Uuid;

/// Notification envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification<T> {
    /// Notification ID (UUIDv7 for ordering)
    pub id: Uuid,

    /// Topic this notification was published on
    pub topic: Topic,

    /// Payload
    pub payload: T,

    /// Publish timestamp
    pub published_at: DateTime<Utc>,
}

impl<T> Notification<T> {
    /// Create new notification
    pub fn new(topic: Topic, payload: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            topic,
            payload,
            published_at: Utc::now(),
        }
    }
}

impl<T: Serialize> Notification<T> {
    /// Serialize to bytes
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl<T: DeserializeOwned> Notification<T> {
    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Per-station transfer payload for `BoughtResource` / `SoldResource`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferNotice {
    /// Station the transfer is reported for
    pub position: StationId,

    /// Quantity actually transferred
    pub qty: i64,

    /// Delivery time attribute carried from the supplying station
    pub delivery_time: u32,
}
