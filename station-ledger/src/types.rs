//! Core types for the station ledger
//!
//! All types serialize with camelCase field names to match the
//! document layout consumed by downstream subscribers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a station in the chain (stable identity, never reassigned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl StationId {
    /// Create a station id from a raw position
    pub fn new(position: u32) -> Self {
        Self(position)
    }

    /// Raw position value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Position of the previous station (supplier side), if any
    pub fn prev(&self) -> Option<StationId> {
        self.0.checked_sub(1).map(StationId)
    }

    /// Position of the next station (consumer side), if any
    pub fn next(&self) -> Option<StationId> {
        self.0.checked_add(1).map(StationId)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StationId {
    fn from(position: u32) -> Self {
        Self(position)
    }
}

/// A single station record in the chain
///
/// `to_buy` and `to_sell` are the pending exchange queues and are never
/// negative. `qty` is on-hand stock, distinct from the queues; the stock
/// operations adjust it without clamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Position in the chain
    pub position: StationId,

    /// Quantity queued to receive from the previous station
    pub to_buy: i64,

    /// Quantity queued to send to the next station
    pub to_sell: i64,

    /// Current on-hand stock
    pub qty: i64,

    /// Opaque scheduling attribute, carried through to notifications
    pub delivery_time: u32,
}

impl Station {
    /// Create a station with empty queues
    pub fn new(position: StationId, qty: i64, delivery_time: u32) -> Self {
        Self {
            position,
            to_buy: 0,
            to_sell: 0,
            qty,
            delivery_time,
        }
    }
}

/// Partial update applied atomically to a single station record
///
/// Fields left as `None` are untouched. Every update in this system sets
/// one or two fields per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationUpdate {
    /// New value for the pending-buy queue
    pub to_buy: Option<i64>,

    /// New value for the pending-sell queue
    pub to_sell: Option<i64>,

    /// New value for on-hand stock
    pub qty: Option<i64>,
}

impl StationUpdate {
    /// Update that sets the pending-buy queue
    pub fn to_buy(value: i64) -> Self {
        Self {
            to_buy: Some(value),
            ..Default::default()
        }
    }

    /// Update that sets the pending-sell queue
    pub fn to_sell(value: i64) -> Self {
        Self {
            to_sell: Some(value),
            ..Default::default()
        }
    }

    /// Update that sets on-hand stock
    pub fn qty(value: i64) -> Self {
        Self {
            qty: Some(value),
            ..Default::default()
        }
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.to_buy.is_none() && self.to_sell.is_none() && self.qty.is_none()
    }
}

/// Claim record for a station
///
/// `taken` only ever flips false → true; records are seeded at startup and
/// never created or deleted afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    /// Station position this record belongs to
    pub id: StationId,

    /// Whether a participant has claimed the station
    pub taken: bool,
}

impl AssignmentRecord {
    /// Fresh unclaimed record
    pub fn new(id: StationId) -> Self {
        Self { id, taken: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_id_neighbors() {
        let id = StationId::new(1);
        assert_eq!(id.prev(), Some(StationId::new(0)));
        assert_eq!(id.next(), Some(StationId::new(2)));

        // Source station has no predecessor
        assert_eq!(StationId::new(0).prev(), None);
    }

    #[test]
    fn test_station_serde_camel_case() {
        let station = Station {
            position: StationId::new(2),
            to_buy: 3,
            to_sell: 7,
            qty: 100,
            delivery_time: 2,
        };

        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["position"], 2);
        assert_eq!(json["toBuy"], 3);
        assert_eq!(json["toSell"], 7);
        assert_eq!(json["qty"], 100);
        assert_eq!(json["deliveryTime"], 2);
    }

    #[test]
    fn test_station_update_builders() {
        let update = StationUpdate::to_sell(6);
        assert_eq!(update.to_sell, Some(6));
        assert_eq!(update.to_buy, None);
        assert!(!update.is_empty());
        assert!(StationUpdate::default().is_empty());
    }

    #[test]
    fn test_assignment_record_seed() {
        let record = AssignmentRecord::new(StationId::new(1));
        assert!(!record.taken);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["taken"], false);
    }
}
