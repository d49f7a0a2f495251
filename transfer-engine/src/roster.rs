//! Station assignment roster
//!
//! Tracks which participant has claimed which station. The two terminal
//! positions (pure source and pure sink) are never assignable and never
//! appear in any published view.

use crate::error::Result;
use notification_bus::NotificationBus;
use station_ledger::{AssignmentRecord, StationId, StationLedger};
use std::sync::Arc;
use tracing::info;

/// Assignment roster over the ledger's claim records
pub struct Roster {
    ledger: StationLedger,
    bus: Arc<NotificationBus>,
}

impl Roster {
    /// Create new roster
    pub fn new(ledger: StationLedger, bus: Arc<NotificationBus>) -> Self {
        Self { ledger, bus }
    }

    /// Claim a station for a participant
    ///
    /// Soft-fails with `false` when the station is already taken: no
    /// mutation, no event. A successful claim publishes the filtered
    /// assignment snapshot.
    pub async fn claim(&self, id: StationId) -> Result<bool> {
        if !self.ledger.claim(id).await? {
            return Ok(false);
        }

        info!(station = %id, "Station claimed");

        let assignments = self.ledger.assignments().await?;
        self.bus.publish_users_changed(filter_assignable(&assignments));
        Ok(true)
    }

    /// Assignable stations: every record except the terminal positions,
    /// with no filtering on `taken`
    pub async fn list_assignable(&self) -> Result<Vec<AssignmentRecord>> {
        let assignments = self.ledger.assignments().await?;
        Ok(filter_assignable(&assignments))
    }
}

/// Drop the first and last position from an assignment snapshot
fn filter_assignable(records: &[AssignmentRecord]) -> Vec<AssignmentRecord> {
    let last = records.len().saturating_sub(1) as u32;
    records
        .iter()
        .filter(|r| r.id.value() != 0 && r.id.value() != last)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notification_bus::BusConfig;
    use station_ledger::Station;

    fn roster(length: u32) -> Roster {
        let stations = (0..length)
            .map(|p| Station::new(StationId::new(p), 100, 2))
            .collect();
        let ledger = StationLedger::with_stations(stations);
        let bus = Arc::new(NotificationBus::new(BusConfig::default()));
        Roster::new(ledger, bus)
    }

    #[tokio::test]
    async fn test_claim_then_repeat_claim() {
        let roster = roster(4);
        let mut users = roster.bus.subscribe_users_changed();

        assert!(roster.claim(StationId::new(1)).await.unwrap());
        let published = users.recv().await.unwrap().payload;
        assert!(published.iter().any(|r| r.id == StationId::new(1) && r.taken));

        // Second claim soft-fails and publishes nothing
        assert!(!roster.claim(StationId::new(1)).await.unwrap());
        assert!(futures::poll!(Box::pin(users.recv())).is_pending());
    }

    #[tokio::test]
    async fn test_terminal_positions_never_published() {
        let roster = roster(4);
        let mut users = roster.bus.subscribe_users_changed();

        roster.claim(StationId::new(2)).await.unwrap();
        let published = users.recv().await.unwrap().payload;

        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|r| r.id.value() != 0));
        assert!(published.iter().all(|r| r.id.value() != 3));
    }

    #[tokio::test]
    async fn test_list_assignable_ignores_taken() {
        let roster = roster(5);
        roster.claim(StationId::new(2)).await.unwrap();

        let assignable = roster.list_assignable().await.unwrap();
        assert_eq!(assignable.len(), 3);
        assert!(assignable.iter().any(|r| r.id == StationId::new(2) && r.taken));
        assert!(assignable.iter().any(|r| r.id == StationId::new(1) && !r.taken));
    }

    #[tokio::test]
    async fn test_claim_unknown_station_fails() {
        let roster = roster(3);
        let result = roster.claim(StationId::new(9)).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_on_tiny_rosters() {
        assert!(filter_assignable(&[]).is_empty());
        assert!(filter_assignable(&[AssignmentRecord::new(StationId::new(0))]).is_empty());
    }
}
