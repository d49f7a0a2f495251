//! Transfer engine
//!
//! The two resource-movement operations plus the direct stock operations,
//! all against the station ledger, all broadcasting through the bus. The
//! engine holds no state of its own: the ledger is the single source of
//! truth for every call.
//!
//! Mutations run one at a time behind an async gate, so the read-modify-
//! write of one call never interleaves with another touching the same
//! positions.

use crate::{
    error::{Error, Result},
    reconcile::reconcile,
};
use notification_bus::{NotificationBus, TransferNotice};
use serde::{Deserialize, Serialize};
use station_ledger::{Station, StationId, StationLedger, StationUpdate};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Response for the direct queue-set operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockResponse {
    /// Human-readable status
    pub message: String,

    /// Full station snapshot after the write
    pub resources: Vec<Station>,
}

/// Response for the stock adjustment operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Human-readable status
    pub message: String,

    /// The adjusted record, reported under the caller's position
    pub resource: Station,
}

/// Transfer engine over a station ledger and a notification bus
pub struct TransferEngine {
    ledger: StationLedger,
    bus: Arc<NotificationBus>,
    gate: Mutex<()>,
}

impl TransferEngine {
    /// Create new engine
    pub fn new(ledger: StationLedger, bus: Arc<NotificationBus>) -> Self {
        Self {
            ledger,
            bus,
            gate: Mutex::new(()),
        }
    }

    /// Station `position` pulls `qty` units from its predecessor's
    /// pending-sell queue
    ///
    /// Shortfall drains the predecessor to zero and rolls the unmet portion
    /// into this station's `toBuy`; sufficient supply satisfies the request
    /// in full. `qty == 0` changes nothing but still broadcasts the
    /// snapshot. Returns the full snapshot either way.
    pub async fn order(&self, position: StationId, qty: i64) -> Result<Vec<Station>> {
        if qty < 0 {
            return Err(Error::InvalidQuantity(qty));
        }

        let _gate = self.gate.lock().await;

        let prev_id = position.prev().ok_or(Error::NoPredecessor(position))?;
        let station = self.ledger.get(position).await?;
        let prev = self.ledger.get(prev_id).await?;

        if qty == 0 {
            return self.broadcast_snapshot().await;
        }

        let outcome = reconcile(prev.to_sell, qty, station.to_buy);

        self.ledger
            .update_pair(
                (prev_id, StationUpdate::to_sell(outcome.counterpart_remaining)),
                (position, StationUpdate::to_buy(outcome.requester_queue)),
            )
            .await?;

        info!(
            station = %position,
            supplier = %prev_id,
            requested = qty,
            transferred = outcome.transferred,
            "Order reconciled"
        );

        if outcome.transferred > 0 {
            self.bus.publish_bought(vec![TransferNotice {
                position,
                qty: outcome.transferred,
                delivery_time: prev.delivery_time,
            }]);
            self.bus.publish_sold(vec![TransferNotice {
                position: prev_id,
                qty: outcome.transferred,
                delivery_time: prev.delivery_time,
            }]);
        }

        self.broadcast_snapshot().await
    }

    /// Station `position` pushes `qty` units toward its successor's
    /// pending-buy queue
    ///
    /// Mirror of [`order`](Self::order): the successor's demand absorbs
    /// what it can, and unsent surplus rolls into this station's `toSell`.
    pub async fn sell(&self, position: StationId, qty: i64) -> Result<Vec<Station>> {
        if qty < 0 {
            return Err(Error::InvalidQuantity(qty));
        }

        let _gate = self.gate.lock().await;

        let next_id = position.next().ok_or(Error::NoSuccessor(position))?;
        let station = self.ledger.get(position).await?;
        let next = self.ledger.get(next_id).await?;

        if qty == 0 {
            return self.broadcast_snapshot().await;
        }

        let outcome = reconcile(next.to_buy, qty, station.to_sell);

        self.ledger
            .update_pair(
                (next_id, StationUpdate::to_buy(outcome.counterpart_remaining)),
                (position, StationUpdate::to_sell(outcome.requester_queue)),
            )
            .await?;

        info!(
            station = %position,
            consumer = %next_id,
            offered = qty,
            transferred = outcome.transferred,
            "Sell reconciled"
        );

        if outcome.transferred > 0 {
            self.bus.publish_bought(vec![TransferNotice {
                position: next_id,
                qty: outcome.transferred,
                delivery_time: station.delivery_time,
            }]);
            self.bus.publish_sold(vec![TransferNotice {
                position,
                qty: outcome.transferred,
                delivery_time: station.delivery_time,
            }]);
        }

        self.broadcast_snapshot().await
    }

    /// Directly set a station's pending-buy queue, unclamped
    pub async fn add_pending_buy(&self, position: StationId, qty: i64) -> Result<StockResponse> {
        if qty < 0 {
            return Err(Error::InvalidQuantity(qty));
        }

        let _gate = self.gate.lock().await;

        self.ledger
            .update(position, StationUpdate::to_buy(qty))
            .await?;

        let resources = self.broadcast_snapshot().await?;

        Ok(StockResponse {
            message: "Resource added".to_string(),
            resources,
        })
    }

    /// Subtract `qty` from the predecessor's on-hand stock and report the
    /// result under the caller's position
    ///
    /// This is a deliberate cross-position write: the caller consumes from
    /// the station before it. The broadcast snapshot replaces the caller's
    /// slot with the predecessor's updated record, matching the system this
    /// replaces.
    pub async fn adjust_stock(&self, position: StationId, qty: i64) -> Result<StockAdjustment> {
        if qty < 0 {
            return Err(Error::InvalidQuantity(qty));
        }

        let _gate = self.gate.lock().await;

        let prev_id = position.prev().ok_or(Error::NoPredecessor(position))?;
        let prev = self.ledger.get(prev_id).await?;

        let updated = self
            .ledger
            .update(prev_id, StationUpdate::qty(prev.qty - qty))
            .await?;

        info!(
            station = %position,
            supplier = %prev_id,
            qty,
            remaining = updated.qty,
            "Stock adjusted"
        );

        let snapshot = self.ledger.snapshot().await?;
        let broadcast = snapshot
            .into_iter()
            .map(|s| {
                if s.position == position {
                    updated.clone()
                } else {
                    s
                }
            })
            .collect();
        self.bus.publish_available(broadcast);

        let mut resource = updated;
        resource.position = position;
        resource.qty = qty;

        Ok(StockAdjustment {
            message: "Bought resources".to_string(),
            resource,
        })
    }

    /// Full station snapshot (query surface)
    pub async fn resources(&self) -> Result<Vec<Station>> {
        Ok(self.ledger.snapshot().await?)
    }

    /// The ledger this engine operates on
    pub fn ledger(&self) -> &StationLedger {
        &self.ledger
    }

    /// The bus this engine publishes to
    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    async fn broadcast_snapshot(&self) -> Result<Vec<Station>> {
        let snapshot = self.ledger.snapshot().await?;
        self.bus.publish_available(snapshot.clone());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notification_bus::{BusConfig, Subscription};
    use station_ledger::Station;

    struct Harness {
        engine: TransferEngine,
        available: Subscription<Vec<Station>>,
        bought: Subscription<Vec<TransferNotice>>,
        sold: Subscription<Vec<TransferNotice>>,
    }

    /// Three-station chain with the given toSell on station 0
    fn harness(source_to_sell: i64) -> Harness {
        let mut source = Station::new(StationId::new(0), 100, 2);
        source.to_sell = source_to_sell;

        let ledger = StationLedger::with_stations(vec![
            source,
            Station::new(StationId::new(1), 100, 3),
            Station::new(StationId::new(2), 100, 4),
        ]);
        let bus = Arc::new(NotificationBus::new(BusConfig::default()));
        let available = bus.subscribe_available();
        let bought = bus.subscribe_bought();
        let sold = bus.subscribe_sold();

        Harness {
            engine: TransferEngine::new(ledger, bus),
            available,
            bought,
            sold,
        }
    }

    #[tokio::test]
    async fn test_order_sufficient_supply() {
        let mut h = harness(10);

        let snapshot = h.engine.order(StationId::new(1), 4).await.unwrap();
        assert_eq!(snapshot[0].to_sell, 6);
        assert_eq!(snapshot[1].to_buy, 0);

        let bought = h.bought.recv().await.unwrap().payload;
        assert_eq!(bought[0].position, StationId::new(1));
        assert_eq!(bought[0].qty, 4);
        // Delivery time comes from the supplying predecessor
        assert_eq!(bought[0].delivery_time, 2);

        let sold = h.sold.recv().await.unwrap().payload;
        assert_eq!(sold[0].position, StationId::new(0));
        assert_eq!(sold[0].qty, 4);

        let broadcast = h.available.recv().await.unwrap().payload;
        assert_eq!(broadcast, snapshot);
    }

    #[tokio::test]
    async fn test_order_shortfall_rolls_demand() {
        let mut h = harness(3);

        let snapshot = h.engine.order(StationId::new(1), 4).await.unwrap();
        assert_eq!(snapshot[0].to_sell, 0);
        assert_eq!(snapshot[1].to_buy, 1); // 4 - 3 + 0

        let bought = h.bought.recv().await.unwrap().payload;
        assert_eq!(bought[0].qty, 3);
        let sold = h.sold.recv().await.unwrap().payload;
        assert_eq!(sold[0].qty, 3);
    }

    #[tokio::test]
    async fn test_order_empty_supplier_emits_no_transfer_events() {
        let mut h = harness(0);

        let snapshot = h.engine.order(StationId::new(1), 4).await.unwrap();
        // Fields still move: unmet demand accumulates
        assert_eq!(snapshot[1].to_buy, 4);

        // Snapshot event fired, transfer events did not
        h.available.recv().await.unwrap();
        assert!(futures::poll!(Box::pin(h.bought.recv())).is_pending());
        assert!(futures::poll!(Box::pin(h.sold.recv())).is_pending());
    }

    #[tokio::test]
    async fn test_order_zero_changes_nothing_but_broadcasts() {
        let mut h = harness(10);

        let before = h.engine.resources().await.unwrap();
        let after = h.engine.order(StationId::new(1), 0).await.unwrap();
        assert_eq!(before, after);

        // Snapshot event still fires
        let broadcast = h.available.recv().await.unwrap().payload;
        assert_eq!(broadcast, after);
        assert!(futures::poll!(Box::pin(h.bought.recv())).is_pending());
    }

    #[tokio::test]
    async fn test_order_negative_rejected_before_entry() {
        let h = harness(10);
        let result = h.engine.order(StationId::new(1), -4).await;
        assert!(matches!(result, Err(Error::InvalidQuantity(-4))));

        // No snapshot event either: the call never entered the engine
        let snapshot = h.engine.resources().await.unwrap();
        assert_eq!(snapshot[0].to_sell, 10);
    }

    #[tokio::test]
    async fn test_order_from_source_fails() {
        let h = harness(10);
        let result = h.engine.order(StationId::new(0), 4).await;
        assert!(matches!(result, Err(Error::NoPredecessor(_))));
    }

    #[tokio::test]
    async fn test_sell_sufficient_demand() {
        let mut h = harness(0);
        h.engine
            .ledger()
            .update(StationId::new(2), StationUpdate::to_buy(10))
            .await
            .unwrap();

        let snapshot = h.engine.sell(StationId::new(1), 4).await.unwrap();
        assert_eq!(snapshot[2].to_buy, 6);
        assert_eq!(snapshot[1].to_sell, 0);

        let bought = h.bought.recv().await.unwrap().payload;
        assert_eq!(bought[0].position, StationId::new(2));
        assert_eq!(bought[0].qty, 4);
        // Delivery time comes from the selling station itself
        assert_eq!(bought[0].delivery_time, 3);

        let sold = h.sold.recv().await.unwrap().payload;
        assert_eq!(sold[0].position, StationId::new(1));
    }

    #[tokio::test]
    async fn test_sell_surplus_rolls_into_to_sell() {
        let mut h = harness(0);
        h.engine
            .ledger()
            .update(StationId::new(2), StationUpdate::to_buy(3))
            .await
            .unwrap();

        let snapshot = h.engine.sell(StationId::new(1), 4).await.unwrap();
        assert_eq!(snapshot[2].to_buy, 0);
        assert_eq!(snapshot[1].to_sell, 1); // 4 - 3 + 0

        let bought = h.bought.recv().await.unwrap().payload;
        assert_eq!(bought[0].qty, 3);
    }

    // Pinned quirk: a fully-absorbed sell resets the seller's queue to
    // zero even when it was nonzero before.
    #[tokio::test]
    async fn test_sell_sufficient_branch_resets_existing_queue() {
        let h = harness(0);
        h.engine
            .ledger()
            .update(StationId::new(1), StationUpdate::to_sell(9))
            .await
            .unwrap();
        h.engine
            .ledger()
            .update(StationId::new(2), StationUpdate::to_buy(10))
            .await
            .unwrap();

        let snapshot = h.engine.sell(StationId::new(1), 4).await.unwrap();
        assert_eq!(snapshot[1].to_sell, 0);
        assert_eq!(snapshot[2].to_buy, 6);
    }

    #[tokio::test]
    async fn test_sell_from_sink_fails() {
        let h = harness(0);
        let result = h.engine.sell(StationId::new(2), 4).await;
        assert!(matches!(
            result,
            Err(Error::Ledger(station_ledger::Error::StationNotFound(_)))
        ));

        // No partial write
        let snapshot = h.engine.resources().await.unwrap();
        assert_eq!(snapshot[2].to_buy, 0);
    }

    #[tokio::test]
    async fn test_add_pending_buy_sets_queue_directly() {
        let mut h = harness(0);

        let response = h.engine.add_pending_buy(StationId::new(1), 12).await.unwrap();
        assert_eq!(response.message, "Resource added");
        assert_eq!(response.resources[1].to_buy, 12);

        let broadcast = h.available.recv().await.unwrap().payload;
        assert_eq!(broadcast[1].to_buy, 12);
    }

    #[tokio::test]
    async fn test_adjust_stock_writes_predecessor() {
        let mut h = harness(0);

        let response = h.engine.adjust_stock(StationId::new(1), 30).await.unwrap();
        assert_eq!(response.message, "Bought resources");

        // Reported under the caller's position with the requested qty
        assert_eq!(response.resource.position, StationId::new(1));
        assert_eq!(response.resource.qty, 30);

        // The actual write hit the predecessor
        let prev = h.engine.ledger().get(StationId::new(0)).await.unwrap();
        assert_eq!(prev.qty, 70);

        // Broadcast quirk: the caller's slot carries the predecessor's
        // updated record
        let broadcast = h.available.recv().await.unwrap().payload;
        assert_eq!(broadcast[1].position, StationId::new(0));
        assert_eq!(broadcast[1].qty, 70);
        assert_eq!(broadcast[0].qty, 70);
    }

    #[tokio::test]
    async fn test_adjust_stock_may_drive_stock_negative() {
        let h = harness(0);
        h.engine.adjust_stock(StationId::new(1), 150).await.unwrap();
        let prev = h.engine.ledger().get(StationId::new(0)).await.unwrap();
        assert_eq!(prev.qty, -50);
    }

    #[tokio::test]
    async fn test_resources_returns_position_order() {
        let h = harness(5);
        let snapshot = h.engine.resources().await.unwrap();
        assert!(snapshot.windows(2).all(|w| w[0].position < w[1].position));
    }
}
