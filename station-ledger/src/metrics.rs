//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `ledger_station_updates_total` - Total station record updates applied
//! - `ledger_snapshot_reads_total` - Total full-snapshot reads
//! - `ledger_claims_total` - Total successful station claims

use prometheus::{IntCounter, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Total station record updates applied
    pub station_updates_total: IntCounter,

    /// Total full-snapshot reads
    pub snapshot_reads_total: IntCounter,

    /// Total successful claims
    pub claims_total: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let station_updates_total = IntCounter::new(
            "ledger_station_updates_total",
            "Total station record updates applied",
        )?;
        registry.register(Box::new(station_updates_total.clone()))?;

        let snapshot_reads_total = IntCounter::new(
            "ledger_snapshot_reads_total",
            "Total full-snapshot reads",
        )?;
        registry.register(Box::new(snapshot_reads_total.clone()))?;

        let claims_total =
            IntCounter::new("ledger_claims_total", "Total successful station claims")?;
        registry.register(Box::new(claims_total.clone()))?;

        Ok(Self {
            station_updates_total,
            snapshot_reads_total,
            claims_total,
            registry,
        })
    }

    /// Record a station update
    pub fn record_update(&self) {
        self.station_updates_total.inc();
    }

    /// Record a snapshot read
    pub fn record_snapshot_read(&self) {
        self.snapshot_reads_total.inc();
    }

    /// Record a successful claim
    pub fn record_claim(&self) {
        self.claims_total.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
