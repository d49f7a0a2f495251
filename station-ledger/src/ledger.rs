//! Main ledger orchestration layer
//!
//! Ties together storage, actor, and metrics into a high-level API for
//! station state. The handle is cheap to clone; every clone talks to the
//! same single-writer actor.
//!
//! # Example
//!
//! ```no_run
//! use station_ledger::{Config, StationLedger};
//!
//! #[tokio::main]
//! async fn main() -> station_ledger::Result<()> {
//!     let config = Config::default();
//!     let ledger = StationLedger::open(config)?;
//!
//!     let stations = ledger.snapshot().await?;
//!     println!("{} stations", stations.len());
//!
//!     Ok(())
//! }
//! ```

use crate::{
    actor::{spawn_ledger_actor, LedgerHandle},
    metrics::Metrics,
    storage::Storage,
    types::{AssignmentRecord, Station, StationId, StationUpdate},
    Config, Result,
};

/// Main station ledger interface
#[derive(Clone)]
pub struct StationLedger {
    /// Actor handle for all operations
    handle: LedgerHandle,

    /// Metrics collector
    metrics: Metrics,
}

impl StationLedger {
    /// Open ledger with configuration
    pub fn open(config: Config) -> Result<Self> {
        let storage = Storage::open(&config)?;
        Ok(Self::from_storage(storage))
    }

    /// Build an in-memory ledger from explicit station records
    ///
    /// One assignment record is seeded per station, all unclaimed.
    pub fn with_stations(stations: Vec<Station>) -> Self {
        let assignments = stations
            .iter()
            .map(|s| AssignmentRecord::new(s.position))
            .collect();
        Self::from_storage(Storage::in_memory(stations, assignments))
    }

    fn from_storage(storage: Storage) -> Self {
        let metrics = Metrics::default();
        let handle = spawn_ledger_actor(storage, metrics.clone());
        Self { handle, metrics }
    }

    /// Get a station record by position
    pub async fn get(&self, position: StationId) -> Result<Station> {
        self.handle.get_station(position).await
    }

    /// Apply a partial update to one station and return the updated record
    pub async fn update(&self, position: StationId, update: StationUpdate) -> Result<Station> {
        self.handle.update_station(position, update).await
    }

    /// Apply two partial updates as a single unit
    ///
    /// Used by transfer operations so both sides of an exchange land
    /// together or not at all.
    pub async fn update_pair(
        &self,
        first: (StationId, StationUpdate),
        second: (StationId, StationUpdate),
    ) -> Result<(Station, Station)> {
        self.handle.update_pair(first, second).await
    }

    /// All station records in position order
    pub async fn snapshot(&self) -> Result<Vec<Station>> {
        self.handle.snapshot().await
    }

    /// Get an assignment record by station id
    pub async fn assignment(&self, id: StationId) -> Result<AssignmentRecord> {
        self.handle.get_assignment(id).await
    }

    /// Atomically flip the `taken` flag; false when already taken
    pub async fn claim(&self, id: StationId) -> Result<bool> {
        self.handle.claim(id).await
    }

    /// All assignment records in id order
    pub async fn assignments(&self) -> Result<Vec<AssignmentRecord>> {
        self.handle.assignments().await
    }

    /// Metrics collector for this ledger
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Shutdown the ledger actor
    pub async fn shutdown(&self) -> Result<()> {
        self.handle.shutdown().await
    }
}
