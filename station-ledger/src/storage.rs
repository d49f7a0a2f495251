//! Document store for station and assignment records
//!
//! The store is a single JSON document with two flat ordered collections:
//!
//! - `resources` - station records, keyed by position
//! - `users` - assignment records, keyed by id
//!
//! The actor owns the only `Storage` instance, so mutation methods take
//! `&mut self` without any internal locking.

use crate::{
    config::Config,
    error::{Error, Result},
    types::{AssignmentRecord, Station, StationId, StationUpdate},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// On-disk document layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    /// Station records in position order
    resources: Vec<Station>,

    /// Assignment records in id order
    users: Vec<AssignmentRecord>,
}

/// Station document store
pub struct Storage {
    document: Document,
    data_path: Option<PathBuf>,
}

impl Storage {
    /// Open the store, loading the document file or seeding a fresh chain
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(path) = &config.data_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let document: Document = serde_json::from_str(&content)?;

                tracing::info!(
                    stations = document.resources.len(),
                    path = %path.display(),
                    "Loaded station document"
                );

                return Ok(Self {
                    document,
                    data_path: config.data_path.clone(),
                });
            }
        }

        let storage = Self {
            document: seed_chain(config),
            data_path: config.data_path.clone(),
        };

        tracing::info!(
            stations = storage.document.resources.len(),
            "Seeded fresh station chain"
        );

        Ok(storage)
    }

    /// Create an in-memory store from explicit records (tests, embedding)
    pub fn in_memory(stations: Vec<Station>, assignments: Vec<AssignmentRecord>) -> Self {
        Self {
            document: Document {
                resources: stations,
                users: assignments,
            },
            data_path: None,
        }
    }

    /// Get a station record by position
    pub fn station(&self, position: StationId) -> Result<Station> {
        self.document
            .resources
            .iter()
            .find(|s| s.position == position)
            .cloned()
            .ok_or(Error::StationNotFound(position))
    }

    /// Apply a partial update to one station and return the updated record
    pub fn update_station(
        &mut self,
        position: StationId,
        update: StationUpdate,
    ) -> Result<Station> {
        validate_update(position, &update)?;
        let updated = self.apply_update(position, update)?;
        self.persist()?;
        Ok(updated)
    }

    /// Apply two partial updates as a single unit
    ///
    /// Both positions are validated before either record is written, so a
    /// missing station or a queue violation leaves the store untouched.
    pub fn update_pair(
        &mut self,
        first: (StationId, StationUpdate),
        second: (StationId, StationUpdate),
    ) -> Result<(Station, Station)> {
        self.station(first.0)?;
        self.station(second.0)?;
        validate_update(first.0, &first.1)?;
        validate_update(second.0, &second.1)?;

        let a = self.apply_update(first.0, first.1)?;
        let b = self.apply_update(second.0, second.1)?;
        self.persist()?;
        Ok((a, b))
    }

    /// All station records in position order
    pub fn snapshot(&self) -> Vec<Station> {
        self.document.resources.clone()
    }

    /// Get an assignment record by id
    pub fn assignment(&self, id: StationId) -> Result<AssignmentRecord> {
        self.document
            .users
            .iter()
            .find(|a| a.id == id)
            .copied()
            .ok_or(Error::AssignmentNotFound(id))
    }

    /// Atomically flip the `taken` flag for a station
    ///
    /// Returns false without writing when the station is already taken.
    pub fn claim(&mut self, id: StationId) -> Result<bool> {
        let record = self
            .document
            .users
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(Error::AssignmentNotFound(id))?;

        if record.taken {
            return Ok(false);
        }

        record.taken = true;
        self.persist()?;
        Ok(true)
    }

    /// All assignment records in id order
    pub fn assignments(&self) -> Vec<AssignmentRecord> {
        self.document.users.clone()
    }

    /// Number of station records
    pub fn station_count(&self) -> usize {
        self.document.resources.len()
    }

    fn apply_update(&mut self, position: StationId, update: StationUpdate) -> Result<Station> {
        let station = self
            .document
            .resources
            .iter_mut()
            .find(|s| s.position == position)
            .ok_or(Error::StationNotFound(position))?;

        if let Some(to_buy) = update.to_buy {
            station.to_buy = to_buy;
        }
        if let Some(to_sell) = update.to_sell {
            station.to_sell = to_sell;
        }
        if let Some(qty) = update.qty {
            station.qty = qty;
        }

        Ok(station.clone())
    }

    /// Write the document file, if one is configured
    fn persist(&self) -> Result<()> {
        if let Some(path) = &self.data_path {
            let content = serde_json::to_string_pretty(&self.document)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }
}

/// Reject updates that would write a negative queue value
fn validate_update(position: StationId, update: &StationUpdate) -> Result<()> {
    if let Some(to_buy) = update.to_buy {
        if to_buy < 0 {
            return Err(Error::NegativeQueue {
                position,
                field: "toBuy",
                value: to_buy,
            });
        }
    }
    if let Some(to_sell) = update.to_sell {
        if to_sell < 0 {
            return Err(Error::NegativeQueue {
                position,
                field: "toSell",
                value: to_sell,
            });
        }
    }
    Ok(())
}

/// Build a fresh document from chain parameters
fn seed_chain(config: &Config) -> Document {
    let mut resources = Vec::with_capacity(config.chain.length as usize);
    let mut users = Vec::with_capacity(config.chain.length as usize);

    for position in 0..config.chain.length {
        let id = StationId::new(position);
        let mut station = Station::new(id, config.chain.initial_qty, config.chain.delivery_time);
        station.to_sell = config.chain.initial_to_sell;
        resources.push(station);
        users.push(AssignmentRecord::new(id));
    }

    Document { resources, users }
}
