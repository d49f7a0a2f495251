//! Actor-based concurrency for the ledger
//!
//! A single actor task owns the document store, so every message is atomic
//! relative to every other: a pair update or a claim can never interleave
//! with another write touching the same position.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          LedgerHandle (Clone)                 │
//! │     Sends messages to actor mailbox          │
//! └─────────────────────┬────────────────────────┘
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │         LedgerActor (Single Task)             │
//! │         owns Storage exclusively              │
//! └──────────────────────────────────────────────┘
//! ```

use crate::{
    error::{Error, Result},
    metrics::Metrics,
    storage::Storage,
    types::{AssignmentRecord, Station, StationId, StationUpdate},
};
use tokio::sync::{mpsc, oneshot};

/// Message sent to the ledger actor
pub enum LedgerMessage {
    /// Get a station record
    GetStation {
        /// Position to read
        position: StationId,
        /// Response channel
        response: oneshot::Sender<Result<Station>>,
    },

    /// Apply a partial update to one station
    UpdateStation {
        /// Position to update
        position: StationId,
        /// Fields to set
        update: StationUpdate,
        /// Response channel
        response: oneshot::Sender<Result<Station>>,
    },

    /// Apply two partial updates as a single unit
    UpdatePair {
        /// First position and its update
        first: (StationId, StationUpdate),
        /// Second position and its update
        second: (StationId, StationUpdate),
        /// Response channel
        response: oneshot::Sender<Result<(Station, Station)>>,
    },

    /// Get all station records in position order
    Snapshot {
        /// Response channel
        response: oneshot::Sender<Vec<Station>>,
    },

    /// Get an assignment record
    GetAssignment {
        /// Assignment id
        id: StationId,
        /// Response channel
        response: oneshot::Sender<Result<AssignmentRecord>>,
    },

    /// Atomically flip the `taken` flag
    Claim {
        /// Assignment id
        id: StationId,
        /// Response channel
        response: oneshot::Sender<Result<bool>>,
    },

    /// Get all assignment records in id order
    Assignments {
        /// Response channel
        response: oneshot::Sender<Vec<AssignmentRecord>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes ledger messages
pub struct LedgerActor {
    storage: Storage,
    mailbox: mpsc::Receiver<LedgerMessage>,
    metrics: Metrics,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(storage: Storage, mailbox: mpsc::Receiver<LedgerMessage>, metrics: Metrics) -> Self {
        Self {
            storage,
            mailbox,
            metrics,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::Shutdown => break,
                _ => self.handle_message(msg),
            }
        }
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::GetStation { position, response } => {
                let _ = response.send(self.storage.station(position));
            }

            LedgerMessage::UpdateStation {
                position,
                update,
                response,
            } => {
                let result = self.storage.update_station(position, update);
                if result.is_ok() {
                    self.metrics.record_update();
                }
                let _ = response.send(result);
            }

            LedgerMessage::UpdatePair {
                first,
                second,
                response,
            } => {
                let result = self.storage.update_pair(first, second);
                if result.is_ok() {
                    self.metrics.record_update();
                    self.metrics.record_update();
                }
                let _ = response.send(result);
            }

            LedgerMessage::Snapshot { response } => {
                self.metrics.record_snapshot_read();
                let _ = response.send(self.storage.snapshot());
            }

            LedgerMessage::GetAssignment { id, response } => {
                let _ = response.send(self.storage.assignment(id));
            }

            LedgerMessage::Claim { id, response } => {
                let result = self.storage.claim(id);
                if let Ok(true) = result {
                    self.metrics.record_claim();
                }
                let _ = response.send(result);
            }

            LedgerMessage::Assignments { response } => {
                let _ = response.send(self.storage.assignments());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> LedgerMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(make(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Get a station record
    pub async fn get_station(&self, position: StationId) -> Result<Station> {
        self.request(|response| LedgerMessage::GetStation { position, response })
            .await?
    }

    /// Apply a partial update to one station
    pub async fn update_station(
        &self,
        position: StationId,
        update: StationUpdate,
    ) -> Result<Station> {
        self.request(|response| LedgerMessage::UpdateStation {
            position,
            update,
            response,
        })
        .await?
    }

    /// Apply two partial updates as a single unit
    pub async fn update_pair(
        &self,
        first: (StationId, StationUpdate),
        second: (StationId, StationUpdate),
    ) -> Result<(Station, Station)> {
        self.request(|response| LedgerMessage::UpdatePair {
            first,
            second,
            response,
        })
        .await?
    }

    /// Get all station records in position order
    pub async fn snapshot(&self) -> Result<Vec<Station>> {
        self.request(|response| LedgerMessage::Snapshot { response })
            .await
    }

    /// Get an assignment record
    pub async fn get_assignment(&self, id: StationId) -> Result<AssignmentRecord> {
        self.request(|response| LedgerMessage::GetAssignment { id, response })
            .await?
    }

    /// Atomically flip the `taken` flag; false when already taken
    pub async fn claim(&self, id: StationId) -> Result<bool> {
        self.request(|response| LedgerMessage::Claim { id, response })
            .await?
    }

    /// Get all assignment records in id order
    pub async fn assignments(&self) -> Result<Vec<AssignmentRecord>> {
        self.request(|response| LedgerMessage::Assignments { response })
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(storage: Storage, metrics: Metrics) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(1000); // Bounded channel for backpressure
    let actor = LedgerActor::new(storage, rx, metrics);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}
