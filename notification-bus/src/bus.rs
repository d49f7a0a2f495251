//! Topic-based broadcast bus
//!
//! One broadcast channel per fixed topic. Publishing is synchronous and
//! fire-and-forget: a slow subscriber lags and loses, a missing subscriber
//! costs nothing, and nothing is replayed to late subscribers.

use crate::{
    error::{Error, Result},
    metrics::{NOTIFICATIONS_PUBLISHED_TOTAL, NOTIFICATION_SUBSCRIBERS},
    notification::{Notification, TransferNotice},
    topic::Topic,
};
use station_ledger::{AssignmentRecord, Station};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

/// Bus configuration
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Per-subscriber queue capacity before lagging
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Notification bus with one typed channel per topic
pub struct NotificationBus {
    available: broadcast::Sender<Notification<Vec<Station>>>,
    bought: broadcast::Sender<Notification<Vec<TransferNotice>>>,
    sold: broadcast::Sender<Notification<Vec<TransferNotice>>>,
    users: broadcast::Sender<Notification<Vec<AssignmentRecord>>>,
}

impl NotificationBus {
    /// Create new bus
    pub fn new(config: BusConfig) -> Self {
        let (available, _) = broadcast::channel(config.capacity);
        let (bought, _) = broadcast::channel(config.capacity);
        let (sold, _) = broadcast::channel(config.capacity);
        let (users, _) = broadcast::channel(config.capacity);

        Self {
            available,
            bought,
            sold,
            users,
        }
    }

    /// Publish the full station snapshot
    pub fn publish_available(&self, snapshot: Vec<Station>) {
        Self::publish(&self.available, Topic::AvailableResourcesChanged, snapshot);
    }

    /// Publish received-quantity notices
    pub fn publish_bought(&self, notices: Vec<TransferNotice>) {
        Self::publish(&self.bought, Topic::BoughtResource, notices);
    }

    /// Publish sent-quantity notices
    pub fn publish_sold(&self, notices: Vec<TransferNotice>) {
        Self::publish(&self.sold, Topic::SoldResource, notices);
    }

    /// Publish the filtered assignment snapshot
    pub fn publish_users_changed(&self, assignments: Vec<AssignmentRecord>) {
        Self::publish(&self.users, Topic::UsersChanged, assignments);
    }

    fn publish<T: Clone>(sender: &broadcast::Sender<Notification<T>>, topic: Topic, payload: T) {
        NOTIFICATIONS_PUBLISHED_TOTAL
            .with_label_values(&[topic.subject()])
            .inc();

        // A send with zero subscribers is not an error
        if sender.send(Notification::new(topic, payload)).is_err() {
            debug!(topic = topic.subject(), "No subscribers for notification");
        }
    }

    /// Subscribe to the station snapshot topic
    pub fn subscribe_available(&self) -> Subscription<Vec<Station>> {
        Subscription::new(Topic::AvailableResourcesChanged, self.available.subscribe())
    }

    /// Subscribe to the received-quantity topic
    pub fn subscribe_bought(&self) -> Subscription<Vec<TransferNotice>> {
        Subscription::new(Topic::BoughtResource, self.bought.subscribe())
    }

    /// Subscribe to the sent-quantity topic
    pub fn subscribe_sold(&self) -> Subscription<Vec<TransferNotice>> {
        Subscription::new(Topic::SoldResource, self.sold.subscribe())
    }

    /// Subscribe to the assignment topic
    pub fn subscribe_users_changed(&self) -> Subscription<Vec<AssignmentRecord>> {
        Subscription::new(Topic::UsersChanged, self.users.subscribe())
    }

    /// Current subscriber count for a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        match topic {
            Topic::AvailableResourcesChanged => self.available.receiver_count(),
            Topic::BoughtResource => self.bought.receiver_count(),
            Topic::SoldResource => self.sold.receiver_count(),
            Topic::UsersChanged => self.users.receiver_count(),
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

/// Handle to one subscriber queue on one topic
///
/// Dropping the subscription cancels it.
pub struct Subscription<T> {
    topic: Topic,
    // Option so `into_stream` can take the receiver; `Drop` forbids moving
    // a field out otherwise. Always `Some` until consumed.
    inner: Option<broadcast::Receiver<Notification<T>>>,
}

impl<T: Clone> Subscription<T> {
    fn new(topic: Topic, inner: broadcast::Receiver<Notification<T>>) -> Self {
        NOTIFICATION_SUBSCRIBERS
            .with_label_values(&[topic.subject()])
            .inc();
        Self {
            topic,
            inner: Some(inner),
        }
    }

    /// Receive the next notification
    pub async fn recv(&mut self) -> Result<Notification<T>> {
        let inner = match self.inner.as_mut() {
            Some(inner) => inner,
            None => return Err(Error::Closed),
        };
        match inner.recv().await {
            Ok(notification) => Ok(notification),
            Err(broadcast::error::RecvError::Lagged(n)) => Err(Error::Lagged(n)),
            Err(broadcast::error::RecvError::Closed) => Err(Error::Closed),
        }
    }

    /// Topic this subscription is attached to
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

impl<T: Clone + Send + 'static> Subscription<T> {
    /// Adapt into a `Stream` of notifications
    ///
    /// The gauge decrement in `Drop` still runs here; the stream keeps the
    /// underlying receiver queue alive.
    pub fn into_stream(mut self) -> BroadcastStream<Notification<T>> {
        let inner = self
            .inner
            .take()
            .expect("receiver is present until the subscription is consumed");
        BroadcastStream::new(inner)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        NOTIFICATION_SUBSCRIBERS
            .with_label_values(&[self.topic.subject()])
            .dec();
    }
}
