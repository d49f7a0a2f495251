//! Prometheus metrics for the notification bus

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

lazy_static! {
    /// Total notifications published, by topic subject
    pub static ref NOTIFICATIONS_PUBLISHED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bus_notifications_published_total",
        "Total notifications published",
        &["topic"]
    )
    .expect("Failed to register bus_notifications_published_total");

    /// Current subscriber count, by topic subject
    pub static ref NOTIFICATION_SUBSCRIBERS: IntGaugeVec = register_int_gauge_vec!(
        "bus_notification_subscribers",
        "Current subscriber count",
        &["topic"]
    )
    .expect("Failed to register bus_notification_subscribers");
}
