//! Relay throughput counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters for the relay's observable behavior.
///
/// All counters are relaxed; they feed diagnostics and tests, never control
/// flow.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Transactions handed to `broadcast`.
    pub transactions_broadcast: AtomicU64,
    /// Blocks handed to `broadcast`.
    pub blocks_broadcast: AtomicU64,
    /// `add_inventory` calls that queued a new item.
    pub inventory_accepted: AtomicU64,
    /// `add_inventory` calls rejected by the recency caches.
    pub inventory_rejected: AtomicU64,
    /// Hashes handed to peers in fetch requests.
    pub fetches_dispatched: AtomicU64,
    /// Hashes handed to peers in inventory announcements.
    pub announcements_sent: AtomicU64,
    /// Pending fetches dropped past the expiry window.
    pub items_expired: AtomicU64,
    /// Requests re-queued after a peer disconnect.
    pub requeued_on_disconnect: AtomicU64,
    /// Payloads dropped by `broadcast` as neither block nor transaction.
    pub unsupported_payloads: AtomicU64,
}

impl RelayMetrics {
    /// Point-in-time copy for assertions and log lines.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            transactions_broadcast: self.transactions_broadcast.load(Ordering::Relaxed),
            blocks_broadcast: self.blocks_broadcast.load(Ordering::Relaxed),
            inventory_accepted: self.inventory_accepted.load(Ordering::Relaxed),
            inventory_rejected: self.inventory_rejected.load(Ordering::Relaxed),
            fetches_dispatched: self.fetches_dispatched.load(Ordering::Relaxed),
            announcements_sent: self.announcements_sent.load(Ordering::Relaxed),
            items_expired: self.items_expired.load(Ordering::Relaxed),
            requeued_on_disconnect: self.requeued_on_disconnect.load(Ordering::Relaxed),
            unsupported_payloads: self.unsupported_payloads.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value copy of [`RelayMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub transactions_broadcast: u64,
    pub blocks_broadcast: u64,
    pub inventory_accepted: u64,
    pub inventory_rejected: u64,
    pub fetches_dispatched: u64,
    pub announcements_sent: u64,
    pub items_expired: u64,
    pub requeued_on_disconnect: u64,
    pub unsupported_payloads: u64,
}
