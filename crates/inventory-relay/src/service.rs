//! Inventory advertiser service.
//!
//! Orchestrates the pending-fetch and pending-spread queues, the two recency
//! caches, and the periodic fetch/spread loops.

use std::collections::HashMap;
use std::mem;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use parking_lot::Mutex;
use shared_types::GossipPayload;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::batch::OutboundBatch;
use crate::config::{LoopCadence, RelayConfig};
use crate::domain::{Item, RecencyCache};
use crate::error::{RelayError, Result};
use crate::metrics::RelayMetrics;
use crate::ports::{AdvertiserApi, PeerRegistry, RelayPeer};

/// The advertisement/fetch engine.
///
/// ## Concurrency contract
///
/// Each shared structure has a declared class:
///
/// - `pending_fetch`: safe concurrent map; entries are independent.
/// - `pending_spread`: mutex-guarded. `broadcast`'s insert and the spread
///   cycle's snapshot-and-clear compound operation take the same lock.
/// - `fetch_cache` / `message_cache`: internally locked recency caches.
/// - `admission`: serializes `add_inventory`'s check across both caches so
///   two callers racing on the same item never both queue it.
///
/// Thread-safe behind `Arc`. [`start`] spawns the two loops; [`shutdown`]
/// aborts them without waiting for an in-flight cycle.
///
/// [`start`]: InventoryAdvertiser::start
/// [`shutdown`]: InventoryAdvertiser::shutdown
pub struct InventoryAdvertiser<R: PeerRegistry> {
    config: RelayConfig,
    registry: Arc<R>,
    /// Items we know exist somewhere but have not yet requested anywhere.
    pending_fetch: DashMap<Item, Instant>,
    /// Items with payload in hand, awaiting announcement fan-out.
    pending_spread: Mutex<HashMap<Item, Instant>>,
    /// "Fetch already initiated" dedup.
    fetch_cache: RecencyCache<()>,
    /// Recently held payloads, for replay and inbound dedup.
    message_cache: RecencyCache<GossipPayload>,
    admission: Mutex<()>,
    metrics: Arc<RelayMetrics>,
    loops: Mutex<Vec<JoinHandle<()>>>,
}

impl<R: PeerRegistry + 'static> InventoryAdvertiser<R> {
    pub fn new(config: RelayConfig, registry: Arc<R>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pending_fetch: DashMap::new(),
            pending_spread: Mutex::new(HashMap::new()),
            fetch_cache: RecencyCache::new(config.fetch_cache_capacity, config.fetch_cache_ttl),
            message_cache: RecencyCache::new(
                config.message_cache_capacity,
                config.message_cache_ttl,
            ),
            admission: Mutex::new(()),
            metrics: Arc::new(RelayMetrics::default()),
            loops: Mutex::new(Vec::new()),
            config,
            registry,
        })
    }

    /// Spawn the spread and fetch loops. A second call while the loops are
    /// running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut loops = self.loops.lock();
        if !loops.is_empty() {
            warn!("advertiser loops already running");
            return;
        }
        loops.push(Self::spawn_loop(
            "spread",
            self.config.spread_loop,
            Arc::clone(self),
            |advertiser| advertiser.run_spread_cycle(),
        ));
        loops.push(Self::spawn_loop(
            "fetch",
            self.config.fetch_loop,
            Arc::clone(self),
            |advertiser| advertiser.run_fetch_cycle(),
        ));
        info!("inventory advertiser started");
    }

    /// Stop both loops without waiting for an in-flight cycle. Items left in
    /// the pending sets are abandoned. Safe to call more than once.
    pub fn shutdown(&self) {
        let mut loops = self.loops.lock();
        if loops.is_empty() {
            return;
        }
        for handle in loops.drain(..) {
            handle.abort();
        }
        info!("inventory advertiser closed");
    }

    fn spawn_loop<F>(
        name: &'static str,
        cadence: LoopCadence,
        advertiser: Arc<Self>,
        cycle: F,
    ) -> JoinHandle<()>
    where
        F: Fn(&InventoryAdvertiser<R>) -> Result<()> + Send + 'static,
    {
        tokio::spawn(async move {
            let first = tokio::time::Instant::now() + cadence.initial_delay;
            let mut ticker = tokio::time::interval_at(first, cadence.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Failure boundary: a bad cycle never kills the loop.
                if let Err(err) = cycle(&advertiser) {
                    error!(loop_name = name, %err, "cycle failed");
                }
            }
        })
    }

    /// One pass of the fetch loop: expire stale pending items, assign the
    /// rest to the least-loaded eligible peer that holds them, dispatch.
    ///
    /// Normally driven by the background loop; callable directly for
    /// deterministic scheduling.
    pub fn run_fetch_cycle(&self) -> Result<()> {
        let peers: Vec<Arc<dyn RelayPeer>> = self
            .registry
            .active_peers()
            .into_iter()
            .filter(|peer| {
                peer.is_idle() && !peer.is_syncing_from_peer() && !peer.is_syncing_to_peer()
            })
            .collect();

        if self.pending_fetch.is_empty() || peers.is_empty() {
            return Ok(());
        }

        let now = Instant::now();
        let expiry = self.config.fetch_expiry();
        let mut batch = OutboundBatch::new();

        let pending: Vec<(Item, Instant)> = self
            .pending_fetch
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();

        for (item, first_seen) in pending {
            if now.duration_since(first_seen) >= expiry {
                self.pending_fetch.remove(&item);
                self.metrics.items_expired.fetch_add(1, Ordering::Relaxed);
                info!(item = ?item, "pending fetch expired before any peer could serve it");
                continue;
            }

            let chosen = peers
                .iter()
                .filter(|peer| {
                    peer.knows_item(&item)
                        && batch.queued_for(&peer.node_id()) < self.config.max_fetch_per_peer
                })
                .min_by_key(|peer| batch.queued_for(&peer.node_id()));

            if let Some(peer) = chosen {
                peer.record_request(item);
                self.pending_fetch.remove(&item);
                batch.add(item, peer);
            }
        }

        let sent = batch.dispatch_fetch()?;
        if sent > 0 {
            self.metrics
                .fetches_dispatched
                .fetch_add(sent as u64, Ordering::Relaxed);
            debug!(hashes = sent, "dispatched fetch requests");
        }
        Ok(())
    }

    /// One pass of the spread loop: snapshot-and-clear the pending-spread
    /// set, announce every item to every eligible peer that lacks it.
    ///
    /// Normally driven by the background loop; callable directly for
    /// deterministic scheduling.
    pub fn run_spread_cycle(&self) -> Result<()> {
        if self.pending_spread.lock().is_empty() {
            return Ok(());
        }

        // O(1) lock hold: swap the whole map out, then fan out lock-free.
        let snapshot = {
            let mut pending = self.pending_spread.lock();
            mem::take(&mut *pending)
        };

        let mut batch = OutboundBatch::new();
        for peer in self.registry.active_peers() {
            if peer.is_syncing_from_peer() || peer.is_syncing_to_peer() {
                continue;
            }
            for item in snapshot.keys() {
                if !peer.knows_item(item) && !peer.was_announced(item) {
                    peer.record_announcement(*item);
                    batch.add(*item, &peer);
                }
            }
        }

        let sent = batch.dispatch_inventory()?;
        if sent > 0 {
            self.metrics
                .announcements_sent
                .fetch_add(sent as u64, Ordering::Relaxed);
            debug!(hashes = sent, "announced inventory");
        }
        Ok(())
    }

    /// Items currently queued for fetching.
    pub fn pending_fetch_len(&self) -> usize {
        self.pending_fetch.len()
    }

    /// Items currently queued for spreading.
    pub fn pending_spread_len(&self) -> usize {
        self.pending_spread.lock().len()
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

impl<R: PeerRegistry + 'static> AdvertiserApi for InventoryAdvertiser<R> {
    fn add_inventory(&self, item: Item) -> bool {
        // Exclusive across callers: the check spans both caches and must not
        // interleave with another admission of the same item.
        let _admission = self.admission.lock();
        if self.fetch_cache.contains(&item) || self.message_cache.contains(&item) {
            self.metrics.inventory_rejected.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.fetch_cache.insert(item, ());
        self.pending_fetch.insert(item, Instant::now());
        self.metrics.inventory_accepted.fetch_add(1, Ordering::Relaxed);
        debug!(item = ?item, "queued remote inventory for fetch");
        true
    }

    fn cached_message(&self, item: &Item) -> Option<GossipPayload> {
        self.message_cache.get(item)
    }

    fn broadcast(&self, payload: GossipPayload) {
        let item = match &payload {
            GossipPayload::Block(block) => {
                info!(height = block.header.height, "queueing block for spread");
                // The block supersedes standalone gossip for the
                // transactions it carries.
                {
                    let mut pending = self.pending_spread.lock();
                    for tx in &block.transactions {
                        pending.remove(&Item::transaction(tx.tx_hash));
                    }
                }
                self.metrics.blocks_broadcast.fetch_add(1, Ordering::Relaxed);
                Item::block(block.block_id())
            }
            GossipPayload::Transaction(tx) => {
                self.metrics
                    .transactions_broadcast
                    .fetch_add(1, Ordering::Relaxed);
                Item::transaction(tx.tx_hash)
            }
            other => {
                self.metrics
                    .unsupported_payloads
                    .fetch_add(1, Ordering::Relaxed);
                let err = RelayError::UnsupportedPayload {
                    kind: other.kind_name(),
                };
                error!(%err, "dropping broadcast payload");
                return;
            }
        };

        self.message_cache.insert(item, payload);
        self.pending_spread.lock().insert(item, Instant::now());
    }

    fn on_peer_disconnect(&self, peer: &dyn RelayPeer) {
        let outstanding = peer.outstanding_requests();
        if outstanding.is_empty() {
            return;
        }

        let others: Vec<Arc<dyn RelayPeer>> = self
            .registry
            .active_peers()
            .into_iter()
            .filter(|other| other.node_id() != peer.node_id())
            .collect();

        for item in outstanding {
            if others.iter().any(|other| other.knows_item(&item)) {
                self.pending_fetch.insert(item, Instant::now());
                self.metrics
                    .requeued_on_disconnect
                    .fetch_add(1, Ordering::Relaxed);
                debug!(item = ?item, "re-queued in-flight request from lost peer");
            }
        }
    }
}
