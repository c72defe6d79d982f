//! Per-cycle outbound batching.
//!
//! Groups queued hashes by (peer, kind) and emits exactly one message per
//! non-empty bucket. A batch lives for a single fetch or spread cycle; its
//! running per-peer size is what the fetch cycle's quota and least-loaded
//! selection are measured against.

use std::collections::HashMap;
use std::sync::Arc;

use shared_types::{Hash, NodeId};
use tracing::warn;

use crate::domain::{block_height, InventoryKind, Item};
use crate::error::Result;
use crate::ports::{OutboundMessage, RelayPeer};

/// One cycle's worth of outbound inventory or fetch traffic.
#[derive(Default)]
pub struct OutboundBatch {
    buckets: HashMap<NodeId, PeerBatch>,
}

struct PeerBatch {
    peer: Arc<dyn RelayPeer>,
    by_kind: HashMap<InventoryKind, Vec<Hash>>,
}

impl OutboundBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an item for a peer, creating the (peer, kind) bucket on first
    /// use. Hashes keep insertion order until dispatch.
    pub fn add(&mut self, item: Item, peer: &Arc<dyn RelayPeer>) {
        self.buckets
            .entry(peer.node_id())
            .or_insert_with(|| PeerBatch {
                peer: Arc::clone(peer),
                by_kind: HashMap::new(),
            })
            .by_kind
            .entry(item.kind)
            .or_default()
            .push(item.hash);
    }

    /// Total hashes queued for a peer across both kinds.
    pub fn queued_for(&self, peer: &NodeId) -> usize {
        self.buckets
            .get(peer)
            .map_or(0, |bucket| bucket.by_kind.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Send one inventory announcement per (peer, kind) bucket. Returns the
    /// number of hashes sent.
    pub fn dispatch_inventory(self) -> Result<usize> {
        self.dispatch(|kind, hashes| OutboundMessage::Inventory { kind, hashes })
    }

    /// Send one fetch request per (peer, kind) bucket. Returns the number of
    /// hashes sent.
    pub fn dispatch_fetch(self) -> Result<usize> {
        self.dispatch(|kind, hashes| OutboundMessage::FetchData { kind, hashes })
    }

    fn dispatch<F>(self, build: F) -> Result<usize>
    where
        F: Fn(InventoryKind, Vec<Hash>) -> OutboundMessage,
    {
        let mut sent = 0;
        for bucket in self.buckets.into_values() {
            for (kind, hashes) in bucket.by_kind {
                let hashes = ordered(kind, hashes);
                let count = hashes.len();
                if let Err(err) = bucket.peer.send(build(kind, hashes)) {
                    warn!(peer = ?bucket.peer.node_id(), %err, "outbound message refused");
                    return Err(err);
                }
                sent += count;
            }
        }
        Ok(sent)
    }
}

/// Blocks go out in ascending height order so the receiver can pipeline
/// validation; transactions keep insertion order.
fn ordered(kind: InventoryKind, mut hashes: Vec<Hash>) -> Vec<Hash> {
    if kind == InventoryKind::Block {
        hashes.sort_by_key(block_height);
    }
    hashes
}
