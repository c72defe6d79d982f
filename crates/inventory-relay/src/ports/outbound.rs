//! Outbound ports (SPI) for the inventory relay.

use std::sync::Arc;

use shared_types::{Hash, NodeId};

use crate::domain::{InventoryKind, Item};
use crate::error::RelayError;

/// Peer registry interface; queried fresh every cycle so the relay always
/// works against the live peer set.
pub trait PeerRegistry: Send + Sync {
    /// Currently connected peers, in registry order.
    fn active_peers(&self) -> Vec<Arc<dyn RelayPeer>>;
}

/// One connected peer as seen by the relay.
///
/// The connection object owns the three bookkeeping maps (requested, known,
/// announced); the relay only reads and writes them through this surface,
/// always keyed by full [`Item`]. Implementations must be internally
/// synchronized; the relay calls from its loops and from network threads
/// concurrently.
pub trait RelayPeer: Send + Sync {
    fn node_id(&self) -> NodeId;

    /// Not mid-transfer and free to take a fetch request.
    fn is_idle(&self) -> bool;
    /// We are bulk-syncing the chain from this peer.
    fn is_syncing_from_peer(&self) -> bool;
    /// This peer is bulk-syncing the chain from us.
    fn is_syncing_to_peer(&self) -> bool;

    /// Record that `item` was requested from this peer.
    fn record_request(&self, item: Item);
    /// Items requested from this peer and not yet answered.
    fn outstanding_requests(&self) -> Vec<Item>;
    /// Whether the peer is known to hold `item` (it announced or sent it).
    fn knows_item(&self, item: &Item) -> bool;
    /// Record that `item` was announced to this peer.
    fn record_announcement(&self, item: Item);
    /// Whether `item` was already announced to this peer.
    fn was_announced(&self, item: &Item) -> bool;

    /// Hand a message to the transport layer. Fire-and-forget: delivery
    /// confirmation never reaches the relay.
    fn send(&self, message: OutboundMessage) -> Result<(), RelayError>;
}

/// Messages the relay produces, one per (peer, kind) bucket per cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundMessage {
    /// "I have these items"; invites the peer to fetch what it lacks.
    Inventory {
        kind: InventoryKind,
        hashes: Vec<Hash>,
    },
    /// "Send me the full data for these items."
    FetchData {
        kind: InventoryKind,
        hashes: Vec<Hash>,
    },
}

impl OutboundMessage {
    /// Number of hashes carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Inventory { hashes, .. } | Self::FetchData { hashes, .. } => hashes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
