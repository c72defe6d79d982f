//! Inbound ports (API) for the inventory relay.

use shared_types::GossipPayload;

use crate::domain::Item;
use crate::ports::outbound::RelayPeer;

/// Producer-side surface, invoked from network handling paths.
///
/// Hot-path contract: none of these operations block on I/O, return errors,
/// or panic. Failures are absorbed and logged, or converted into a state
/// transition (expire, drop, re-queue).
pub trait AdvertiserApi: Send + Sync {
    /// Atomically admit a remotely announced item for fetching.
    ///
    /// Returns false, with no state change, if a fetch is already in flight
    /// for the item or its payload is already held. Two concurrent calls for
    /// the same item never both return true.
    fn add_inventory(&self, item: Item) -> bool;

    /// Look up a recently held payload. No side effects.
    fn cached_message(&self, item: &Item) -> Option<GossipPayload>;

    /// Queue a locally produced or received payload for spreading to peers.
    ///
    /// A block payload supersedes standalone gossip for every transaction it
    /// contains. Payloads that are neither block nor transaction are logged
    /// and dropped.
    fn broadcast(&self, payload: GossipPayload);

    /// Recover in-flight requests lost with a disconnecting peer: each is
    /// re-queued for fetching iff some other active peer is known to hold it.
    fn on_peer_disconnect(&self, peer: &dyn RelayPeer);
}
