//! # End-to-End Relay Flow Tests
//!
//! Exercises the full advertisement/fetch pipeline:
//!
//! ```text
//! broadcast ──→ [pending-spread] ──spread cycle──→ inventory to peers
//! add_inventory ──→ [pending-fetch] ──fetch cycle──→ fetch to one peer
//!                        │
//!                        └── expiry / disconnect re-route
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use inventory_relay::{
        AdvertiserApi, InventoryAdvertiser, InventoryKind, Item, LoopCadence, OutboundMessage,
        RelayConfig, RelayPeer,
    };

    use crate::support::{
        block_payload, init_tracing, tx_payload, ScriptedPeer, ScriptedRegistry,
    };

    fn advertiser(
        config: RelayConfig,
        registry: Arc<ScriptedRegistry>,
    ) -> Arc<InventoryAdvertiser<ScriptedRegistry>> {
        Arc::new(InventoryAdvertiser::new(config, registry).unwrap())
    }

    /// Broadcast a block carrying T1 while T1's own broadcast is still
    /// pending; the standalone transaction is never announced, the block is.
    /// A remote announcement of the same transaction afterwards is admitted
    /// exactly once.
    #[test]
    fn block_supersedes_transaction_and_dedup_holds() {
        init_tracing();
        let peer = ScriptedPeer::idle(1);
        let registry = ScriptedRegistry::with_peers(vec![Arc::clone(&peer)]);
        let advertiser = advertiser(RelayConfig::default(), registry);

        advertiser.broadcast(tx_payload(0x51));
        advertiser.broadcast(block_payload(7, &[0x51]));
        advertiser.run_spread_cycle().unwrap();

        let messages = peer.sent.lock().clone();
        assert_eq!(messages.len(), 1, "only the block bucket must be sent");
        match &messages[0] {
            OutboundMessage::Inventory { kind, hashes } => {
                assert_eq!(*kind, InventoryKind::Block);
                assert_eq!(hashes.len(), 1);
            }
            other => panic!("expected inventory message, got {other:?}"),
        }

        // The transaction was never announced standalone, but a remote peer
        // may still offer it; admission works exactly once.
        let remote = Item::transaction([0x52; 32]);
        assert!(advertiser.add_inventory(remote));
        assert!(!advertiser.add_inventory(remote));
    }

    /// An item nobody serves is dropped by the first cycle past the expiry
    /// window and can no longer be assigned, even to a peer that now has it.
    #[test]
    fn expired_item_is_never_assigned() {
        init_tracing();
        let item = Item::transaction([0x61; 32]);
        let bystander = ScriptedPeer::idle(1);
        let registry = ScriptedRegistry::with_peers(vec![Arc::clone(&bystander)]);
        let config = RelayConfig {
            block_interval: Duration::from_millis(5),
            fetch_expiry_intervals: 2,
            ..RelayConfig::default()
        };
        let advertiser = advertiser(config, registry.clone());

        assert!(advertiser.add_inventory(item));
        std::thread::sleep(Duration::from_millis(30));
        advertiser.run_fetch_cycle().unwrap();
        assert_eq!(advertiser.pending_fetch_len(), 0);
        assert_eq!(advertiser.metrics().snapshot().items_expired, 1);

        // A late-arriving source changes nothing; the item is gone.
        let source = ScriptedPeer::knowing(2, &[item]);
        registry.connect(Arc::clone(&source));
        advertiser.run_fetch_cycle().unwrap();
        assert!(source.requested.lock().is_empty());
        assert!(source.sent.lock().is_empty());
    }

    /// Peer A disconnects holding an outstanding request; the item reappears
    /// in the pending set and lands on peer B, which is known to hold it.
    #[test]
    fn disconnect_reroutes_to_alternate_source() {
        init_tracing();
        let item = Item::transaction([0x71; 32]);
        let first = ScriptedPeer::knowing(1, &[item]);
        let second = ScriptedPeer::knowing(2, &[item]);
        let registry = ScriptedRegistry::with_peers(vec![Arc::clone(&first)]);
        let advertiser = advertiser(RelayConfig::default(), registry.clone());

        assert!(advertiser.add_inventory(item));
        advertiser.run_fetch_cycle().unwrap();
        assert_eq!(first.outstanding_requests(), vec![item]);
        assert_eq!(advertiser.pending_fetch_len(), 0);

        registry.disconnect(&first.id);
        registry.connect(Arc::clone(&second));
        advertiser.on_peer_disconnect(first.as_ref());

        assert_eq!(advertiser.pending_fetch_len(), 1);
        advertiser.run_fetch_cycle().unwrap();
        assert_eq!(second.outstanding_requests(), vec![item]);
        assert_eq!(second.fetched_hashes(), vec![item.hash]);
    }

    /// Without an alternate source the lost request is dropped for good.
    #[test]
    fn disconnect_without_alternate_source_drops_request() {
        init_tracing();
        let item = Item::transaction([0x81; 32]);
        let first = ScriptedPeer::knowing(1, &[item]);
        let stranger = ScriptedPeer::idle(2);
        let registry = ScriptedRegistry::with_peers(vec![Arc::clone(&first), stranger]);
        let advertiser = advertiser(RelayConfig::default(), registry.clone());

        assert!(advertiser.add_inventory(item));
        advertiser.run_fetch_cycle().unwrap();

        registry.disconnect(&first.id);
        advertiser.on_peer_disconnect(first.as_ref());

        assert_eq!(advertiser.pending_fetch_len(), 0);
    }

    /// Full pipeline under the real schedulers: broadcasts flow out as
    /// announcements and admitted inventory is fetched, without driving any
    /// cycle by hand.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn background_loops_move_traffic() {
        init_tracing();
        let item = Item::transaction([0x91; 32]);
        let listener = ScriptedPeer::idle(1);
        let source = ScriptedPeer::knowing(2, &[item]);
        let registry =
            ScriptedRegistry::with_peers(vec![Arc::clone(&listener), Arc::clone(&source)]);
        let cadence = LoopCadence {
            initial_delay: Duration::from_millis(1),
            period: Duration::from_millis(5),
        };
        let config = RelayConfig {
            fetch_loop: cadence,
            spread_loop: cadence,
            ..RelayConfig::default()
        };
        let advertiser = advertiser(config, registry);

        advertiser.start();
        advertiser.broadcast(tx_payload(0x92));
        assert!(advertiser.add_inventory(item));

        tokio::time::sleep(Duration::from_millis(100)).await;
        advertiser.shutdown();

        assert_eq!(listener.announced_hashes(), vec![[0x92; 32]]);
        assert_eq!(source.fetched_hashes(), vec![item.hash]);
        assert_eq!(advertiser.pending_fetch_len(), 0);
        assert_eq!(advertiser.pending_spread_len(), 0);
    }
}
