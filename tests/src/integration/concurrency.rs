//! # Concurrency Tests
//!
//! The relay's two hardest guarantees under real thread interleaving:
//!
//! 1. **Admission exclusivity**: concurrent `add_inventory` calls for one
//!    item admit exactly one caller.
//! 2. **Spread snapshot atomicity**: every broadcast lands in exactly one
//!    spread cycle's snapshot (never zero, never two) while cycles run
//!    concurrently with the producers.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use inventory_relay::{AdvertiserApi, InventoryAdvertiser, Item, RelayConfig};
    use shared_types::Hash;

    use crate::support::{init_tracing, tx_payload, ScriptedPeer, ScriptedRegistry};

    fn advertiser(
        registry: Arc<ScriptedRegistry>,
    ) -> Arc<InventoryAdvertiser<ScriptedRegistry>> {
        Arc::new(InventoryAdvertiser::new(RelayConfig::default(), registry).unwrap())
    }

    #[test]
    fn racing_admissions_accept_each_item_once() {
        init_tracing();
        let advertiser = advertiser(ScriptedRegistry::with_peers(vec![]));
        const ITEMS: u8 = 16;
        const RACERS: usize = 4;

        let accepted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..ITEMS)
                .flat_map(|byte| {
                    (0..RACERS).map(move |_| Item::transaction([byte; 32]))
                })
                .map(|item| {
                    let advertiser = Arc::clone(&advertiser);
                    scope.spawn(move || advertiser.add_inventory(item))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|&accepted| accepted)
                .count()
        });

        assert_eq!(accepted, ITEMS as usize);
        assert_eq!(advertiser.pending_fetch_len(), ITEMS as usize);
    }

    #[test]
    fn every_broadcast_lands_in_exactly_one_snapshot() {
        init_tracing();
        // Amnesiac peer: a doubled snapshot would surface as a duplicate
        // hash instead of being filtered by announcement bookkeeping.
        let peer = ScriptedPeer::amnesiac(1);
        let registry = ScriptedRegistry::with_peers(vec![Arc::clone(&peer)]);
        let advertiser = advertiser(registry);
        const PRODUCERS: u8 = 4;
        const PER_PRODUCER: u8 = 32;

        std::thread::scope(|scope| {
            for producer in 0..PRODUCERS {
                let advertiser = Arc::clone(&advertiser);
                scope.spawn(move || {
                    for sequence in 0..PER_PRODUCER {
                        advertiser.broadcast(tx_payload(producer * PER_PRODUCER + sequence));
                    }
                });
            }

            // Drain concurrently with the producers.
            let drainer = Arc::clone(&advertiser);
            scope.spawn(move || {
                for _ in 0..200 {
                    drainer.run_spread_cycle().unwrap();
                    std::thread::yield_now();
                }
            });
        });

        // Catch anything broadcast after the last concurrent drain.
        advertiser.run_spread_cycle().unwrap();

        let announced = peer.announced_hashes();
        let total = PRODUCERS as usize * PER_PRODUCER as usize;
        assert_eq!(announced.len(), total, "no broadcast may be lost or doubled");
        let unique: HashSet<Hash> = announced.into_iter().collect();
        assert_eq!(unique.len(), total);
        assert_eq!(advertiser.pending_spread_len(), 0);
    }
}
