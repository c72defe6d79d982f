//! Inventory item identity.

use shared_types::Hash;

/// The two kinds of inventory a node advertises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InventoryKind {
    Block,
    Transaction,
}

/// Identifier of one unit of inventory: a content hash plus its kind.
///
/// Two items with equal hash and kind are the same inventory unit regardless
/// of which peer announced them. Used as the map key everywhere in the relay,
/// including the per-peer bookkeeping reached through the peer port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    pub hash: Hash,
    pub kind: InventoryKind,
}

impl Item {
    pub fn new(hash: Hash, kind: InventoryKind) -> Self {
        Self { hash, kind }
    }

    /// A block item.
    pub fn block(hash: Hash) -> Self {
        Self::new(hash, InventoryKind::Block)
    }

    /// A transaction item.
    pub fn transaction(hash: Hash) -> Self {
        Self::new(hash, InventoryKind::Transaction)
    }
}

/// Extract the block height embedded in a block identifier.
///
/// Block ids carry their height in the first 8 bytes, big-endian (see
/// `BlockHeader::block_id` in shared-types). Outbound block lists are ordered
/// with this so receivers can pipeline validation.
pub fn block_height(hash: &Hash) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(bytes)
}
