//! # Core Domain Entities
//!
//! Defines the core blockchain entities consumed by the networking and
//! relay subsystems.
//!
//! ## Clusters
//!
//! - **Chain**: `BlockHeader`, `ValidatedBlock`, Transaction, `ValidatedTransaction`
//! - **Networking**: `PeerInfo`, `PeerList`, `NodeId`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Unique identifier for a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; 32]);

/// A peer identifier (alias for `NodeId` in peer contexts).
pub type PeerId = NodeId;

/// The header of a block containing metadata and root hashes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Protocol version for this block.
    pub version: u16,
    /// Block height in the chain.
    pub height: u64,
    /// Hash of the parent block (creates the chain linkage).
    pub parent_hash: Hash,
    /// Merkle root of all transactions in the block.
    pub merkle_root: Hash,
    /// Unix timestamp when the block was proposed.
    pub timestamp: u64,
    /// The validator who proposed this block.
    pub proposer: PublicKey,
}

impl BlockHeader {
    /// Compute the block identifier.
    ///
    /// The identifier is the SHA-256 hash of the header with its first 8
    /// bytes overwritten by the big-endian block height. Consumers can thus
    /// order block identifiers by height without consulting storage.
    pub fn block_id(&self) -> Hash {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.parent_hash);
        hasher.update(self.merkle_root);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.proposer);
        let mut id: Hash = hasher.finalize().into();
        id[..8].copy_from_slice(&self.height.to_be_bytes());
        id
    }
}

/// A validated block ready for relay and storage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidatedBlock {
    /// The block header.
    pub header: BlockHeader,
    /// All validated transactions in this block.
    pub transactions: Vec<ValidatedTransaction>,
}

impl ValidatedBlock {
    /// The height-prefixed block identifier (see [`BlockHeader::block_id`]).
    pub fn block_id(&self) -> Hash {
        self.header.block_id()
    }
}

/// A raw transaction as received from the network.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's public key.
    pub from: PublicKey,
    /// Recipient's public key (optional for contract creation).
    pub to: Option<PublicKey>,
    /// Transaction amount in base units.
    pub value: u64,
    /// Sender's nonce to prevent replay attacks.
    pub nonce: u64,
    /// Transaction payload (contract call data, etc.).
    pub data: Vec<u8>,
    /// Sender's signature over the transaction.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

impl Transaction {
    /// Compute the transaction hash.
    pub fn hash(&self) -> Hash {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.from);
        if let Some(to) = &self.to {
            hasher.update(to);
        }
        hasher.update(self.value.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(&self.data);
        hasher.finalize().into()
    }
}

/// A transaction that has passed signature and format validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedTransaction {
    /// The underlying transaction.
    pub inner: Transaction,
    /// Hash of the transaction for indexing.
    pub tx_hash: Hash,
}

impl ValidatedTransaction {
    /// Wrap a raw transaction, stamping its hash.
    pub fn from_transaction(inner: Transaction) -> Self {
        let tx_hash = inner.hash();
        Self { inner, tx_hash }
    }
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Information about a peer in the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerInfo {
    /// The peer's node ID.
    pub node_id: NodeId,
    /// Network address (IP:Port).
    pub address: String,
    /// Reputation score (0-100).
    pub reputation: u8,
    /// Last seen timestamp.
    pub last_seen: u64,
    /// Protocol version supported.
    pub protocol_version: u16,
}

/// A list of peers for exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerList {
    /// The peers in this list.
    pub peers: Vec<PeerInfo>,
}
