//! Gossip payload union relayed between peers.

use std::sync::Arc;

use crate::entities::{PeerList, ValidatedBlock, ValidatedTransaction};

/// A payload carried by the node's gossip layer.
///
/// Blocks and transactions are inventory: they are announced to peers and
/// fetched on demand. Peer-exchange gossip is routed directly by the
/// connection layer and never enters the inventory pipeline.
#[derive(Debug, Clone)]
pub enum GossipPayload {
    /// A validated block with its transactions.
    Block(Arc<ValidatedBlock>),
    /// A validated standalone transaction.
    Transaction(Arc<ValidatedTransaction>),
    /// Known-peer exchange; not inventory.
    PeerExchange(Arc<PeerList>),
}

impl GossipPayload {
    /// Stable name of the payload kind, for logs and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Block(_) => "block",
            Self::Transaction(_) => "transaction",
            Self::PeerExchange(_) => "peer-exchange",
        }
    }
}
