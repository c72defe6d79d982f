//! Error types for the inventory relay.

use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur inside the relay.
///
/// None of these ever propagate out of the producer-side entry points
/// (`add_inventory`, `broadcast`, `on_peer_disconnect`); they surface only
/// from construction, configuration, and the per-cycle loop boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Payload handed to `broadcast` is neither a block nor a transaction.
    #[error("Unsupported gossip payload: {kind}")]
    UnsupportedPayload {
        /// Payload kind name as reported by the gossip union.
        kind: &'static str,
    },

    /// The transport refused an outbound message.
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
