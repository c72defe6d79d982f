//! Port traits and message types at the subsystem boundary.

pub mod inbound;
pub mod outbound;

pub use inbound::AdvertiserApi;
pub use outbound::{OutboundMessage, PeerRegistry, RelayPeer};
