//! # Inventory Relay Subsystem
//!
//! Decides which peers to announce new blocks and transactions to, and which
//! peer to request remotely announced data from. Deduplicates downloads and
//! broadcasts, bounds per-peer load, and recovers requests lost to peer
//! disconnects.
//!
//! ## Architecture Role
//!
//! ```text
//! [local production] ──broadcast────→ [Inventory Advertiser] ──inv──→ [Peer A] [Peer B] ...
//! [peer connection]  ──add_inventory──────────┘│
//!                                              └─────fetch──→ one peer per item
//! ```
//!
//! Two independent periodic loops drive the outbound side: the spread loop
//! fans announcements out to every eligible peer, the fetch loop assigns each
//! pending item to the least-loaded eligible peer known to hold it.
//!
//! ## Concurrency
//!
//! Every shared structure declares its concurrency class where it is defined;
//! see [`InventoryAdvertiser`]. Producer-side calls never block on I/O and
//! never propagate errors into network handling paths.

pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use batch::OutboundBatch;
pub use config::{LoopCadence, RelayConfig};
pub use domain::{block_height, InventoryKind, Item, RecencyCache};
pub use error::{RelayError, Result};
pub use metrics::{MetricsSnapshot, RelayMetrics};
pub use ports::{AdvertiserApi, OutboundMessage, PeerRegistry, RelayPeer};
pub use service::InventoryAdvertiser;
