//! # Shared Types Crate
//!
//! This crate contains the domain entities shared across subsystems: chain
//! data (blocks, transactions), peer identity, and the gossip payload union
//! carried by the networking layer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **No Behavior**: Entities carry data and cheap derived values (hashes,
//!   identifiers); all orchestration lives in the subsystem crates.

pub mod entities;
pub mod gossip;

pub use entities::*;
pub use gossip::GossipPayload;
