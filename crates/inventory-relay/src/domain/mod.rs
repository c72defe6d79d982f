//! # Domain Layer
//!
//! Pure inventory identity and recency caching, no I/O.
//!
//! ## Contents
//!
//! - **item**: `Item` value type, `InventoryKind`, `block_height` extraction
//! - **recency**: `RecencyCache` (capacity + TTL bounded map)

mod item;
mod recency;

pub use item::{block_height, InventoryKind, Item};
pub use recency::RecencyCache;
