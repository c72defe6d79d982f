//! Relay configuration with validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Cadence of one periodic loop.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopCadence {
    /// Delay before the first cycle.
    pub initial_delay: Duration,
    /// Delay between cycle starts.
    pub period: Duration,
}

impl Default for LoopCadence {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            period: Duration::from_millis(30),
        }
    }
}

/// Inventory relay configuration.
///
/// The cadences are throughput/latency tuning knobs, not correctness
/// constraints; the expiry window bounds how long an unservable fetch may
/// linger in the pending set.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Most hashes one fetch cycle may queue for a single peer. Measured on
    /// the cycle's outbound batch, which doubles as the least-loaded metric.
    pub max_fetch_per_peer: usize,
    /// Wall-clock length of one block production interval.
    pub block_interval: Duration,
    /// Pending fetches older than this many block intervals are abandoned.
    pub fetch_expiry_intervals: u32,
    /// Fetch loop cadence.
    pub fetch_loop: LoopCadence,
    /// Spread loop cadence.
    pub spread_loop: LoopCadence,
    /// Capacity of the fetch-dedup recency cache.
    pub fetch_cache_capacity: usize,
    /// Write-TTL of the fetch-dedup recency cache.
    pub fetch_cache_ttl: Duration,
    /// Capacity of the message store.
    pub message_cache_capacity: usize,
    /// Write-TTL of the message store.
    pub message_cache_ttl: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_fetch_per_peer: 100,
            block_interval: Duration::from_secs(3),
            fetch_expiry_intervals: 5,
            fetch_loop: LoopCadence::default(),
            spread_loop: LoopCadence::default(),
            fetch_cache_capacity: 500_000,
            fetch_cache_ttl: Duration::from_secs(3600),
            message_cache_capacity: 100_000,
            message_cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl RelayConfig {
    /// How long an item may sit in the pending-fetch set before a fetch
    /// cycle drops it unassigned.
    pub fn fetch_expiry(&self) -> Duration {
        self.block_interval * self.fetch_expiry_intervals
    }

    /// Reject configurations the cycles cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_fetch_per_peer == 0 {
            return Err(RelayError::InvalidConfig(
                "max_fetch_per_peer must be positive".into(),
            ));
        }
        if self.fetch_loop.period.is_zero() || self.spread_loop.period.is_zero() {
            return Err(RelayError::InvalidConfig(
                "loop period must be positive".into(),
            ));
        }
        if self.fetch_cache_capacity == 0 || self.message_cache_capacity == 0 {
            return Err(RelayError::InvalidConfig(
                "recency cache capacity must be positive".into(),
            ));
        }
        if self.block_interval.is_zero() || self.fetch_expiry_intervals == 0 {
            return Err(RelayError::InvalidConfig(
                "fetch expiry window must be positive".into(),
            ));
        }
        Ok(())
    }
}
