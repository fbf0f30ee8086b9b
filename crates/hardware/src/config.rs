//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to
//! parameterize a simulated cache. It provides:
//! 1. **Defaults:** Baseline geometry constants (capacity, line size, ways).
//! 2. **Structures:** Per-cache configuration including partition parameters.
//! 3. **Enums:** Replacement policy selection.
//!
//! Configuration is supplied via JSON from the trace-replay driver, or use
//! `CacheConfig::default()` for a standalone cache.

use serde::Deserialize;

/// Default configuration constants for a simulated cache.
///
/// These values define the baseline cache when not explicitly overridden in
/// the driver's configuration file.
mod defaults {
    /// Default cache capacity in bytes (32 KiB).
    pub const SIZE_BYTES: usize = 32 * 1024;

    /// Default cache line size in bytes (64 bytes).
    ///
    /// Matches typical modern processor cache line sizes.
    pub const LINE_BYTES: usize = 64;

    /// Default cache associativity (8 ways).
    pub const WAYS: usize = 8;

    /// Default way quota reserved for core 0 under SWP/DWP (half the ways).
    pub const CORE0_WAYS: usize = 4;

    /// Default dynamic-partition rebalance interval in cycles.
    pub const REBALANCE_INTERVAL: u64 = 10_000;

    /// Default seed for the Random policy's generator.
    ///
    /// Fixed so that repeated runs over the same trace are reproducible.
    pub const RNG_SEED: u64 = 123_456_789;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which cache line to evict when a
/// new line must be installed in a full cache set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the valid line with the oldest recency timestamp.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Random replacement policy.
    ///
    /// Evicts a pseudo-randomly selected way once the set is full.
    #[serde(alias = "Random")]
    Random,
    /// Static way partitioning between two cores.
    ///
    /// Reserves a fixed quota of ways per set for core 0; the remainder
    /// belongs to core 1. Partitioning constrains eviction only, not lookup.
    #[serde(alias = "Swp")]
    Swp,
    /// Dynamic way partitioning between two cores.
    ///
    /// Same victim rule as [`ReplacementPolicy::Swp`], but the quota is
    /// periodically rebalanced toward the core with the higher rolling
    /// hit ratio.
    #[serde(alias = "Dwp")]
    Dwp,
}

/// Configuration for a single simulated cache.
///
/// # Examples
///
/// Deserializing from JSON (typical driver usage):
///
/// ```
/// use cachesim_core::config::{CacheConfig, ReplacementPolicy};
///
/// let json = r#"{
///     "size_bytes": 1048576,
///     "line_bytes": 64,
///     "ways": 16,
///     "policy": "DWP",
///     "core0_ways": 8,
///     "rebalance_interval": 10000
/// }"#;
///
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.ways, 16);
/// assert_eq!(config.policy, ReplacementPolicy::Dwp);
/// assert_eq!(config.rng_seed, CacheConfig::default().rng_seed);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total cache capacity in bytes.
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes.
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Way quota per set reserved for core 0 (SWP/DWP only).
    ///
    /// Must lie in `1..=ways - 1`; the remaining ways are core 1's quota.
    #[serde(default = "CacheConfig::default_core0_ways")]
    pub core0_ways: usize,

    /// Cycles between dynamic-partition rebalance decisions (DWP only).
    #[serde(default = "CacheConfig::default_rebalance_interval")]
    pub rebalance_interval: u64,

    /// Seed for the Random policy's generator.
    #[serde(default = "CacheConfig::default_rng_seed")]
    pub rng_seed: u64,
}

impl CacheConfig {
    /// Returns the default cache capacity in bytes.
    fn default_size() -> usize {
        defaults::SIZE_BYTES
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::LINE_BYTES
    }

    /// Returns the default cache associativity (number of ways).
    fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default core 0 way quota.
    fn default_core0_ways() -> usize {
        defaults::CORE0_WAYS
    }

    /// Returns the default rebalance interval in cycles.
    fn default_rebalance_interval() -> u64 {
        defaults::REBALANCE_INTERVAL
    }

    /// Returns the default Random-policy seed.
    fn default_rng_seed() -> u64 {
        defaults::RNG_SEED
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration.
    ///
    /// 32 KiB, 64-byte lines, 8-way set-associative, LRU replacement, with
    /// the partition quota split evenly should a partitioned policy be
    /// selected.
    fn default() -> Self {
        Self {
            size_bytes: defaults::SIZE_BYTES,
            line_bytes: defaults::LINE_BYTES,
            ways: defaults::WAYS,
            policy: ReplacementPolicy::default(),
            core0_ways: defaults::CORE0_WAYS,
            rebalance_interval: defaults::REBALANCE_INTERVAL,
            rng_seed: defaults::RNG_SEED,
        }
    }
}
