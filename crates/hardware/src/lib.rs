//! Multi-core set-associative cache simulation engine.
//!
//! This crate implements the lookup/install/victim-selection core of a
//! memory-hierarchy simulator with the following:
//! 1. **Storage:** A flat set/way array of cache lines with valid, dirty,
//!    recency, and owner-core metadata.
//! 2. **Classification:** Line-granular address decomposition, tag matching,
//!    and hit/miss statistics.
//! 3. **Replacement:** Pluggable victim-selection policies (LRU, Random,
//!    static way partitioning, dynamic way partitioning).
//! 4. **Reporting:** A byte-stable statistics dump consumed by external
//!    analysis tooling.
//!
//! The cycle-stepping driver that replays memory traces is an external
//! collaborator: it calls [`Cache::access`] once per memory reference,
//! follows each miss with [`Cache::install`], and supplies the monotone
//! cycle counter used for recency stamping and rebalance gating.

/// Cache storage, lookup/classification, and install/eviction engine.
pub mod cache;
/// Simulator configuration (defaults, policy selector, geometry).
pub mod config;
/// Configuration validation errors.
pub mod error;
/// Access and eviction statistics collection and reporting.
pub mod stats;

/// Main cache type; construct with [`Cache::new`].
pub use crate::cache::{AccessResult, Cache, CacheLine};
/// Cache geometry and policy selection; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// Construction error type returned by [`Cache::new`].
pub use crate::error::ConfigError;
