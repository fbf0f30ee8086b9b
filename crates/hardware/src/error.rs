//! Configuration validation errors.
//!
//! The engine is a simulation core, not a service: once a cache is
//! constructed, its operations are infallible. All failure modes are
//! geometry misconfigurations detected at construction time, where the
//! simulator must refuse to proceed rather than silently decompose
//! addresses incorrectly.

use thiserror::Error;

/// Errors detected while validating a [`crate::CacheConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity, line size, and associativity must all be non-zero.
    #[error("cache geometry must be non-zero (size_bytes={size_bytes}, line_bytes={line_bytes}, ways={ways})")]
    ZeroGeometry {
        /// Configured capacity in bytes.
        size_bytes: usize,
        /// Configured line size in bytes.
        line_bytes: usize,
        /// Configured associativity.
        ways: usize,
    },

    /// Capacity does not divide evenly into sets of `line_bytes * ways`.
    #[error("cache size {size_bytes} is not a multiple of line_bytes * ways ({set_bytes})")]
    UnevenCapacity {
        /// Configured capacity in bytes.
        size_bytes: usize,
        /// Bytes per set (`line_bytes * ways`).
        set_bytes: usize,
    },

    /// The modulo/divide address split only matches hardware indexing when
    /// the set count is a power of two.
    #[error("set count {sets} is not a power of two")]
    SetsNotPowerOfTwo {
        /// Computed number of sets.
        sets: usize,
    },

    /// The core 0 way quota must leave at least one way for each core.
    #[error("core 0 way quota {core0_ways} must lie in 1..={} for a {ways}-way cache", .ways - 1)]
    QuotaOutOfRange {
        /// Configured core 0 quota.
        core0_ways: usize,
        /// Configured associativity.
        ways: usize,
    },
}
