//! Cache replacement policies.
//!
//! Implements the victim-selection strategies for the set-associative cache.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used.
//! - `Random`: Seeded pseudo-random selection.
//! - `StaticPartition` (SWP): fixed per-core way quotas.
//! - `DynamicPartition` (DWP): quotas rebalanced by rolling hit ratios.
//!
//! All policies share one invariant: an invalid way is always preferred as
//! the victim, so a valid line is never evicted while empty capacity
//! remains in the set.

/// Dynamic way partitioning replacement policy.
pub mod dwp;

/// Least Recently Used replacement policy.
pub mod lru;

/// Seeded pseudo-random replacement policy.
pub mod random;

/// Static way partitioning replacement policy.
pub mod swp;

pub use dwp::DynamicPartitionPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;
pub use swp::StaticPartitionPolicy;

use crate::cache::CacheLine;

/// Trait for cache replacement policies.
///
/// Policies see the target set's lines at selection time, so stateless
/// strategies (LRU over the lines' recency stamps, partition scans over
/// their owner cores) carry no per-set bookkeeping of their own.
pub trait ReplacementPolicy: Send + Sync {
    /// Observes the outcome of one classified access.
    ///
    /// Called once per [`crate::Cache::access`], after hit/miss
    /// classification. Only the dynamic partition policy uses this, to feed
    /// its rolling per-core hit/access counters; the default is a no-op.
    fn record_access(&mut self, _core_id: usize, _hit: bool) {}

    /// Selects a victim way within the given set.
    ///
    /// `lines` is the full target set; the returned index is in
    /// `0..lines.len()`. `now` is the driver's cycle counter, used by the
    /// dynamic partition policy to gate rebalancing.
    fn select_victim(&mut self, lines: &[CacheLine], core_id: usize, now: u64) -> usize;

    /// Current core 0 way quota, or `None` for unpartitioned policies.
    fn core0_ways(&self) -> Option<usize> {
        None
    }
}

/// First invalid way in the set, if any.
pub(crate) fn find_invalid_way(lines: &[CacheLine]) -> Option<usize> {
    lines.iter().position(|line| !line.valid)
}

/// Per-core occupancy and recency summary of one set's valid lines.
pub(crate) struct SetScan {
    /// Valid-line count per core (cores other than 0 fold into slot 1).
    pub occupied: [usize; 2],
    /// Least recently used valid way per core.
    pub core_lru: [Option<usize>; 2],
    /// Least recently used valid way overall.
    pub global_lru: Option<usize>,
}

/// Scans a set's valid lines once, collecting per-core occupancy and LRU
/// candidates for the partition victim rule.
pub(crate) fn scan_valid_lines(lines: &[CacheLine]) -> SetScan {
    let mut scan = SetScan {
        occupied: [0; 2],
        core_lru: [None; 2],
        global_lru: None,
    };
    let mut core_oldest = [u64::MAX; 2];
    let mut oldest = u64::MAX;

    for (way, line) in lines.iter().enumerate() {
        if !line.valid {
            continue;
        }
        let core = usize::from(line.owner_core != 0);
        scan.occupied[core] += 1;
        if line.last_access_time < core_oldest[core] {
            core_oldest[core] = line.last_access_time;
            scan.core_lru[core] = Some(way);
        }
        if line.last_access_time < oldest {
            oldest = line.last_access_time;
            scan.global_lru = Some(way);
        }
    }
    scan
}

/// Shared victim rule for the two partitioned policies.
///
/// Prefers an invalid way. Otherwise, if the requesting core has reached or
/// exceeded its quota of valid lines in this set, its own LRU line is
/// evicted; when under quota it borrows by evicting the other core's LRU
/// line. If the chosen core holds no line in the set, the globally oldest
/// valid line is the deterministic fallback.
pub(crate) fn partition_victim(lines: &[CacheLine], core_id: usize, core0_ways: usize) -> usize {
    if let Some(way) = find_invalid_way(lines) {
        return way;
    }

    let scan = scan_valid_lines(lines);
    let own = usize::from(core_id != 0);
    let other = own ^ 1;
    let quota = if own == 0 {
        core0_ways
    } else {
        lines.len().saturating_sub(core0_ways)
    };

    let choice = if scan.occupied[own] >= quota {
        scan.core_lru[own]
    } else {
        scan.core_lru[other]
    };
    choice.or(scan.global_lru).unwrap_or(0)
}
