//! Dynamic Way Partitioning (DWP) Replacement Policy.
//!
//! Uses the same victim rule as static way partitioning, but the core 0
//! quota is adjusted as the workload runs: every `interval` cycles the
//! rolling per-core hit ratios are compared and one way of quota shifts to
//! the core with the higher ratio, clamped so each core keeps at least one
//! way. The rolling counters are fed by the cache on every classified
//! access and reset after each rebalance decision.
//!
//! A core with zero accesses in an interval gives no ratio signal, so that
//! interval's adjustment is skipped rather than dividing by zero.

use super::{ReplacementPolicy, partition_victim};
use crate::cache::CacheLine;

/// Dynamic partition policy state.
///
/// All partition state — quota, rolling counters, rebalance point — is
/// owned here, per cache instance. Multiple caches never share a quota.
#[derive(Debug, Clone, Copy)]
pub struct DynamicPartitionPolicy {
    /// Current way quota per set for core 0; core 1 owns the rest.
    core0_ways: usize,
    /// Cycles between rebalance decisions.
    interval: u64,
    /// Cycle of the last rebalance decision.
    last_rebalance: u64,
    /// Rolling hit counts per core since the last rebalance.
    hits: [u64; 2],
    /// Rolling access counts per core since the last rebalance.
    accesses: [u64; 2],
}

impl DynamicPartitionPolicy {
    /// Creates a dynamic partition policy with an initial core 0 quota.
    ///
    /// The cache constructor validates that the quota lies in
    /// `1..=ways - 1`; rebalancing keeps it there.
    pub const fn new(core0_ways: usize, interval: u64) -> Self {
        Self {
            core0_ways,
            interval,
            last_rebalance: 0,
            hits: [0; 2],
            accesses: [0; 2],
        }
    }

    /// Shifts one way of quota toward the core with the higher rolling hit
    /// ratio, once per interval.
    ///
    /// Runs only when `now` has advanced past the last rebalance point by
    /// more than the interval. If either core recorded no accesses, the
    /// comparison has no signal and the adjustment is skipped. The rolling
    /// counters are reset either way and the rebalance point advances to
    /// `now`.
    fn rebalance(&mut self, ways: usize, now: u64) {
        if now <= self.last_rebalance.saturating_add(self.interval) {
            return;
        }

        if self.accesses[0] == 0 || self.accesses[1] == 0 {
            tracing::trace!(now, "rebalance skipped: a core recorded no accesses this interval");
        } else {
            let ratio0 = self.hits[0] as f64 / self.accesses[0] as f64;
            let ratio1 = self.hits[1] as f64 / self.accesses[1] as f64;
            let old = self.core0_ways;
            if ratio0 > ratio1 && self.core0_ways < ways - 1 {
                self.core0_ways += 1;
            } else if ratio0 < ratio1 && self.core0_ways > 1 {
                self.core0_ways -= 1;
            }
            if self.core0_ways == old {
                tracing::trace!(now, ratio0, ratio1, quota = self.core0_ways, "rebalance held quota");
            } else {
                tracing::debug!(
                    now,
                    ratio0,
                    ratio1,
                    old_quota = old,
                    new_quota = self.core0_ways,
                    "rebalanced core 0 way quota"
                );
            }
        }

        self.hits = [0; 2];
        self.accesses = [0; 2];
        self.last_rebalance = now;
    }
}

impl ReplacementPolicy for DynamicPartitionPolicy {
    /// Feeds the rolling per-core hit/access counters.
    ///
    /// Cores other than 0 fold into the second slot; only two cores
    /// participate in partitioning.
    fn record_access(&mut self, core_id: usize, hit: bool) {
        let core = usize::from(core_id != 0);
        self.accesses[core] += 1;
        if hit {
            self.hits[core] += 1;
        }
    }

    fn select_victim(&mut self, lines: &[CacheLine], core_id: usize, now: u64) -> usize {
        self.rebalance(lines.len(), now);
        partition_victim(lines, core_id, self.core0_ways)
    }

    fn core0_ways(&self) -> Option<usize> {
        Some(self.core0_ways)
    }
}
