//! Static Way Partitioning (SWP) Replacement Policy.
//!
//! Conceptually splits every set's ways into a quota of `core0_ways` for
//! core 0 and the remainder for core 1, providing cache-space isolation
//! between the two cores. The quota constrains eviction only: a core that
//! has reached its quota evicts its own LRU line, while a core under quota
//! borrows from the other core's allocation by evicting that core's LRU
//! line. The quota is fixed for the run.

use super::{ReplacementPolicy, partition_victim};
use crate::cache::CacheLine;

/// Static partition policy state.
#[derive(Debug, Clone, Copy)]
pub struct StaticPartitionPolicy {
    /// Way quota per set reserved for core 0; core 1 owns the rest.
    core0_ways: usize,
}

impl StaticPartitionPolicy {
    /// Creates a static partition policy with the given core 0 quota.
    ///
    /// The cache constructor validates that the quota lies in
    /// `1..=ways - 1`.
    pub const fn new(core0_ways: usize) -> Self {
        Self { core0_ways }
    }
}

impl ReplacementPolicy for StaticPartitionPolicy {
    fn select_victim(&mut self, lines: &[CacheLine], core_id: usize, _now: u64) -> usize {
        partition_victim(lines, core_id, self.core0_ways)
    }

    fn core0_ways(&self) -> Option<usize> {
        Some(self.core0_ways)
    }
}
