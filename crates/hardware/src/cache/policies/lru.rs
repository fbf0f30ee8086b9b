//! Least Recently Used (LRU) Replacement Policy.
//!
//! Evicts the valid line whose recency stamp is oldest. The cache stamps
//! `last_access_time` on every hit and install, so the policy itself is
//! stateless: victim selection is a single scan over the set.
//!
//! Ties on the stamp resolve to the lowest way index, keeping selection
//! deterministic.

use super::{ReplacementPolicy, find_invalid_way};
use crate::cache::CacheLine;

/// LRU policy. Stateless; recency lives on the cache lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Picks the first invalid way, or the valid way with the oldest
    /// recency stamp.
    fn select_victim(&mut self, lines: &[CacheLine], _core_id: usize, _now: u64) -> usize {
        if let Some(way) = find_invalid_way(lines) {
            return way;
        }
        lines
            .iter()
            .enumerate()
            .min_by_key(|(_, line)| line.last_access_time)
            .map_or(0, |(way, _)| way)
    }
}
