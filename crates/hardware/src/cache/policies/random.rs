//! Seeded Random Replacement Policy.
//!
//! Evicts a pseudo-randomly chosen way once the set is full. Uses a simple
//! xorshift generator owned by the policy instance and seeded explicitly at
//! construction, so repeated runs over the same trace pick the same
//! victims. Validity is still respected: an invalid way is always taken
//! before a valid line is sacrificed.

use super::{ReplacementPolicy, find_invalid_way};
use crate::cache::CacheLine;

/// Default xorshift seed used when the configuration supplies zero.
const DEFAULT_SEED: u64 = 123_456_789;

/// Random policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// Internal xorshift generator state; never zero.
    state: u64,
}

impl RandomPolicy {
    /// Creates a Random policy with the default seed.
    pub const fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a Random policy with an explicit seed.
    ///
    /// A zero seed would pin the xorshift generator at zero forever, so it
    /// is replaced by the default seed.
    pub const fn with_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Advances the generator and returns the next pseudo-random value.
    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Picks the first invalid way, or a uniformly pseudo-random way.
    fn select_victim(&mut self, lines: &[CacheLine], _core_id: usize, _now: u64) -> usize {
        if let Some(way) = find_invalid_way(lines) {
            return way;
        }
        (self.next() as usize) % lines.len()
    }
}
