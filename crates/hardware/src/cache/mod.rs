//! Set-associative cache lookup/install engine.
//!
//! This module implements the mutable core of the simulator: the indexed
//! set/way array, hit/miss classification, and miss-driven installation
//! with victim eviction. Addresses are line-granular (the driver strips the
//! line-offset bits), and are decomposed with a modulo/divide split:
//! `set_index = line_addr % sets`, `tag = line_addr / sets`. The split is
//! index-equivalent to bit masking only when the set count is a power of
//! two, which construction enforces.
//!
//! Partitioned policies constrain *eviction* only: lookup matches on the
//! tag alone, so cores that alias the same set and tag share the line, as
//! in the underlying hardware model.

/// Cache replacement policy implementations (LRU, Random, SWP, DWP).
pub mod policies;

use self::policies::{
    DynamicPartitionPolicy, LruPolicy, RandomPolicy, ReplacementPolicy, StaticPartitionPolicy,
};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyKind};
use crate::error::ConfigError;
use crate::stats::CacheStats;

/// Cache line entry: tag plus validity, dirty, recency, and owner metadata.
///
/// Lines are allocated once at construction, mutated in place on hits, and
/// overwritten (never freed) on eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Whether this way holds a line.
    pub valid: bool,
    /// Whether the line has been written since installation (writeback needed on eviction).
    pub dirty: bool,
    /// Line tag (`line_addr / sets`).
    pub tag: u64,
    /// Cycle of the most recent access or install, for LRU ordering.
    pub last_access_time: u64,
    /// Logical core that installed the line, for way partitioning.
    pub owner_core: usize,
}

/// Outcome of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessResult {
    /// A valid line with a matching tag was found.
    Hit,
    /// No matching line; the driver is expected to follow up with
    /// [`Cache::install`] once the miss is resolved from the next level.
    Miss,
}

impl AccessResult {
    /// Returns `true` for [`AccessResult::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// A single simulated set-associative cache.
///
/// The cache is driven sequentially by an external stepper, one memory
/// reference at a time, for interleaved streams from multiple logical cores
/// (`core_id` distinguishes requesters, not OS threads). The stepper owns
/// the cycle counter and passes it as `now`.
///
/// # Examples
///
/// ```
/// use cachesim_core::{AccessResult, Cache, CacheConfig};
///
/// # fn main() -> Result<(), cachesim_core::ConfigError> {
/// let mut cache = Cache::new(&CacheConfig::default())?;
///
/// assert_eq!(cache.access(0x40, false, 0, 1), AccessResult::Miss);
/// assert!(cache.install(0x40, false, 0, 1).is_none());
/// assert_eq!(cache.access(0x40, false, 0, 2), AccessResult::Hit);
/// # Ok(())
/// # }
/// ```
pub struct Cache {
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    line_bytes: usize,
    policy: Box<dyn ReplacementPolicy>,
    stats: CacheStats,
}

impl Cache {
    /// Creates a cache from the given configuration.
    ///
    /// The set count is `size_bytes / (line_bytes * ways)`; every line
    /// starts invalid with zeroed metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any geometry parameter is zero, if the
    /// capacity is not an exact multiple of `line_bytes * ways`, if the
    /// resulting set count is not a power of two, or if a partitioned
    /// policy is selected with `core0_ways` outside `1..=ways - 1`.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        if config.size_bytes == 0 || config.line_bytes == 0 || config.ways == 0 {
            return Err(ConfigError::ZeroGeometry {
                size_bytes: config.size_bytes,
                line_bytes: config.line_bytes,
                ways: config.ways,
            });
        }

        let set_bytes = config.line_bytes * config.ways;
        if config.size_bytes % set_bytes != 0 {
            return Err(ConfigError::UnevenCapacity {
                size_bytes: config.size_bytes,
                set_bytes,
            });
        }

        let num_sets = config.size_bytes / set_bytes;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo { sets: num_sets });
        }

        let policy: Box<dyn ReplacementPolicy> = match config.policy {
            PolicyKind::Lru => Box::new(LruPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::with_seed(config.rng_seed)),
            PolicyKind::Swp | PolicyKind::Dwp => {
                if config.core0_ways == 0 || config.core0_ways >= config.ways {
                    return Err(ConfigError::QuotaOutOfRange {
                        core0_ways: config.core0_ways,
                        ways: config.ways,
                    });
                }
                if config.policy == PolicyKind::Swp {
                    Box::new(StaticPartitionPolicy::new(config.core0_ways))
                } else {
                    Box::new(DynamicPartitionPolicy::new(
                        config.core0_ways,
                        config.rebalance_interval,
                    ))
                }
            }
        };

        tracing::debug!(
            sets = num_sets,
            ways = config.ways,
            line_bytes = config.line_bytes,
            policy = ?config.policy,
            "cache constructed"
        );

        Ok(Self {
            lines: vec![CacheLine::default(); num_sets * config.ways],
            num_sets,
            ways: config.ways,
            line_bytes: config.line_bytes,
            policy,
            stats: CacheStats::default(),
        })
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity (ways per set).
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    /// Splits a line-granular address into a set index and a tag.
    const fn decompose(&self, line_addr: u64) -> (usize, u64) {
        let sets = self.num_sets as u64;
        ((line_addr % sets) as usize, line_addr / sets)
    }

    /// Looks up `line_addr`, updating statistics and line metadata.
    ///
    /// The read or write access counter is bumped unconditionally before
    /// classification. On a hit the line's recency stamp is set to `now` and,
    /// for writes, its dirty bit is set; tag, validity, and owner are never
    /// touched. On a miss the corresponding miss counter is bumped and no
    /// line is mutated — the driver resolves the miss and calls
    /// [`Cache::install`].
    ///
    /// # Panics
    ///
    /// In debug builds, panics if two valid lines in the target set share a
    /// tag. The invariant cannot be violated through this API; the assertion
    /// guards against silent hits on the wrong line if storage is ever
    /// corrupted.
    pub fn access(&mut self, line_addr: u64, is_write: bool, core_id: usize, now: u64) -> AccessResult {
        let (set_index, tag) = self.decompose(line_addr);
        if is_write {
            self.stats.write_access += 1;
        } else {
            self.stats.read_access += 1;
        }

        let base = set_index * self.ways;
        let set = &mut self.lines[base..base + self.ways];
        let hit_way = set.iter().position(|line| line.valid && line.tag == tag);

        if let Some(way) = hit_way {
            debug_assert!(
                set.iter()
                    .enumerate()
                    .all(|(w, line)| w == way || !line.valid || line.tag != tag),
                "tag uniqueness violated: duplicate tag {tag:#x} in set {set_index}"
            );
            let line = &mut set[way];
            if is_write {
                line.dirty = true;
            }
            line.last_access_time = now;
        } else if is_write {
            self.stats.write_miss += 1;
        } else {
            self.stats.read_miss += 1;
        }

        self.policy.record_access(core_id, hit_way.is_some());

        if hit_way.is_some() {
            AccessResult::Hit
        } else {
            AccessResult::Miss
        }
    }

    /// Installs the line for `line_addr`, evicting a policy-chosen victim.
    ///
    /// Called by the driver exactly once per resolved miss, never for a hit.
    /// Returns a snapshot of the evicted line (`Some` only when the victim
    /// was valid) so the caller can issue a writeback when the snapshot is
    /// dirty. The dirty-eviction counter is bumped for every valid dirty
    /// victim.
    pub fn install(&mut self, line_addr: u64, is_write: bool, core_id: usize, now: u64) -> Option<CacheLine> {
        let (set_index, tag) = self.decompose(line_addr);
        let base = set_index * self.ways;

        let victim_way = self
            .policy
            .select_victim(&self.lines[base..base + self.ways], core_id, now);
        let victim = &mut self.lines[base + victim_way];

        let evicted = *victim;
        if evicted.valid && evicted.dirty {
            self.stats.dirty_evicts += 1;
        }

        *victim = CacheLine {
            valid: true,
            dirty: is_write,
            tag,
            last_access_time: now,
            owner_core: core_id,
        };

        evicted.valid.then_some(evicted)
    }

    /// Returns whether `line_addr` is resident, without side effects.
    ///
    /// Unlike [`Cache::access`], this touches neither statistics nor
    /// recency metadata.
    pub fn contains(&self, line_addr: u64) -> bool {
        let (set_index, tag) = self.decompose(line_addr);
        let base = set_index * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .any(|line| line.valid && line.tag == tag)
    }

    /// The lines of one set, for inspection and debugging.
    ///
    /// # Panics
    ///
    /// Panics if `set_index >= self.sets()`.
    pub fn set_lines(&self, set_index: usize) -> &[CacheLine] {
        let base = set_index * self.ways;
        &self.lines[base..base + self.ways]
    }

    /// Current statistics counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Renders the statistics report with every field prefixed by `label`.
    ///
    /// See [`CacheStats::report`] for the format contract.
    pub fn report(&self, label: &str) -> String {
        self.stats.report(label)
    }

    /// Current core 0 way quota, or `None` for unpartitioned policies.
    ///
    /// Exposed for external inspection and logging; under DWP the value
    /// moves as rebalancing shifts quota between the cores.
    pub fn core0_ways(&self) -> Option<usize> {
        self.policy.core0_ways()
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("sets", &self.num_sets)
            .field("ways", &self.ways)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
