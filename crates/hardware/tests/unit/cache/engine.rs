//! Cache Engine Unit Tests.
//!
//! Verifies the lookup/install core: modulo/divide address decomposition,
//! hit/miss classification, statistics counting, eviction preference, and
//! the tag-uniqueness invariant. Policy-specific victim selection is
//! covered separately in `policies.rs` and `partition.rs`.

use cachesim_core::config::ReplacementPolicy as PolicyKind;
use cachesim_core::{AccessResult, Cache, CacheConfig};
use proptest::prelude::{any, proptest};
use proptest::{prop_assert, prop_assert_eq};

// ──────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────

/// Builds a config with the given geometry and policy; partition and seed
/// parameters keep their defaults.
fn config(size_bytes: usize, line_bytes: usize, ways: usize, policy: PolicyKind) -> CacheConfig {
    CacheConfig {
        size_bytes,
        line_bytes,
        ways,
        policy,
        ..CacheConfig::default()
    }
}

/// Single-set LRU cache. With `sets == 1` the tag equals the line address,
/// which keeps eviction scenarios easy to read.
fn one_set_lru(ways: usize) -> Cache {
    Cache::new(&config(64 * ways, 64, ways, PolicyKind::Lru)).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Classification and miss/install pairing
// ══════════════════════════════════════════════════════════

/// First access to any line is a cold miss; after the driver installs it,
/// the same address hits.
#[test]
fn cold_miss_then_install_then_hit() {
    // 4096 / (64 * 4) = 16 sets.
    let mut cache = Cache::new(&config(4096, 64, 4, PolicyKind::Lru)).unwrap();

    assert_eq!(cache.access(5, false, 0, 1), AccessResult::Miss);
    let evicted = cache.install(5, false, 0, 1);
    assert!(evicted.is_none(), "installing into an empty set evicts nothing");
    assert_eq!(cache.access(5, false, 0, 2), AccessResult::Hit);

    let stats = cache.stats();
    assert_eq!(stats.read_access, 2);
    assert_eq!(stats.read_miss, 1);
    assert_eq!(stats.write_access, 0);
    assert_eq!(stats.write_miss, 0);
}

/// A miss mutates no line; installation is the driver's follow-up call.
#[test]
fn miss_leaves_lines_untouched() {
    let mut cache = one_set_lru(2);
    let _ = cache.access(1, false, 0, 1);
    let _ = cache.install(1, false, 0, 1);

    let before = cache.set_lines(0).to_vec();
    assert_eq!(cache.access(7, true, 1, 2), AccessResult::Miss);
    assert_eq!(cache.set_lines(0), before.as_slice());
}

/// The core id is not part of the match key: a line installed by one core
/// hits for the other.
#[test]
fn lines_are_shared_across_cores() {
    let mut cache = one_set_lru(2);
    let _ = cache.access(3, false, 0, 1);
    let _ = cache.install(3, false, 0, 1);

    assert_eq!(cache.access(3, false, 1, 2), AccessResult::Hit);
}

// ══════════════════════════════════════════════════════════
// 2. Address decomposition
// ══════════════════════════════════════════════════════════

/// capacity=4096, line=64, ways=4 ⇒ sets=16. Line addresses 0 and 16 both
/// decompose to set 0 (16 % 16 == 0) with distinct tags (0 and 1), so they
/// coexist in one set and compete for its ways.
#[test]
fn modulo_divide_decomposition() {
    let mut cache = Cache::new(&config(4096, 64, 4, PolicyKind::Lru)).unwrap();
    assert_eq!(cache.sets(), 16);
    assert_eq!(cache.ways(), 4);

    // Fill set 0 with tags 0..=3 (line addresses 0, 16, 32, 48).
    for (time, addr) in [0u64, 16, 32, 48].into_iter().enumerate() {
        let _ = cache.access(addr, false, 0, time as u64 + 1);
        assert!(cache.install(addr, false, 0, time as u64 + 1).is_none());
    }
    assert!(cache.contains(0));
    assert!(cache.contains(16));

    // A fifth address in set 0 evicts the oldest line: address 0, tag 0.
    let evicted = cache.install(64, false, 0, 10).expect("set was full");
    assert_eq!(evicted.tag, 0);
    assert!(!cache.contains(0));
    assert!(cache.contains(16));
}

// ══════════════════════════════════════════════════════════
// 3. Hit side effects
// ══════════════════════════════════════════════════════════

/// A hit updates only the dirty bit and the recency stamp; tag, validity,
/// and owner core are untouched.
#[test]
fn hit_mutates_only_dirty_and_recency() {
    let mut cache = one_set_lru(2);
    let _ = cache.access(9, false, 0, 1);
    let _ = cache.install(9, false, 0, 1);
    let before = cache.set_lines(0)[0];
    assert!(before.valid && !before.dirty);

    assert_eq!(cache.access(9, true, 1, 5), AccessResult::Hit);

    let after = cache.set_lines(0)[0];
    assert_eq!(after.tag, before.tag);
    assert_eq!(after.valid, before.valid);
    assert_eq!(after.owner_core, before.owner_core);
    assert!(after.dirty, "write hit marks the line dirty");
    assert_eq!(after.last_access_time, 5, "hit stamps the current cycle");
}

/// A read hit refreshes recency but leaves a clean line clean.
#[test]
fn read_hit_does_not_dirty() {
    let mut cache = one_set_lru(2);
    let _ = cache.access(9, false, 0, 1);
    let _ = cache.install(9, false, 0, 1);

    assert_eq!(cache.access(9, false, 0, 4), AccessResult::Hit);
    let line = cache.set_lines(0)[0];
    assert!(!line.dirty);
    assert_eq!(line.last_access_time, 4);
}

/// `contains` is a pure probe: no counter or recency changes.
#[test]
fn contains_has_no_side_effects() {
    let mut cache = one_set_lru(2);
    let _ = cache.access(9, false, 0, 1);
    let _ = cache.install(9, false, 0, 1);

    let stats_before = cache.stats().clone();
    let lines_before = cache.set_lines(0).to_vec();
    assert!(cache.contains(9));
    assert!(!cache.contains(10));
    assert_eq!(cache.stats(), &stats_before);
    assert_eq!(cache.set_lines(0), lines_before.as_slice());
}

// ══════════════════════════════════════════════════════════
// 4. Eviction and writeback accounting
// ══════════════════════════════════════════════════════════

/// While any way in the set is still invalid, installs never evict a valid
/// line.
#[test]
fn install_prefers_invalid_ways() {
    let mut cache = one_set_lru(4);
    for addr in 1..=4u64 {
        assert!(
            cache.install(addr, false, 0, addr).is_none(),
            "no valid line may be evicted while empty ways remain"
        );
    }
    // The set is now full; the next install must evict.
    assert!(cache.install(5, false, 0, 5).is_some());
}

/// Evicting a dirty line bumps the dirty-eviction counter and hands the
/// caller a dirty snapshot for writeback.
#[test]
fn dirty_eviction_is_counted_and_reported() {
    let mut cache = one_set_lru(2);
    let _ = cache.install(1, true, 0, 1); // dirty via write-install
    let _ = cache.install(2, false, 0, 2);

    let evicted = cache.install(3, false, 0, 3).expect("set was full");
    assert_eq!(evicted.tag, 1);
    assert!(evicted.dirty);
    assert_eq!(cache.stats().dirty_evicts, 1);
}

/// A line dirtied by a write hit (rather than a write install) also counts
/// as a dirty eviction.
#[test]
fn write_hit_dirt_persists_to_eviction() {
    let mut cache = one_set_lru(2);
    let _ = cache.access(1, false, 0, 1);
    let _ = cache.install(1, false, 0, 1);
    assert_eq!(cache.access(1, true, 0, 2), AccessResult::Hit);
    let _ = cache.install(2, false, 0, 3);

    let evicted = cache.install(3, false, 0, 10).expect("set was full");
    assert_eq!(evicted.tag, 1);
    assert!(evicted.dirty);
    assert_eq!(cache.stats().dirty_evicts, 1);
}

/// Evicting a clean line triggers no writeback accounting.
#[test]
fn clean_eviction_not_counted() {
    let mut cache = one_set_lru(2);
    let _ = cache.install(1, false, 0, 1);
    let _ = cache.install(2, false, 0, 2);

    let evicted = cache.install(3, false, 0, 3).expect("set was full");
    assert!(!evicted.dirty);
    assert_eq!(cache.stats().dirty_evicts, 0);
}

/// The classic LRU scenario: install tags 1..=4, touch 2, install 5. The
/// eviction must fall on tag 1 (the oldest untouched line), not on 2.
#[test]
fn lru_eviction_respects_touch() {
    let mut cache = one_set_lru(4);
    for addr in 1..=4u64 {
        let _ = cache.access(addr, false, 0, addr);
        let _ = cache.install(addr, false, 0, addr);
    }
    assert_eq!(cache.access(2, false, 0, 5), AccessResult::Hit);

    let evicted = cache.install(5, false, 0, 6).expect("set was full");
    assert_eq!(evicted.tag, 1);
    assert!(cache.contains(2));
}

// ══════════════════════════════════════════════════════════
// 5. Statistics counting
// ══════════════════════════════════════════════════════════

/// Access counters are bumped once per call, before classification, for
/// hits and misses alike; miss counters only on misses.
#[test]
fn access_counters_increment_per_call() {
    let mut cache = one_set_lru(2);

    let _ = cache.access(1, false, 0, 1); // read miss
    let _ = cache.install(1, false, 0, 1);
    let _ = cache.access(1, false, 0, 2); // read hit
    let _ = cache.access(1, true, 0, 3); // write hit
    let _ = cache.access(9, true, 0, 4); // write miss

    let stats = cache.stats();
    assert_eq!(stats.read_access, 2);
    assert_eq!(stats.write_access, 2);
    assert_eq!(stats.read_miss, 1);
    assert_eq!(stats.write_miss, 1);
}

// ══════════════════════════════════════════════════════════
// 6. Invariant properties
// ══════════════════════════════════════════════════════════

proptest! {
    /// Over arbitrary access/install sequences: no set ever holds two valid
    /// lines with equal tags, every install is immediately observable, and
    /// all counters are non-decreasing with exactly one access recorded per
    /// call.
    #[test]
    fn engine_invariants_hold(
        ops in proptest::collection::vec((0u64..512, any::<bool>(), 0usize..2), 1..200),
    ) {
        // 2048 / (64 * 4) = 8 sets, so 512 line addresses alias heavily.
        let mut cache = Cache::new(&config(2048, 64, 4, PolicyKind::Lru)).unwrap();
        let mut prev = cache.stats().clone();

        for (now, (addr, is_write, core)) in (1u64..).zip(ops) {
            let result = cache.access(addr, is_write, core, now);
            if !result.is_hit() {
                let _ = cache.install(addr, is_write, core, now);
            }
            prop_assert!(cache.contains(addr));

            let stats = cache.stats().clone();
            prop_assert!(stats.read_access >= prev.read_access);
            prop_assert!(stats.write_access >= prev.write_access);
            prop_assert!(stats.read_miss >= prev.read_miss);
            prop_assert!(stats.write_miss >= prev.write_miss);
            prop_assert!(stats.dirty_evicts >= prev.dirty_evicts);
            prop_assert_eq!(
                stats.read_access + stats.write_access,
                prev.read_access + prev.write_access + 1,
            );
            prev = stats;

            for set_index in 0..cache.sets() {
                let lines = cache.set_lines(set_index);
                for i in 0..lines.len() {
                    for j in i + 1..lines.len() {
                        prop_assert!(
                            !(lines[i].valid && lines[j].valid && lines[i].tag == lines[j].tag),
                            "duplicate tag {} in set {}",
                            lines[i].tag,
                            set_index,
                        );
                    }
                }
            }
        }
    }
}
