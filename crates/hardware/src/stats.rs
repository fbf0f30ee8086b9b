//! Access and eviction statistics collection and reporting.
//!
//! This module tracks the per-cache performance counters used by the
//! trace-replay driver's final report. It provides:
//! 1. **Counters:** Read/write accesses, read/write misses, dirty evictions.
//! 2. **Derived metrics:** Read and write miss percentages.
//! 3. **Reporting:** A byte-stable textual dump keyed by a caller-supplied
//!    label prefix.

use std::fmt::Write;

/// Monotone statistics counters for one simulated cache.
///
/// Counters only ever increase during a run; they are never reset. Access
/// counters are bumped on every [`crate::Cache::access`] call regardless of
/// outcome, miss counters only on misses, and the dirty-eviction counter
/// whenever an install overwrites a valid dirty line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of read accesses.
    pub read_access: u64,
    /// Number of write accesses.
    pub write_access: u64,
    /// Number of read accesses that missed.
    pub read_miss: u64,
    /// Number of write accesses that missed.
    pub write_miss: u64,
    /// Number of evictions of valid dirty lines (writebacks triggered).
    pub dirty_evicts: u64,
}

impl CacheStats {
    /// Read misses as a percentage of read accesses.
    ///
    /// Returns `0.0` when no read access has been recorded yet.
    pub fn read_miss_percent(&self) -> f64 {
        if self.read_access == 0 {
            0.0
        } else {
            100.0 * self.read_miss as f64 / self.read_access as f64
        }
    }

    /// Write misses as a percentage of write accesses.
    ///
    /// Returns `0.0` when no write access has been recorded yet.
    pub fn write_miss_percent(&self) -> f64 {
        if self.write_access == 0 {
            0.0
        } else {
            100.0 * self.write_miss as f64 / self.write_access as f64
        }
    }

    /// Renders the statistics report, each field prefixed by `label`.
    ///
    /// The output is a compatibility contract with external grading and
    /// analysis tooling that parses the report line by line: a leading blank
    /// line, then the five raw counters and two percentages in fixed order,
    /// with fixed field-name padding and 10-column right-aligned values.
    /// Do not change the format.
    pub fn report(&self, label: &str) -> String {
        let mut out = String::new();
        out.push('\n');
        let _ = writeln!(out, "{label}_READ_ACCESS     \t\t : {:10}", self.read_access);
        let _ = writeln!(out, "{label}_WRITE_ACCESS    \t\t : {:10}", self.write_access);
        let _ = writeln!(out, "{label}_READ_MISS       \t\t : {:10}", self.read_miss);
        let _ = writeln!(out, "{label}_WRITE_MISS      \t\t : {:10}", self.write_miss);
        let _ = writeln!(out, "{label}_READ_MISS_PERC  \t\t : {:10.3}", self.read_miss_percent());
        let _ = writeln!(out, "{label}_WRITE_MISS_PERC \t\t : {:10.3}", self.write_miss_percent());
        let _ = writeln!(out, "{label}_DIRTY_EVICTS    \t\t : {:10}", self.dirty_evicts);
        out
    }

    /// Prints the report to stdout.
    ///
    /// Convenience wrapper over [`CacheStats::report`] for drivers that dump
    /// statistics at end of run.
    pub fn print(&self, label: &str) {
        print!("{}", self.report(label));
    }
}
