//! Counter statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected by a `StateCounter`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterStats {
    /// Top-level `count` calls.
    pub queries: u64,

    /// Subproblems answered from the cache.
    pub cache_hits: u64,

    /// Subproblems computed combinatorially and then cached.
    pub cache_misses: u64,

    /// Single-hand subproblems answered by a binomial coefficient.
    pub base_cases: u64,

    /// Pivot-hand completions enumerated across all misses.
    pub branches: u64,
}

impl CounterStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of cacheable subproblems served from the cache.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CounterStats::new();
        assert_eq!(stats.queries, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CounterStats::new();
        stats.cache_hits = 3;
        stats.cache_misses = 1;
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = CounterStats::new();
        stats.queries = 10;
        stats.branches = 400;

        stats.reset();

        assert_eq!(stats, CounterStats::default());
    }
}
