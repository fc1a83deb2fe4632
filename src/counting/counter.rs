//! Memoized counting of joint completions.
//!
//! Given constraint-free hands, count the ways to complete all of them at
//! once so that no card lands in two hands. The recursion fixes the hand
//! with the fewest completions (the pivot), enumerates its completions,
//! removes each completion's cards from the remaining hands and recurses.
//! Subproblems are memoized by `Signature`, so isomorphic groups reached
//! along different paths (or in earlier queries) are counted once.

use smallvec::SmallVec;
use tracing::trace;

use crate::core::{Card, DeductionError, Result};
use crate::knowledge::HandKnowledge;

use super::cache::{MemoryCache, StateCache};
use super::combin::{Combinations, StateCount};
use super::deadline::Deadline;
use super::signature::{canonical_order, Signature, MAX_SIGNATURE_HANDS};
use super::stats::CounterStats;

/// Counts joint completions of constraint-free hands.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{Card, CardSet};
/// use clue_deduce::counting::StateCounter;
/// use clue_deduce::knowledge::HandKnowledge;
///
/// let pool = |ids: std::ops::Range<u8>| -> CardSet { ids.map(Card).collect() };
/// let hands = [
///     HandKnowledge::new(3, pool(0..6)),
///     HandKnowledge::new(2, pool(6..9)),
///     HandKnowledge::new(1, pool(9..14)),
/// ];
///
/// let mut counter = StateCounter::in_memory();
/// assert_eq!(counter.count(&hands).unwrap(), 20 * 3 * 5);
/// ```
#[derive(Debug)]
pub struct StateCounter<C: StateCache = MemoryCache> {
    cache: C,
    deadline: Deadline,
    stats: CounterStats,
}

impl StateCounter<MemoryCache> {
    /// A counter with a fresh in-memory cache.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryCache::new())
    }
}

impl Default for StateCounter<MemoryCache> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<C: StateCache> StateCounter<C> {
    /// A counter backed by `cache`.
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            deadline: Deadline::none(),
            stats: CounterStats::new(),
        }
    }

    /// Use `deadline` for subsequent queries.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Replace the deadline for subsequent queries.
    pub fn set_deadline(&mut self, deadline: Deadline) {
        self.deadline = deadline;
    }

    /// The memo table.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Mutable access to the memo table (e.g. to save it).
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Consume the counter, returning its memo table.
    pub fn into_cache(self) -> C {
        self.cache
    }

    /// Statistics since creation or the last reset.
    #[must_use]
    pub fn stats(&self) -> &CounterStats {
        &self.stats
    }

    /// Zero the statistics.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Count the joint completions of `hands`.
    ///
    /// Hands may be given in any order. The empty list has exactly one
    /// (empty) completion. Fails with `UnresolvedConstraints` if any hand
    /// still has constraints, with `CountOverflow` if the total does not fit
    /// in a `StateCount`, and with `Cancelled` if the deadline passes; a
    /// cancelled query leaves only fully computed entries in the cache.
    pub fn count(&mut self, hands: &[HandKnowledge]) -> Result<StateCount> {
        if let Some(hand) = hands.iter().find(|hand| hand.has_constraints()) {
            return Err(DeductionError::UnresolvedConstraints {
                remaining: hand.constraints().len(),
            });
        }

        self.stats.queries += 1;
        let total = self.count_resolved(hands.to_vec())?;
        trace!(hands = hands.len(), total = %total, cached = self.cache.len(), "counted states");
        Ok(total)
    }

    fn count_resolved(&mut self, mut hands: Vec<HandKnowledge>) -> Result<StateCount> {
        self.deadline.check()?;

        if hands.iter().any(HandKnowledge::is_overfull) {
            return Ok(0);
        }

        match hands.len() {
            0 => return Ok(1),
            1 => {
                self.stats.base_cases += 1;
                return hands[0].num_possible_hands();
            }
            _ => {}
        }

        canonical_order(&mut hands);
        let signature =
            (hands.len() <= MAX_SIGNATURE_HANDS).then(|| Signature::of_ordered(&hands));

        if let Some(count) = signature.as_ref().and_then(|sig| self.cache.get(sig)) {
            self.stats.cache_hits += 1;
            return Ok(count);
        }
        self.stats.cache_misses += 1;

        let rest = hands.split_off(1);
        let pivot = &hands[0];

        let mut total: StateCount = 0;
        if pivot.completion_count() > 0 {
            let pool: SmallVec<[Card; 32]> = pivot.possible_cards().iter().copied().collect();
            for taken in Combinations::new(&pool, pivot.num_unknown()) {
                self.stats.branches += 1;
                let remaining = rest.iter().map(|hand| hand.without_possible(&taken)).collect();
                let count = self.count_resolved(remaining)?;
                total = total.checked_add(count).ok_or(DeductionError::CountOverflow)?;
            }
        }

        if let Some(signature) = signature {
            self.cache.put(signature, total);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardSet;

    fn hand(size: usize, ids: std::ops::Range<u8>) -> HandKnowledge {
        let pool: CardSet = ids.map(Card).collect();
        HandKnowledge::new(size, pool)
    }

    #[test]
    fn test_empty_list_counts_one() {
        let mut counter = StateCounter::in_memory();
        assert_eq!(counter.count(&[]).unwrap(), 1);
    }

    #[test]
    fn test_single_hand_is_binomial() {
        let mut counter = StateCounter::in_memory();
        assert_eq!(counter.count(&[hand(3, 0..6)]).unwrap(), 20);
        assert_eq!(counter.stats().base_cases, 1);
        assert!(counter.cache().is_empty());
    }

    #[test]
    fn test_disjoint_hands_multiply() {
        let mut counter = StateCounter::in_memory();
        let hands = [hand(3, 0..6), hand(2, 6..9), hand(1, 9..14)];
        assert_eq!(counter.count(&hands).unwrap(), 300);
    }

    #[test]
    fn test_overlapping_hands() {
        // 3 from {0..5} and 3 from {3..8}, no card in both
        let mut counter = StateCounter::in_memory();
        let hands = [hand(3, 0..6), hand(3, 3..9)];
        assert_eq!(counter.count(&hands).unwrap(), 92);
    }

    #[test]
    fn test_impossible_pivot_counts_zero() {
        let mut counter = StateCounter::in_memory();
        let hands = [hand(3, 0..2), hand(1, 0..4)];
        assert_eq!(counter.count(&hands).unwrap(), 0);
    }

    #[test]
    fn test_rejects_constraints() {
        let mut constrained = hand(2, 0..4);
        constrained.add_constraint([Card(0), Card(1)].into_iter().collect());

        let mut counter = StateCounter::in_memory();
        let err = counter.count(&[hand(1, 4..6), constrained]).unwrap_err();
        assert!(matches!(err, DeductionError::UnresolvedConstraints { remaining: 1 }));
    }

    #[test]
    fn test_repeat_query_hits_cache() {
        let mut counter = StateCounter::in_memory();
        let hands = [hand(3, 0..6), hand(3, 3..9)];

        counter.count(&hands).unwrap();
        let misses = counter.stats().cache_misses;
        counter.reset_stats();

        assert_eq!(counter.count(&hands).unwrap(), 92);
        assert_eq!(counter.stats().cache_hits, 1);
        assert_eq!(counter.stats().cache_misses, 0);
        assert!(misses > 0);
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let pool: CardSet = (0..=254).map(Card).collect();
        let mut counter = StateCounter::in_memory();

        let err = counter.count(&[HandKnowledge::new(60, pool)]).unwrap_err();
        assert!(matches!(err, DeductionError::CountOverflow));
    }

    #[test]
    fn test_expired_deadline_cancels() {
        let mut counter =
            StateCounter::in_memory().with_deadline(Deadline::after(std::time::Duration::ZERO));
        let err = counter.count(&[hand(3, 0..6), hand(3, 3..9)]).unwrap_err();

        assert!(matches!(err, DeductionError::Cancelled));
        assert!(counter.cache().is_empty());
    }
}
