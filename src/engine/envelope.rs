//! Envelope probability engine.
//!
//! For every envelope hand still consistent with the observer's knowledge,
//! count the complete deals of the other players' hands that go with it.
//! Counts are proportional to the posterior probability of each candidate
//! under a uniform deal; a count of 0 means the candidate is impossible.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Card, CardSet, CardUniverse, DeductionError, Guess, Result};
use crate::counting::{MemoryCache, StateCache, StateCount, StateCounter};
use crate::knowledge::{enumerate_global_states, resolve, HandKnowledge};

/// A fully specified envelope hand.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Candidate(CardSet);

impl Candidate {
    /// Wrap a set of cards.
    #[must_use]
    pub fn new(cards: CardSet) -> Self {
        Self(cards)
    }

    /// The envelope's cards.
    #[must_use]
    pub fn cards(&self) -> &CardSet {
        &self.0
    }

    /// Check whether the candidate holds `card`.
    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.0.contains(&card)
    }

    /// Read the candidate as a suspect/weapon/room triple.
    #[must_use]
    pub fn to_guess(&self, universe: &CardUniverse) -> Option<Guess> {
        universe.guess_from(&self.0)
    }
}

impl FromIterator<Card> for Candidate {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Guess> for Candidate {
    fn from(guess: Guess) -> Self {
        Self(guess.to_set())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, card) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", card.index())?;
        }
        write!(f, "}}")
    }
}

/// Candidate → consistent-state count, in candidate order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeCounts {
    counts: BTreeMap<Candidate, StateCount>,
}

impl EnvelopeCounts {
    /// Number of candidates (including impossible ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if there are no candidates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for a candidate, `None` if it was never a candidate.
    #[must_use]
    pub fn get(&self, candidate: &Candidate) -> Option<StateCount> {
        self.counts.get(candidate).copied()
    }

    /// Count for a set of cards; 0 if it is not a candidate.
    #[must_use]
    pub fn count_for(&self, cards: &CardSet) -> StateCount {
        self.counts.get(&Candidate::new(cards.clone())).copied().unwrap_or(0)
    }

    /// All candidates with their counts, in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = (&Candidate, StateCount)> {
        self.counts.iter().map(|(candidate, &count)| (candidate, count))
    }

    /// Sum of all counts: every consistent complete deal.
    #[must_use]
    pub fn total(&self) -> StateCount {
        self.counts.values().sum()
    }

    /// Candidates that are still possible.
    pub fn nonzero(&self) -> impl Iterator<Item = (&Candidate, StateCount)> {
        self.iter().filter(|&(_, count)| count > 0)
    }

    /// Highest-count candidate, earliest on ties. `None` if all are 0.
    #[must_use]
    pub fn best(&self) -> Option<(&Candidate, StateCount)> {
        let mut best: Option<(&Candidate, StateCount)> = None;
        for (candidate, count) in self.nonzero() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((candidate, count));
            }
        }
        best
    }

    /// The only possible candidate, if exactly one remains.
    #[must_use]
    pub fn unique(&self) -> Option<&Candidate> {
        let mut possible = self.nonzero();
        let (candidate, _) = possible.next()?;
        possible.next().is_none().then_some(candidate)
    }

    /// Per card, the summed count of candidates containing it.
    ///
    /// Dividing by `total()` gives the probability that the card is in the
    /// envelope.
    #[must_use]
    pub fn card_marginals(&self) -> BTreeMap<Card, StateCount> {
        let mut marginals = BTreeMap::new();
        for (candidate, count) in self.iter() {
            for &card in candidate.cards() {
                *marginals.entry(card).or_default() += count;
            }
        }
        marginals
    }
}

impl FromIterator<(Candidate, StateCount)> for EnvelopeCounts {
    fn from_iter<I: IntoIterator<Item = (Candidate, StateCount)>>(iter: I) -> Self {
        Self { counts: iter.into_iter().collect() }
    }
}

/// Every complete envelope hand consistent with `envelope`.
///
/// The envelope is resolved and each partition expanded to its full hands.
/// Partitions are disjoint, so no candidate appears twice.
#[must_use]
pub fn envelope_candidates(envelope: &HandKnowledge) -> Vec<Candidate> {
    resolve(envelope)
        .iter()
        .flat_map(HandKnowledge::possible_hands)
        .map(Candidate::new)
        .collect()
}

/// Counts consistent deals per envelope candidate.
///
/// The other players' hands are resolved and combined once per query. For
/// each candidate, combinations in which some player is known to hold a
/// candidate card are dropped, and the survivors are counted with the
/// candidate's cards removed from every pool. This is the same set of
/// combinations as resolving the hands after removing the candidate's
/// cards.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{Card, CardSet};
/// use clue_deduce::engine::EnvelopeProbabilityEngine;
/// use clue_deduce::knowledge::HandKnowledge;
///
/// let all: CardSet = (0..6).map(Card).collect();
/// let mut envelope = HandKnowledge::new(2, all.clone());
/// envelope.add_constraint([Card(0), Card(1), Card(2)].into_iter().collect());
/// envelope.add_constraint([Card(3), Card(4), Card(5)].into_iter().collect());
///
/// let mut others = vec![HandKnowledge::new(2, all.clone()), HandKnowledge::new(2, all)];
/// others[0].add_known(Card(0));
///
/// let mut engine = EnvelopeProbabilityEngine::in_memory();
/// let counts = engine.count(&envelope, &others).unwrap();
///
/// assert_eq!(counts.len(), 9);
/// assert_eq!(counts.count_for(&[Card(0), Card(3)].into_iter().collect()), 0);
/// assert_eq!(counts.count_for(&[Card(1), Card(3)].into_iter().collect()), 3);
/// ```
#[derive(Debug)]
pub struct EnvelopeProbabilityEngine<C: StateCache = MemoryCache> {
    counter: StateCounter<C>,
}

impl EnvelopeProbabilityEngine<MemoryCache> {
    /// An engine with a fresh in-memory cache.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(StateCounter::in_memory())
    }
}

impl Default for EnvelopeProbabilityEngine<MemoryCache> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<C: StateCache> EnvelopeProbabilityEngine<C> {
    /// An engine counting with `counter`.
    pub fn new(counter: StateCounter<C>) -> Self {
        Self { counter }
    }

    /// The underlying counter.
    #[must_use]
    pub fn counter(&self) -> &StateCounter<C> {
        &self.counter
    }

    /// Mutable access to the counter (deadline, cache persistence).
    pub fn counter_mut(&mut self) -> &mut StateCounter<C> {
        &mut self.counter
    }

    /// Consume the engine, returning its counter.
    pub fn into_counter(self) -> StateCounter<C> {
        self.counter
    }

    /// Count consistent deals for every envelope candidate.
    ///
    /// `envelope` carries the one-per-category constraints; `others` are
    /// the hands of every player (including the observer's own, fully
    /// known hand).
    pub fn count(
        &mut self,
        envelope: &HandKnowledge,
        others: &[HandKnowledge],
    ) -> Result<EnvelopeCounts> {
        let started = Instant::now();
        let candidates = envelope_candidates(envelope);
        let states = enumerate_global_states(others);

        let mut counts = BTreeMap::new();
        for candidate in candidates {
            let cards: SmallVec<[Card; 4]> = candidate.cards().iter().copied().collect();

            let mut total: StateCount = 0;
            for state in &states {
                let collides = state
                    .iter()
                    .any(|hand| cards.iter().any(|card| hand.known_cards().contains(card)));
                if collides {
                    continue;
                }
                let hands: Vec<HandKnowledge> =
                    state.iter().map(|hand| hand.without_possible(&cards)).collect();
                let count = self.counter.count(&hands)?;
                total = total.checked_add(count).ok_or(DeductionError::CountOverflow)?;
            }
            counts.insert(candidate, total);
        }

        let counts = EnvelopeCounts { counts };
        debug!(
            candidates = counts.len(),
            possible = counts.nonzero().count(),
            global_states = states.len(),
            cached = self.counter.cache().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "envelope query"
        );
        Ok(counts)
    }
}
