//! Partial knowledge about one hand.
//!
//! A `HandKnowledge` describes what an observer knows about one player's
//! hand (or the envelope):
//!
//! - `known_cards`: cards proven to be in the hand
//! - `possible_cards`: cards not yet excluded from the hand
//! - `constraints`: sets of which the hand holds at least one card
//!
//! Invariant: `known_cards` and `possible_cards` are disjoint. Any completion
//! of the hand is `known_cards` plus `num_unknown()` cards drawn from
//! `possible_cards`.
//!
//! All collections are `im` persistent structures, so cloning a hand for a
//! resolver or counter branch is O(1) and siblings never see each other's
//! writes.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Card, CardSet, DeductionError, Result};
use crate::counting::combin::{checked_choose, choose, Combinations, StateCount};

/// What is known about one hand.
///
/// Equality and hashing are structural over size, known cards, possible
/// cards and constraints.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{Card, CardSet};
/// use clue_deduce::knowledge::HandKnowledge;
///
/// let pool: CardSet = (0..6).map(Card).collect();
/// let mut hand = HandKnowledge::new(3, pool);
///
/// hand.add_known(Card(0));
/// assert_eq!(hand.num_unknown(), 2);
/// assert!(!hand.possible_cards().contains(&Card(0)));
///
/// // 2 more cards out of the remaining 5
/// assert_eq!(hand.num_possible_hands().unwrap(), 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandKnowledge {
    hand_size: usize,
    known_cards: CardSet,
    possible_cards: CardSet,
    constraints: Vector<CardSet>,
}

impl HandKnowledge {
    /// A hand of `hand_size` cards drawn from `possible_cards`.
    #[must_use]
    pub fn new(hand_size: usize, possible_cards: CardSet) -> Self {
        Self {
            hand_size,
            known_cards: CardSet::new(),
            possible_cards,
            constraints: Vector::new(),
        }
    }

    /// A hand with some cards already known.
    ///
    /// Known cards are removed from the possible set.
    #[must_use]
    pub fn with_known(hand_size: usize, known_cards: CardSet, possible_cards: CardSet) -> Self {
        let possible_cards = possible_cards.relative_complement(known_cards.clone());
        Self {
            hand_size,
            known_cards,
            possible_cards,
            constraints: Vector::new(),
        }
    }

    /// A fully specified hand: exactly these cards, nothing possible.
    #[must_use]
    pub fn complete(cards: CardSet) -> Self {
        Self::with_known(cards.len(), cards, CardSet::new())
    }

    /// Number of cards in the hand.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    /// Cards proven to be in the hand.
    #[must_use]
    pub fn known_cards(&self) -> &CardSet {
        &self.known_cards
    }

    /// Cards not yet excluded from the hand.
    #[must_use]
    pub fn possible_cards(&self) -> &CardSet {
        &self.possible_cards
    }

    /// Pending "at least one of" constraints, oldest first.
    #[must_use]
    pub fn constraints(&self) -> &Vector<CardSet> {
        &self.constraints
    }

    /// Check if any constraint is still pending.
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Slots not yet filled by a known card.
    #[must_use]
    pub fn num_unknown(&self) -> usize {
        self.hand_size.saturating_sub(self.known_cards.len())
    }

    /// True if more cards are known than the hand can hold.
    ///
    /// Only reachable through inconsistent observations; such a hand has no
    /// completions.
    #[must_use]
    pub fn is_overfull(&self) -> bool {
        self.known_cards.len() > self.hand_size
    }

    /// True when every slot is filled by a known card.
    #[must_use]
    pub fn is_fully_known(&self) -> bool {
        self.known_cards.len() == self.hand_size
    }

    /// Mark a card as held by this hand.
    pub fn add_known(&mut self, card: Card) {
        self.known_cards.insert(card);
        self.possible_cards.remove(&card);
    }

    /// Exclude a card from this hand.
    pub fn remove_possible(&mut self, card: Card) {
        self.possible_cards.remove(&card);
    }

    /// Exclude several cards from this hand.
    pub fn remove_possible_all<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) {
        for card in cards {
            self.possible_cards.remove(card);
        }
    }

    /// A copy of this hand with `cards` excluded.
    #[must_use]
    pub fn without_possible(&self, cards: &[Card]) -> Self {
        let mut hand = self.clone();
        hand.remove_possible_all(cards);
        hand
    }

    /// Record that the hand holds at least one card of `constraint`.
    pub fn add_constraint(&mut self, constraint: CardSet) {
        self.constraints.push_back(constraint);
    }

    /// Remove and return the most recently added constraint.
    pub(crate) fn pop_constraint(&mut self) -> Option<CardSet> {
        self.constraints.pop_back()
    }

    /// Number of completions ignoring constraints: C(|possible|, unknown),
    /// saturating at `StateCount::MAX`.
    ///
    /// Used to order hands; prefer `num_possible_hands` when constraints
    /// must be respected.
    #[must_use]
    pub fn completion_count(&self) -> StateCount {
        if self.is_overfull() {
            return 0;
        }
        choose(self.possible_cards.len(), self.num_unknown())
    }

    /// Number of completions of a constraint-free hand.
    ///
    /// Fails with `UnresolvedConstraints` if constraints remain, since
    /// counting those requires resolving them first, and with
    /// `CountOverflow` if the count does not fit.
    pub fn num_possible_hands(&self) -> Result<StateCount> {
        if self.has_constraints() {
            return Err(DeductionError::UnresolvedConstraints {
                remaining: self.constraints.len(),
            });
        }
        if self.is_overfull() {
            return Ok(0);
        }
        checked_choose(self.possible_cards.len(), self.num_unknown())
            .ok_or(DeductionError::CountOverflow)
    }

    /// Check whether a full hand meets every constraint.
    #[must_use]
    pub fn satisfies_constraints(&self, cards: &CardSet) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.iter().any(|card| cards.contains(card)))
    }

    /// Enumerate every full hand consistent with this knowledge.
    ///
    /// Brute force over C(|possible|, unknown) completions, filtered by the
    /// constraints. Results follow lexicographic card order.
    #[must_use]
    pub fn possible_hands(&self) -> Vec<CardSet> {
        if self.is_overfull() {
            return Vec::new();
        }
        let pool: Vec<Card> = self.possible_cards.iter().copied().collect();
        Combinations::new(&pool, self.num_unknown())
            .map(|extra| {
                let mut cards = self.known_cards.clone();
                cards.extend(extra);
                cards
            })
            .filter(|cards| self.satisfies_constraints(cards))
            .collect()
    }
}
