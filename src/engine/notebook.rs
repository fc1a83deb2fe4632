//! The observer's notebook: game events in, envelope counts out.
//!
//! A `Notebook` keeps one `HandKnowledge` per player plus one for the
//! envelope, applies the events the game reports to them, and answers the
//! strategy questions (what to guess next, whether to accuse) through an
//! `EnvelopeProbabilityEngine`.
//!
//! Every hand starts with the whole universe as possible. The envelope also
//! gets one "at least one of" constraint per category, which together with
//! its size of 3 means exactly one card per category.

use std::time::Duration;

use tracing::{debug, trace};

use crate::core::{
    Card, CardUniverse, Category, CounterConfig, DeductionError, Guess, PlayerId, PlayerMap,
    Response, Result, TurnRecord,
};
use crate::counting::{Deadline, DurableCache, MemoryCache, StateCache, StateCounter};
use crate::knowledge::HandKnowledge;

use super::envelope::{EnvelopeCounts, EnvelopeProbabilityEngine};

/// Everything one player has deduced so far.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{CardUniverse, PlayerId};
/// use clue_deduce::engine::Notebook;
///
/// let universe = CardUniverse::new(2, 2, 2);
/// let me = PlayerId::new(0);
/// let mut notebook = Notebook::new(universe.clone(), me, 3);
///
/// // seat 0 holds suspect 1; the envelope cannot
/// notebook.dealt(universe.find("Suspect 1").unwrap());
///
/// let guess = notebook.best_guess().unwrap();
/// assert_eq!(universe.name(guess.suspect), Some("Suspect 2"));
/// ```
#[derive(Debug)]
pub struct Notebook<C: StateCache = MemoryCache> {
    universe: CardUniverse,
    me: PlayerId,
    envelope: HandKnowledge,
    hands: PlayerMap<HandKnowledge>,
    engine: EnvelopeProbabilityEngine<C>,
    time_limit: Option<Duration>,
}

impl Notebook<MemoryCache> {
    /// A notebook for seat `me` in a game of `player_count`, with its own
    /// in-memory cache.
    #[must_use]
    pub fn new(universe: CardUniverse, me: PlayerId, player_count: usize) -> Self {
        Self::with_engine(universe, me, player_count, EnvelopeProbabilityEngine::in_memory())
    }
}

impl Notebook<DurableCache> {
    /// A notebook counting with the cache file and time limit of `config`.
    ///
    /// Returns `None` when `config` names no cache file.
    #[must_use]
    pub fn from_config(
        universe: CardUniverse,
        me: PlayerId,
        player_count: usize,
        config: &CounterConfig,
    ) -> Option<Self> {
        let cache = DurableCache::from_config(config)?;
        let engine = EnvelopeProbabilityEngine::new(StateCounter::new(cache));
        let notebook = Self::with_engine(universe, me, player_count, engine);
        Some(notebook.with_time_limit(config.time_limit))
    }
}

impl<C: StateCache> Notebook<C> {
    /// A notebook counting with `engine` (e.g. one backed by a durable cache).
    pub fn with_engine(
        universe: CardUniverse,
        me: PlayerId,
        player_count: usize,
        engine: EnvelopeProbabilityEngine<C>,
    ) -> Self {
        assert!(me.index() < player_count, "Observer must be seated in the game");

        let all = universe.all_cards();
        let sizes = universe.hand_sizes(player_count);
        let hands = PlayerMap::new(player_count, |player| {
            HandKnowledge::new(sizes[player.index()], all.clone())
        });

        let mut envelope = HandKnowledge::new(Category::ALL.len(), all);
        for category in Category::ALL {
            envelope.add_constraint(universe.category_set(category));
        }

        Self {
            universe,
            me,
            envelope,
            hands,
            engine,
            time_limit: None,
        }
    }

    /// Bound each envelope query by a wall-clock limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// The observer's seat.
    #[must_use]
    pub fn me(&self) -> PlayerId {
        self.me
    }

    /// The card catalogue.
    #[must_use]
    pub fn universe(&self) -> &CardUniverse {
        &self.universe
    }

    /// What is known about the envelope.
    #[must_use]
    pub fn envelope(&self) -> &HandKnowledge {
        &self.envelope
    }

    /// What is known about a player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &HandKnowledge {
        self.hands.get(player)
    }

    /// The counting engine.
    #[must_use]
    pub fn engine(&self) -> &EnvelopeProbabilityEngine<C> {
        &self.engine
    }

    /// Mutable access to the counting engine (e.g. to save its cache).
    pub fn engine_mut(&mut self) -> &mut EnvelopeProbabilityEngine<C> {
        &mut self.engine
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// The observer was dealt `card`.
    pub fn dealt(&mut self, card: Card) {
        self.mark_holder(self.me, card);
    }

    /// `player` showed `card` to the observer.
    pub fn revealed_to_me(&mut self, player: PlayerId, card: Card) {
        self.mark_holder(player, card);
    }

    /// `player` disproved `guess`, but the card was shown to someone else.
    pub fn revealed_but_concealed(&mut self, player: PlayerId, guess: &Guess) {
        self.hands.get_mut(player).add_constraint(guess.to_set());
    }

    /// `player` holds none of the cards in `guess`.
    pub fn could_not_disprove(&mut self, player: PlayerId, guess: &Guess) {
        let hand = self.hands.get_mut(player);
        for card in guess.cards() {
            hand.remove_possible(card);
        }
    }

    /// Nobody disproved `player`'s own guess and they did not accuse, so
    /// they hold at least one of its cards.
    pub fn implicit_holder(&mut self, player: PlayerId, guess: &Guess) {
        self.hands.get_mut(player).add_constraint(guess.to_set());
    }

    /// Apply a whole turn as seen by the observer.
    ///
    /// Each response becomes one event. When every responder failed and the
    /// guesser is someone else, the guesser is taken to hold one of the
    /// guessed cards.
    pub fn observe_turn(&mut self, record: &TurnRecord) {
        for &(player, response) in &record.responses {
            match response {
                Response::CouldNotDisprove => self.could_not_disprove(player, &record.guess),
                Response::Shown(card) => self.revealed_to_me(player, card),
                Response::Concealed => self.revealed_but_concealed(player, &record.guess),
            }
        }

        if record.undisproved() && record.guesser != self.me {
            self.implicit_holder(record.guesser, &record.guess);
        }
        trace!(guesser = %record.guesser, guess = %record.guess, "observed turn");
    }

    fn mark_holder(&mut self, player: PlayerId, card: Card) {
        for (seat, hand) in self.hands.iter_mut() {
            if seat == player {
                hand.add_known(card);
            } else {
                hand.remove_possible(card);
            }
        }
        self.envelope.remove_possible(card);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Count consistent deals for every envelope candidate.
    pub fn envelope_counts(&mut self) -> Result<EnvelopeCounts> {
        self.engine.counter_mut().set_deadline(Deadline::from_limit(self.time_limit));
        let counts = self.engine.count(&self.envelope, self.hands.as_slice());
        self.engine.counter_mut().set_deadline(Deadline::none());
        counts
    }

    /// The most likely envelope, as the next guess.
    ///
    /// Fails with `NoCandidates` if the observations admit no envelope.
    pub fn best_guess(&mut self) -> Result<Guess> {
        let counts = self.envelope_counts()?;
        let (candidate, count) = counts.best().ok_or(DeductionError::NoCandidates)?;
        debug!(
            seat = %self.me,
            candidate = %candidate,
            count = %count,
            total = %counts.total(),
            "best guess"
        );

        candidate.to_guess(&self.universe).ok_or_else(|| {
            let reason = format!("candidate {candidate} is not one card per category");
            DeductionError::InvalidGuess(reason)
        })
    }

    /// The envelope, if the observations pin it down.
    pub fn ready_to_accuse(&mut self) -> Result<Option<Guess>> {
        let counts = self.envelope_counts()?;
        Ok(counts.unique().and_then(|candidate| candidate.to_guess(&self.universe)))
    }
}
