//! Players of the deduction game.
//!
//! The controller only talks to players through the `Detective` trait:
//! receive cards, guess, disprove, observe turns, accuse.

use tracing::warn;

use crate::core::{
    Card, CardSet, CardUniverse, Category, GameRng, Guess, PlayerId, PlayerMap, Response,
    TurnRecord,
};
use crate::counting::{MemoryCache, StateCache};
use crate::engine::Notebook;

/// A seat at the table.
///
/// ## Implementation Notes
///
/// - `make_guess`: should name one card per category
/// - `disprove`: must return a card that is both held and guessed, or
///   `None` if there is none
/// - `observe`: receives every turn; the shown card is only visible when
///   this detective was the guesser
/// - `accusation`: asked right after the detective's own turn
pub trait Detective {
    /// This detective's seat.
    fn seat(&self) -> PlayerId;

    /// A card dealt at setup.
    fn receive_card(&mut self, card: Card);

    /// Called once every card has been dealt.
    fn setup_complete(&mut self) {}

    /// Cards dealt to this detective.
    fn held_cards(&self) -> &CardSet;

    /// The guess for this turn.
    fn make_guess(&mut self, rng: &mut GameRng) -> Guess;

    /// Answer another player's guess.
    ///
    /// Default shows the first held card in suspect, weapon, room order.
    fn disprove(&self, guess: &Guess) -> Option<Card> {
        guess.cards().into_iter().find(|card| self.held_cards().contains(card))
    }

    /// Learn from a completed turn.
    fn observe(&mut self, record: &TurnRecord);

    /// The accusation to make now, if any.
    fn accusation(&mut self) -> Option<Guess>;
}

/// Pick one card per category, avoiding `excluded` where possible.
fn random_guess(universe: &CardUniverse, excluded: &CardSet, rng: &mut GameRng) -> Guess {
    let mut pick = |category: Category| -> Card {
        let open: Vec<Card> = universe
            .cards_in(category)
            .filter(|card| !excluded.contains(card))
            .collect();
        let pool = if open.is_empty() { universe.cards_in(category).collect() } else { open };
        // categories are never empty, so the pool is not either
        pool[rng.gen_range_usize(0..pool.len())]
    };
    let suspect = pick(Category::Suspect);
    let weapon = pick(Category::Weapon);
    let room = pick(Category::Room);
    Guess::new(suspect, weapon, room)
}

// =============================================================================
// RandomDetective
// =============================================================================

/// Guesses at random among cards it has neither been dealt nor been shown,
/// and accuses when nobody can disprove its guess.
#[derive(Clone, Debug)]
pub struct RandomDetective {
    seat: PlayerId,
    universe: CardUniverse,
    held: CardSet,
    seen: CardSet,
    accusation: Option<Guess>,
}

impl RandomDetective {
    /// Create a detective for `seat`.
    pub fn new(universe: CardUniverse, seat: PlayerId) -> Self {
        Self {
            seat,
            universe,
            held: CardSet::new(),
            seen: CardSet::new(),
            accusation: None,
        }
    }

    /// Cards other players have shown this detective.
    pub fn seen_cards(&self) -> &CardSet {
        &self.seen
    }
}

impl Detective for RandomDetective {
    fn seat(&self) -> PlayerId {
        self.seat
    }

    fn receive_card(&mut self, card: Card) {
        self.held.insert(card);
    }

    fn held_cards(&self) -> &CardSet {
        &self.held
    }

    fn make_guess(&mut self, rng: &mut GameRng) -> Guess {
        let excluded = self.held.clone().union(self.seen.clone());
        random_guess(&self.universe, &excluded, rng)
    }

    fn observe(&mut self, record: &TurnRecord) {
        if record.guesser != self.seat {
            return;
        }
        for &(_, response) in &record.responses {
            if let Response::Shown(card) = response {
                self.seen.insert(card);
            }
        }
        let holds_guessed = record.guess.cards().iter().any(|card| self.held.contains(card));
        if record.undisproved() && !holds_guessed {
            self.accusation = Some(record.guess);
        }
    }

    fn accusation(&mut self) -> Option<Guess> {
        self.accusation
    }
}

// =============================================================================
// ParticipantDetective
// =============================================================================

/// Guesses any card of each category at random and never accuses.
///
/// Fills a seat without competing for the win.
#[derive(Clone, Debug)]
pub struct ParticipantDetective {
    seat: PlayerId,
    universe: CardUniverse,
    held: CardSet,
}

impl ParticipantDetective {
    /// Create a detective for `seat`.
    pub fn new(universe: CardUniverse, seat: PlayerId) -> Self {
        Self {
            seat,
            universe,
            held: CardSet::new(),
        }
    }
}

impl Detective for ParticipantDetective {
    fn seat(&self) -> PlayerId {
        self.seat
    }

    fn receive_card(&mut self, card: Card) {
        self.held.insert(card);
    }

    fn held_cards(&self) -> &CardSet {
        &self.held
    }

    fn make_guess(&mut self, rng: &mut GameRng) -> Guess {
        random_guess(&self.universe, &CardSet::new(), rng)
    }

    fn observe(&mut self, _record: &TurnRecord) {}

    fn accusation(&mut self) -> Option<Guess> {
        None
    }
}

// =============================================================================
// FrequencyDetective
// =============================================================================

/// Keeps a per-card estimate of who holds it and guesses the cards most
/// likely to be in the envelope.
///
/// A card starts split evenly between every player and the envelope. Seeing
/// a card shown pins it to that player; seeing a player fail to disprove
/// drops that player and re-splits the card evenly over whoever is left.
/// Accuses when its own guess goes undisproved, or once every category has
/// a card that no player can hold.
#[derive(Clone, Debug)]
pub struct FrequencyDetective {
    seat: PlayerId,
    universe: CardUniverse,
    held: CardSet,
    holders: Vec<PlayerMap<f64>>,
    accusation: Option<Guess>,
}

impl FrequencyDetective {
    /// Create a detective for `seat` in a game of `player_count`.
    pub fn new(universe: CardUniverse, seat: PlayerId, player_count: usize) -> Self {
        let share = 1.0 / (player_count + 1) as f64;
        let holders = vec![PlayerMap::with_value(player_count, share); universe.len()];
        Self {
            seat,
            universe,
            held: CardSet::new(),
            holders,
            accusation: None,
        }
    }

    /// Estimated chance that `card` is in the envelope.
    #[must_use]
    pub fn envelope_odds(&self, card: Card) -> f64 {
        1.0 - self.holders[card.index()].as_slice().iter().sum::<f64>()
    }

    fn mark_holder(&mut self, player: PlayerId, card: Card) {
        for (seat, odds) in self.holders[card.index()].iter_mut() {
            *odds = if seat == player { 1.0 } else { 0.0 };
        }
    }

    fn mark_not_holder(&mut self, player: PlayerId, card: Card) {
        let holders = &mut self.holders[card.index()];
        holders[player] = 0.0;
        if holders.as_slice().iter().any(|&odds| odds >= 1.0) {
            return;
        }

        let open = holders.as_slice().iter().filter(|&&odds| odds > 0.0).count();
        let share = 1.0 / (open + 1) as f64;
        for (_, odds) in holders.iter_mut() {
            if *odds > 0.0 {
                *odds = share;
            }
        }
    }

    /// The category's card most likely to be in the envelope; the earliest
    /// card wins ties.
    fn likeliest(&self, category: Category) -> Option<(Card, f64)> {
        self.universe
            .cards_in(category)
            .map(|card| (card, self.envelope_odds(card)))
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
    }

    fn likeliest_guess(&self) -> Option<(Guess, f64)> {
        let (suspect, s) = self.likeliest(Category::Suspect)?;
        let (weapon, w) = self.likeliest(Category::Weapon)?;
        let (room, r) = self.likeliest(Category::Room)?;
        Some((Guess::new(suspect, weapon, room), s.min(w).min(r)))
    }
}

impl Detective for FrequencyDetective {
    fn seat(&self) -> PlayerId {
        self.seat
    }

    fn receive_card(&mut self, card: Card) {
        self.held.insert(card);
        self.mark_holder(self.seat, card);
    }

    fn setup_complete(&mut self) {
        let others: Vec<Card> =
            self.universe.cards().filter(|card| !self.held.contains(card)).collect();
        for card in others {
            self.mark_not_holder(self.seat, card);
        }
    }

    fn held_cards(&self) -> &CardSet {
        &self.held
    }

    fn make_guess(&mut self, rng: &mut GameRng) -> Guess {
        match self.likeliest_guess() {
            Some((guess, _)) => guess,
            None => random_guess(&self.universe, &self.held, rng),
        }
    }

    fn observe(&mut self, record: &TurnRecord) {
        let holds_guessed = record.guess.cards().iter().any(|card| self.held.contains(card));
        if record.guesser == self.seat && record.undisproved() && !holds_guessed {
            self.accusation = Some(record.guess);
        }

        for &(player, response) in &record.responses {
            match response {
                Response::CouldNotDisprove => {
                    for card in record.guess.cards() {
                        self.mark_not_holder(player, card);
                    }
                }
                Response::Shown(card) => self.mark_holder(player, card),
                Response::Concealed => {}
            }
        }

        if self.accusation.is_none() {
            if let Some((guess, odds)) = self.likeliest_guess() {
                if odds >= 1.0 {
                    self.accusation = Some(guess);
                }
            }
        }
    }

    fn accusation(&mut self) -> Option<Guess> {
        self.accusation
    }
}

// =============================================================================
// DeductiveDetective
// =============================================================================

/// Guesses the most likely envelope and accuses once it is certain.
///
/// Keeps a `Notebook` of every turn. If a query fails (cancelled, or the
/// observations became contradictory) it logs a warning and falls back to
/// a random guess.
#[derive(Debug)]
pub struct DeductiveDetective<C: StateCache = MemoryCache> {
    seat: PlayerId,
    held: CardSet,
    notebook: Notebook<C>,
    accusation: Option<Guess>,
}

impl DeductiveDetective<MemoryCache> {
    /// Create a detective for `seat` in a game of `player_count`.
    pub fn new(universe: CardUniverse, seat: PlayerId, player_count: usize) -> Self {
        Self::with_notebook(Notebook::new(universe, seat, player_count))
    }
}

impl<C: StateCache> DeductiveDetective<C> {
    /// Create a detective around an existing notebook.
    pub fn with_notebook(notebook: Notebook<C>) -> Self {
        Self {
            seat: notebook.me(),
            held: CardSet::new(),
            notebook,
            accusation: None,
        }
    }

    /// The detective's deductions so far.
    pub fn notebook(&self) -> &Notebook<C> {
        &self.notebook
    }

    /// Mutable access to the notebook (e.g. to save its cache).
    pub fn notebook_mut(&mut self) -> &mut Notebook<C> {
        &mut self.notebook
    }
}

impl<C: StateCache> Detective for DeductiveDetective<C> {
    fn seat(&self) -> PlayerId {
        self.seat
    }

    fn receive_card(&mut self, card: Card) {
        self.held.insert(card);
        self.notebook.dealt(card);
    }

    fn held_cards(&self) -> &CardSet {
        &self.held
    }

    fn make_guess(&mut self, rng: &mut GameRng) -> Guess {
        match self.notebook.best_guess() {
            Ok(guess) => guess,
            Err(err) => {
                warn!(seat = %self.seat, error = %err, "deduction failed, guessing at random");
                random_guess(self.notebook.universe(), &self.held, rng)
            }
        }
    }

    fn observe(&mut self, record: &TurnRecord) {
        self.notebook.observe_turn(record);
        if record.guesser != self.seat {
            return;
        }
        match self.notebook.ready_to_accuse() {
            Ok(accusation) => self.accusation = accusation,
            Err(err) => warn!(seat = %self.seat, error = %err, "could not check for an accusation"),
        }
    }

    fn accusation(&mut self) -> Option<Guess> {
        self.accusation
    }
}
