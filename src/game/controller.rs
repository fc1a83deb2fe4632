//! Game controller: deal, run turns, check accusations.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{
    Card, CardSet, CardUniverse, Category, GameConfig, GameRng, Guess, PlayerId, PlayerMap,
    Response, TurnRecord,
};

use super::detective::Detective;

/// Draw the envelope and deal the rest of the deck.
///
/// One card per category goes to the envelope; the remaining cards are
/// shuffled and dealt round-robin starting at seat 0, so hand sizes match
/// `CardUniverse::hand_sizes`.
pub fn deal(
    universe: &CardUniverse,
    player_count: usize,
    rng: &mut GameRng,
) -> (Guess, PlayerMap<CardSet>) {
    let mut draw = |category: Category| -> Card {
        let cards: Vec<Card> = universe.cards_in(category).collect();
        cards[rng.gen_range_usize(0..cards.len())]
    };
    let suspect = draw(Category::Suspect);
    let weapon = draw(Category::Weapon);
    let room = draw(Category::Room);
    let solution = Guess::new(suspect, weapon, room);

    let mut deck: Vec<Card> = universe.cards().filter(|&card| !solution.contains(card)).collect();
    rng.shuffle(&mut deck);

    let mut hands = PlayerMap::with_value(player_count, CardSet::new());
    for (i, card) in deck.into_iter().enumerate() {
        hands[PlayerId::new((i % player_count) as u8)].insert(card);
    }
    (solution, hands)
}

/// An accusation and whether it was right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accusation {
    pub player: PlayerId,
    pub guess: Guess,
    pub correct: bool,
}

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// The player who accused correctly, `None` if the round limit hit first.
    pub winner: Option<PlayerId>,
    /// Rounds played, including the winning one.
    pub rounds: u32,
    /// Turns played.
    pub turns: u32,
}

/// Runs one game between a set of detectives.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{CardUniverse, GameConfig, PlayerId};
/// use clue_deduce::game::{ClueGame, Detective, RandomDetective};
///
/// let universe = CardUniverse::classic();
/// let config = GameConfig::new(3).with_seed(42);
/// let detectives: Vec<Box<dyn Detective>> = (0..3)
///     .map(|seat| {
///         let detective = RandomDetective::new(universe.clone(), PlayerId::new(seat));
///         Box::new(detective) as Box<dyn Detective>
///     })
///     .collect();
///
/// let mut game = ClueGame::new(universe, config, detectives);
/// let outcome = game.run();
/// assert_eq!(outcome.winner.is_some(), game.accusations().iter().any(|a| a.correct));
/// ```
pub struct ClueGame {
    config: GameConfig,
    universe: CardUniverse,
    solution: Guess,
    hands: PlayerMap<CardSet>,
    detectives: Vec<Box<dyn Detective>>,
    seat_rngs: PlayerMap<GameRng>,
    history: Vec<TurnRecord>,
    accusations: Vec<Accusation>,
    turns: u32,
}

impl ClueGame {
    /// Deal a new game and hand every detective its cards.
    ///
    /// `detectives[i]` plays seat `i`. Each seat guesses from its own fork
    /// of the dealer's RNG.
    pub fn new(
        universe: CardUniverse,
        config: GameConfig,
        mut detectives: Vec<Box<dyn Detective>>,
    ) -> Self {
        assert_eq!(detectives.len(), config.player_count, "Need one detective per seat");
        assert!(
            universe.len() >= Category::ALL.len() + config.player_count,
            "Not enough cards to deal every player one"
        );

        let mut rng = GameRng::new(config.seed);
        let (solution, hands) = deal(&universe, config.player_count, &mut rng);
        let seat_rngs = PlayerMap::new(config.player_count, |_| rng.fork());

        for (seat, detective) in detectives.iter_mut().enumerate() {
            debug_assert_eq!(detective.seat().index(), seat);
            for &card in hands.get(PlayerId::new(seat as u8)) {
                detective.receive_card(card);
            }
        }
        for detective in &mut detectives {
            detective.setup_complete();
        }
        debug!(players = config.player_count, seed = config.seed, "dealt new game");

        Self {
            config,
            universe,
            solution,
            hands,
            detectives,
            seat_rngs,
            history: Vec::new(),
            accusations: Vec::new(),
            turns: 0,
        }
    }

    /// The envelope.
    #[must_use]
    pub fn solution(&self) -> Guess {
        self.solution
    }

    /// A player's dealt cards.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &CardSet {
        self.hands.get(player)
    }

    /// The card catalogue.
    #[must_use]
    pub fn universe(&self) -> &CardUniverse {
        &self.universe
    }

    /// Every turn so far, with the shown cards visible.
    #[must_use]
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Every accusation so far.
    #[must_use]
    pub fn accusations(&self) -> &[Accusation] {
        &self.accusations
    }

    /// The detective in a seat.
    #[must_use]
    pub fn detective(&self, player: PlayerId) -> &dyn Detective {
        self.detectives[player.index()].as_ref()
    }

    /// Play one turn for `player`. Returns true if they accused correctly.
    ///
    /// An invalid guess or accusation is logged and skipped.
    pub fn run_turn(&mut self, player: PlayerId) -> bool {
        self.turns += 1;
        let guess = self.detectives[player.index()].make_guess(&mut self.seat_rngs[player]);
        if let Err(err) = self.universe.validate_guess(&guess) {
            warn!(%player, error = %err, "skipping turn with invalid guess");
            return false;
        }

        let record = self.disprove(player, guess);
        debug!(
            %player,
            guess = %self.universe.describe(&guess),
            disprover = ?record.disprover(),
            "turn"
        );

        let concealed = record.concealed();
        for detective in &mut self.detectives {
            if detective.seat() == player {
                detective.observe(&record);
            } else {
                detective.observe(&concealed);
            }
        }
        self.history.push(record);

        let Some(accused) = self.detectives[player.index()].accusation() else {
            return false;
        };
        if let Err(err) = self.universe.validate_guess(&accused) {
            warn!(%player, error = %err, "ignoring invalid accusation");
            return false;
        }

        let correct = accused == self.solution;
        self.accusations.push(Accusation { player, guess: accused, correct });
        if correct {
            info!(%player, solution = %self.universe.describe(&accused), "correct accusation");
        } else {
            warn!(%player, accused = %self.universe.describe(&accused), "wrong accusation");
        }
        correct
    }

    /// Ask the other players in seat order until one disproves.
    ///
    /// The controller checks every answer against the real hands; an
    /// answer that does not match is replaced by the first held card.
    fn disprove(&self, guesser: PlayerId, guess: Guess) -> TurnRecord {
        let mut record = TurnRecord::new(guesser, guess);
        for other in guesser.others_in_turn_order(self.config.player_count) {
            let hand = self.hands.get(other);
            let truth = guess.cards().into_iter().find(|card| hand.contains(card));
            let answer = self.detectives[other.index()].disprove(&guess);

            let shown = match answer {
                Some(card) if guess.contains(card) && hand.contains(&card) => Some(card),
                _ => {
                    if answer.is_some() || truth.is_some() {
                        warn!(player = %other, ?answer, "detective answered falsely, correcting");
                    }
                    truth
                }
            };

            match shown {
                Some(card) => {
                    record.push(other, Response::Shown(card));
                    break;
                }
                None => record.push(other, Response::CouldNotDisprove),
            }
        }
        record
    }

    /// Give every seat one turn. Returns the winner, if any.
    pub fn run_round(&mut self) -> Option<PlayerId> {
        PlayerId::all(self.config.player_count).find(|&player| self.run_turn(player))
    }

    /// Play rounds until someone wins or the round limit is reached.
    pub fn run(&mut self) -> GameOutcome {
        let mut rounds = 0;
        let mut winner = None;
        while winner.is_none() && rounds < self.config.max_rounds {
            rounds += 1;
            winner = self.run_round();
        }

        match winner {
            Some(player) => info!(%player, rounds, turns = self.turns, "game won"),
            None => warn!(rounds, turns = self.turns, "round limit reached without a winner"),
        }
        GameOutcome { winner, rounds, turns: self.turns }
    }
}
