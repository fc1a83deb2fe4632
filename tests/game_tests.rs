//! Whole games between detectives.

use clue_deduce::core::{
    Card, CardSet, CardUniverse, GameConfig, GameRng, Guess, PlayerId, Response, TurnRecord,
};
use clue_deduce::game::{
    ClueGame, DeductiveDetective, Detective, FrequencyDetective, GameOutcome, ParticipantDetective,
    RandomDetective,
};

/// Always names the same triple, never draws from its RNG, never accuses.
struct StubbornDetective {
    seat: PlayerId,
    held: CardSet,
    guess: Guess,
}

impl Detective for StubbornDetective {
    fn seat(&self) -> PlayerId {
        self.seat
    }

    fn receive_card(&mut self, card: Card) {
        self.held.insert(card);
    }

    fn held_cards(&self) -> &CardSet {
        &self.held
    }

    fn make_guess(&mut self, _rng: &mut GameRng) -> Guess {
        self.guess
    }

    fn observe(&mut self, _record: &TurnRecord) {}

    fn accusation(&mut self) -> Option<Guess> {
        None
    }
}

fn random_table(universe: &CardUniverse, players: usize) -> Vec<Box<dyn Detective>> {
    (0..players)
        .map(|seat| {
            Box::new(RandomDetective::new(universe.clone(), PlayerId::new(seat as u8)))
                as Box<dyn Detective>
        })
        .collect()
}

fn deductive_table(universe: &CardUniverse, players: usize) -> Vec<Box<dyn Detective>> {
    (0..players)
        .map(|seat| {
            Box::new(DeductiveDetective::new(universe.clone(), PlayerId::new(seat as u8), players))
                as Box<dyn Detective>
        })
        .collect()
}

fn assert_clean_win(game: &ClueGame, outcome: &GameOutcome) {
    let winner = outcome.winner.expect("game should have a winner");
    let last = game.accusations().last().expect("winner accused");

    assert_eq!(last.player, winner);
    assert_eq!(last.guess, game.solution());
    assert!(last.correct);
    assert!(game.accusations().iter().all(|a| a.correct), "wrong accusation made");
}

// =============================================================================
// Random detectives
// =============================================================================

#[test]
fn test_random_game_classic_six_players() {
    let universe = CardUniverse::classic();
    let config = GameConfig::new(6).with_seed(17);
    let mut game = ClueGame::new(universe.clone(), config, random_table(&universe, 6));

    for seat in PlayerId::all(6) {
        assert_eq!(game.hand(seat).len(), 3);
        assert_eq!(game.detective(seat).held_cards(), game.hand(seat));
    }

    let outcome = game.run();
    assert_clean_win(&game, &outcome);
    assert_eq!(outcome.turns as usize, game.history().len());
}

#[test]
fn test_shown_cards_are_held_and_guessed() {
    let universe = CardUniverse::classic();
    let config = GameConfig::new(4).with_seed(9);
    let mut game = ClueGame::new(universe.clone(), config, random_table(&universe, 4));
    game.run();

    for record in game.history() {
        for &(player, response) in &record.responses {
            assert_ne!(player, record.guesser);
            match response {
                Response::Shown(card) => {
                    assert!(record.guess.contains(card));
                    assert!(game.hand(player).contains(&card));
                }
                Response::CouldNotDisprove => {
                    let hand = game.hand(player);
                    assert!(record.guess.cards().iter().all(|card| !hand.contains(card)));
                }
                Response::Concealed => panic!("controller history keeps shown cards"),
            }
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let universe = CardUniverse::classic();
    let play = |seed: u64| {
        let config = GameConfig::new(5).with_seed(seed);
        let mut game = ClueGame::new(universe.clone(), config, random_table(&universe, 5));
        let outcome = game.run();
        (outcome, game.solution(), game.history().to_vec())
    };

    assert_eq!(play(31), play(31));
}

#[test]
fn test_seat_guesses_ignore_other_seats_draws() {
    let universe = CardUniverse::classic();
    let seat_zero_guesses = |detectives: Vec<Box<dyn Detective>>| {
        let mut game = ClueGame::new(universe.clone(), GameConfig::new(4).with_seed(8), detectives);
        game.run();
        game.history()
            .iter()
            .filter(|record| record.guesser == PlayerId::new(0))
            .map(|record| record.guess)
            .collect::<Vec<_>>()
    };

    let all_random = seat_zero_guesses(random_table(&universe, 4));

    let fixed = Guess::new(Card(0), Card(6), Card(12));
    let mut stubborn = random_table(&universe, 4);
    for seat in 1..4 {
        stubborn[seat] = Box::new(StubbornDetective {
            seat: PlayerId::new(seat as u8),
            held: CardSet::new(),
            guess: fixed,
        });
    }
    let among_stubborn = seat_zero_guesses(stubborn);

    // the other seats drew from the RNG in one game and not the other
    let shared = all_random.len().min(among_stubborn.len());
    assert!(shared >= 1);
    assert_eq!(all_random[..shared], among_stubborn[..shared]);
}

#[test]
fn test_round_limit_stops_game() {
    let universe = CardUniverse::classic();
    let config = GameConfig::new(6).with_seed(3).with_max_rounds(1);
    let mut game = ClueGame::new(universe.clone(), config, random_table(&universe, 6));

    let outcome = game.run();
    assert_eq!(outcome.rounds, 1);
    assert!(outcome.turns <= 6);
}

// =============================================================================
// Deductive detectives
// =============================================================================

#[test]
fn test_deductive_games_always_end_correctly() {
    let universe = CardUniverse::new(3, 3, 4);
    for seed in 0..8 {
        let config = GameConfig::new(3).with_seed(seed);
        let mut game = ClueGame::new(universe.clone(), config, deductive_table(&universe, 3));

        let outcome = game.run();
        assert_clean_win(&game, &outcome);
    }
}

#[test]
fn test_deductive_game_four_players() {
    let universe = CardUniverse::new(4, 4, 5);
    let config = GameConfig::new(4).with_seed(123);
    let mut game = ClueGame::new(universe.clone(), config, deductive_table(&universe, 4));

    let outcome = game.run();
    assert_clean_win(&game, &outcome);
}

#[test]
fn test_mixed_table() {
    let universe = CardUniverse::new(3, 3, 4);
    for seed in 0..6 {
        let mut detectives = random_table(&universe, 3);
        detectives[0] = Box::new(DeductiveDetective::new(universe.clone(), PlayerId::new(0), 3));

        let config = GameConfig::new(3).with_seed(seed);
        let mut game = ClueGame::new(universe.clone(), config, detectives);
        let outcome = game.run();
        assert_clean_win(&game, &outcome);
    }
}

// =============================================================================
// Frequency detectives and participants
// =============================================================================

#[test]
fn test_frequency_table_ends_correctly() {
    let universe = CardUniverse::classic();
    for seed in 0..4 {
        let detectives: Vec<Box<dyn Detective>> = (0..4)
            .map(|seat| {
                let seat = PlayerId::new(seat);
                Box::new(FrequencyDetective::new(universe.clone(), seat, 4)) as Box<dyn Detective>
            })
            .collect();

        let config = GameConfig::new(4).with_seed(seed);
        let mut game = ClueGame::new(universe.clone(), config, detectives);
        let outcome = game.run();
        assert_clean_win(&game, &outcome);
    }
}

#[test]
fn test_participants_leave_the_win_to_others() {
    let universe = CardUniverse::classic();
    let mut detectives = random_table(&universe, 3);
    for seat in 1..3 {
        let seat = PlayerId::new(seat);
        detectives[seat.index()] = Box::new(ParticipantDetective::new(universe.clone(), seat));
    }

    let config = GameConfig::new(3).with_seed(21);
    let mut game = ClueGame::new(universe.clone(), config, detectives);
    let outcome = game.run();

    assert_clean_win(&game, &outcome);
    assert_eq!(outcome.winner, Some(PlayerId::new(0)));
    assert!(game.accusations().iter().all(|a| a.player == PlayerId::new(0)));
}

