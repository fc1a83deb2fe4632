//! Envelope queries on a classic six-player deal, with a cold and a warm cache.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use clue_deduce::core::{CardUniverse, Category, GameRng, Guess, PlayerId, Response, TurnRecord};
use clue_deduce::engine::Notebook;
use clue_deduce::game::deal;

const PLAYERS: usize = 6;

/// Seat 0's notebook after the deal and two turns with concealed answers.
fn observed_notebook() -> Notebook {
    let universe = CardUniverse::classic();
    let (solution, hands) = deal(&universe, PLAYERS, &mut GameRng::new(7));
    let me = PlayerId::new(0);

    let mut notebook = Notebook::new(universe.clone(), me, PLAYERS);
    for &card in hands.get(me) {
        notebook.dealt(card);
    }

    for (guesser, holder) in [(1u8, 2u8), (3, 4)] {
        let card = hands
            .get(PlayerId::new(holder))
            .iter()
            .copied()
            .find(|&card| !solution.contains(card));
        let Some(card) = card else { continue };
        let guess = match universe.category_of(card) {
            Some(Category::Suspect) => Guess::new(card, solution.weapon, solution.room),
            Some(Category::Weapon) => Guess::new(solution.suspect, card, solution.room),
            _ => Guess::new(solution.suspect, solution.weapon, card),
        };
        let mut record = TurnRecord::new(PlayerId::new(guesser), guess);
        for other in PlayerId::new(guesser).others_in_turn_order(PLAYERS) {
            if other.index() == holder as usize {
                record.push(other, Response::Concealed);
                break;
            }
            record.push(other, Response::CouldNotDisprove);
        }
        notebook.observe_turn(&record);
    }
    notebook
}

fn bench_envelope_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope_query");
    group.sample_size(10);

    group.bench_function("classic_6p_cold", |b| {
        b.iter_batched(
            observed_notebook,
            |mut notebook| notebook.envelope_counts(),
            BatchSize::SmallInput,
        );
    });

    let mut warm = observed_notebook();
    let _ = warm.envelope_counts();
    group.bench_function("classic_6p_warm", |b| {
        b.iter(|| warm.envelope_counts());
    });

    group.finish();
}

criterion_group!(benches, bench_envelope_query);
criterion_main!(benches);
