//! Constraint resolution: split a constrained hand into disjoint,
//! constraint-free partitions.
//!
//! The last constraint is peeled off and branched on, one branch per card:
//! branch `i` holds `c_i` and excludes `c_0..c_{i-1}`. For the constraint
//! `{1, 2, 3}` the branches are:
//!
//! ```text
//! has 1
//! has 2, not 1
//! has 3, not 1, not 2
//! ```
//!
//! so no full hand is produced by two branches. Each branch is resolved
//! recursively until no constraint remains. Cards are visited in ascending
//! card order, which makes the output reproducible.

use smallvec::SmallVec;

use crate::core::Card;

use super::hand::HandKnowledge;

/// Resolve every constraint of `hand`.
///
/// Returns constraint-free hands whose completions are pairwise disjoint
/// and together are exactly the completions of `hand` that satisfy all of
/// its constraints. An unsatisfiable hand resolves to an empty list; a hand
/// without constraints resolves to itself.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{Card, CardSet};
/// use clue_deduce::knowledge::{resolve, HandKnowledge};
///
/// let pool: CardSet = (0..6).map(Card).collect();
/// let mut hand = HandKnowledge::new(2, pool);
/// hand.add_constraint([Card(0), Card(1), Card(2)].into_iter().collect());
///
/// let parts = resolve(&hand);
/// assert_eq!(parts.len(), 3);
/// assert!(parts.iter().all(|p| !p.has_constraints()));
/// ```
#[must_use]
pub fn resolve(hand: &HandKnowledge) -> Vec<HandKnowledge> {
    let mut out = Vec::new();
    resolve_into(hand.clone(), &mut out);
    out
}

fn resolve_into(mut hand: HandKnowledge, out: &mut Vec<HandKnowledge>) {
    let Some(constraint) = hand.pop_constraint() else {
        out.push(hand);
        return;
    };

    if constraint.iter().any(|card| hand.known_cards().contains(card)) {
        resolve_into(hand, out);
        return;
    }

    // no free slot left to hold any constraint card
    if hand.num_unknown() == 0 {
        return;
    }

    let mut excluded: SmallVec<[Card; 8]> = SmallVec::new();
    for &card in constraint.iter() {
        if !hand.possible_cards().contains(&card) {
            continue;
        }

        let mut branch = hand.clone();
        branch.add_known(card);
        branch.remove_possible_all(&excluded);
        excluded.push(card);

        resolve_into(branch, out);
    }
}
