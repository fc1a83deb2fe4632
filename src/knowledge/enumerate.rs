//! Cross-player enumeration of consistent resolved states.
//!
//! Every player's hand is resolved on its own, then one partition is picked
//! per player. A pick survives only if no card is known to two players.
//! Survivors are tightened: each hand drops the other hands' known cards
//! from its possible set, since a card has exactly one owner.

use crate::core::CardSet;

use super::hand::HandKnowledge;
use super::resolve::resolve;

/// One consistent pick of constraint-free partitions, one per player.
pub type GlobalState = Vec<HandKnowledge>;

/// Enumerate every consistent combination of resolved partitions.
///
/// The output keeps the input's player order inside each combination, and
/// combinations appear in Cartesian-product order (first player varies
/// slowest). If any player's hand is unsatisfiable the result is empty;
/// an empty input yields one empty combination.
#[must_use]
pub fn enumerate_global_states(hands: &[HandKnowledge]) -> Vec<GlobalState> {
    let partitions: Vec<Vec<HandKnowledge>> = hands.iter().map(resolve).collect();
    if partitions.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut picked: Vec<&HandKnowledge> = Vec::with_capacity(hands.len());
    pick(&partitions, &mut picked, &CardSet::new(), &mut out);
    out
}

fn pick<'a>(
    partitions: &'a [Vec<HandKnowledge>],
    picked: &mut Vec<&'a HandKnowledge>,
    claimed: &CardSet,
    out: &mut Vec<GlobalState>,
) {
    let depth = picked.len();
    let Some(options) = partitions.get(depth) else {
        out.push(tighten(picked));
        return;
    };

    for option in options {
        if option.known_cards().iter().any(|card| claimed.contains(card)) {
            continue;
        }
        let claimed = claimed.clone().union(option.known_cards().clone());
        picked.push(option);
        pick(partitions, picked, &claimed, out);
        picked.pop();
    }
}

fn tighten(picked: &[&HandKnowledge]) -> GlobalState {
    picked
        .iter()
        .enumerate()
        .map(|(i, hand)| {
            let mut hand = (*hand).clone();
            for (j, other) in picked.iter().enumerate() {
                if i != j {
                    hand.remove_possible_all(other.known_cards());
                }
            }
            hand
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Card;

    fn cards(ids: &[u8]) -> CardSet {
        ids.iter().copied().map(Card).collect()
    }

    fn has(hand: &HandKnowledge, ids: &[u8]) -> bool {
        ids.iter().all(|&id| hand.known_cards().contains(&Card(id)))
    }

    fn excludes(hand: &HandKnowledge, ids: &[u8]) -> bool {
        ids.iter().all(|&id| {
            !hand.known_cards().contains(&Card(id)) && !hand.possible_cards().contains(&Card(id))
        })
    }

    #[test]
    fn test_no_constraints() {
        let h1 = HandKnowledge::new(3, cards(&[0, 1, 2, 3]));
        let h2 = HandKnowledge::new(3, cards(&[0, 1, 2, 3]));

        let states = enumerate_global_states(&[h1.clone(), h2.clone()]);
        assert_eq!(states, vec![vec![h1, h2]]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(enumerate_global_states(&[]), vec![Vec::<HandKnowledge>::new()]);
    }

    #[test]
    fn test_single_player() {
        let mut h = HandKnowledge::new(3, cards(&[0, 1, 2, 3, 4, 5]));
        h.add_constraint(cards(&[0, 1]));
        h.add_constraint(cards(&[1, 2, 3]));

        let states = enumerate_global_states(&[h]);
        assert_eq!(states.len(), 3);

        assert!(has(&states[0][0], &[1]));
        assert!(has(&states[1][0], &[0, 2]) && excludes(&states[1][0], &[1]));
        assert!(has(&states[2][0], &[0, 3]) && excludes(&states[2][0], &[1, 2]));
    }

    #[test]
    fn test_no_collisions() {
        let mut h1 = HandKnowledge::new(3, cards(&[0, 1, 2, 3, 4, 5]));
        h1.add_constraint(cards(&[0, 1]));
        let mut h2 = HandKnowledge::new(3, cards(&[0, 1, 2, 3, 4, 5]));
        h2.add_constraint(cards(&[2, 3]));

        let states = enumerate_global_states(&[h1, h2]);
        assert_eq!(states.len(), 4);

        assert!(has(&states[0][0], &[0]) && excludes(&states[0][0], &[2]));
        assert!(has(&states[0][1], &[2]) && excludes(&states[0][1], &[0]));

        assert!(has(&states[1][0], &[0]) && excludes(&states[1][0], &[3]));
        assert!(has(&states[1][1], &[3]) && excludes(&states[1][1], &[0, 2]));

        assert!(has(&states[2][0], &[1]) && excludes(&states[2][0], &[0, 2]));
        assert!(has(&states[2][1], &[2]) && excludes(&states[2][1], &[1]));

        assert!(has(&states[3][0], &[1]) && excludes(&states[3][0], &[0, 3]));
        assert!(has(&states[3][1], &[3]) && excludes(&states[3][1], &[1, 2]));
    }

    #[test]
    fn test_single_collision() {
        let mut h1 = HandKnowledge::new(3, cards(&[0, 1, 2, 3, 4, 5]));
        h1.add_constraint(cards(&[0, 1]));
        h1.add_constraint(cards(&[1, 2, 3]));
        let mut h2 = HandKnowledge::new(3, cards(&[0, 1, 2, 3, 4, 5]));
        h2.add_constraint(cards(&[1]));

        let states = enumerate_global_states(&[h1, h2]);
        assert_eq!(states.len(), 2);

        assert!(has(&states[0][0], &[0, 2]) && excludes(&states[0][0], &[1]));
        assert!(has(&states[0][1], &[1]) && excludes(&states[0][1], &[0, 2]));

        assert!(has(&states[1][0], &[0, 3]) && excludes(&states[1][0], &[1, 2]));
        assert!(has(&states[1][1], &[1]) && excludes(&states[1][1], &[0, 3]));
    }

    #[test]
    fn test_all_collisions() {
        let mut h1 = HandKnowledge::new(3, cards(&[0, 1, 2, 3]));
        h1.add_constraint(cards(&[0]));
        let mut h2 = HandKnowledge::new(3, cards(&[0, 1, 2, 3]));
        h2.add_constraint(cards(&[0]));

        assert!(enumerate_global_states(&[h1, h2]).is_empty());
    }

    #[test]
    fn test_unsatisfiable_player_empties_product() {
        let h1 = HandKnowledge::new(3, cards(&[0, 1, 2, 3]));
        let mut h2 = HandKnowledge::new(1, cards(&[0, 1]));
        h2.add_constraint(cards(&[5]));

        assert!(enumerate_global_states(&[h1, h2]).is_empty());
    }

    #[test]
    fn test_overlapping_pools() {
        let mut h1 = HandKnowledge::new(3, cards(&[0, 1, 2, 3, 4, 5]));
        h1.add_constraint(cards(&[0, 1, 2]));
        let mut h2 = HandKnowledge::new(3, cards(&[1, 2, 3, 4, 5, 6, 7]));
        h2.add_constraint(cards(&[1, 2, 3]));

        let states = enumerate_global_states(&[h1, h2]);
        assert_eq!(states.len(), 7);

        assert!(has(&states[0][0], &[0]) && excludes(&states[0][0], &[1]));
        assert!(has(&states[0][1], &[1]) && excludes(&states[0][1], &[0]));

        assert!(has(&states[3][0], &[1]) && excludes(&states[3][0], &[0, 2]));
        assert!(has(&states[3][1], &[2]) && excludes(&states[3][1], &[1]));

        assert!(has(&states[6][0], &[2]) && excludes(&states[6][0], &[0, 1, 3]));
        assert!(has(&states[6][1], &[3]) && excludes(&states[6][1], &[1, 2]));
    }
}
