//! Canonical signatures of constraint-free hand groups.
//!
//! The number of ways to fill a group of hands only depends on how many
//! slots each hand has left and on the sizes of the overlap regions of their
//! possible-card pools, not on which cards are involved. The signature
//! records exactly that:
//!
//! ```text
//! [unknown_0, .., unknown_{k-1}, region_0, .., region_{2^k - 1}]
//! ```
//!
//! Region `r` counts the cards whose pool membership, read as a k-digit
//! binary number with hand 0 as the most significant digit, equals `r`.
//! Region 0 (cards in no pool) is always 0 but is kept so the layout is
//! positional.
//!
//! Hands are put in canonical order first: ascending completion count, then
//! slots left, pool size and the sorted sizes of the pool's overlaps with
//! the other pools. Hands still tied after that are settled by trying the
//! orderings of the tied blocks and keeping the smallest signature, so the
//! same group in any input order maps to the same signature. Groups whose
//! tied blocks allow more than `MAX_TIE_ORDERINGS` orderings keep their
//! input order among ties; such a signature is still exact for its own
//! ordering, so a cached value stays correct and only sharing is lost.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Card;
use crate::knowledge::HandKnowledge;

use super::combin::StateCount;

/// Largest group the signature supports (2^16 regions).
pub const MAX_SIGNATURE_HANDS: usize = 16;

/// Most orderings of tied hands tried when canonicalizing a group.
pub const MAX_TIE_ORDERINGS: usize = 120;

type OrderKey = (StateCount, usize, usize, SmallVec<[usize; 16]>);

/// Relabeling-invariant fingerprint of a group of constraint-free hands.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signature(SmallVec<[u32; 16]>);

impl Signature {
    /// Signature of hands in any order.
    ///
    /// ```
    /// use clue_deduce::core::{Card, CardSet};
    /// use clue_deduce::counting::Signature;
    /// use clue_deduce::knowledge::HandKnowledge;
    ///
    /// let pool = |ids: std::ops::Range<u8>| -> CardSet { ids.map(Card).collect() };
    /// let a = HandKnowledge::new(3, pool(1..7));
    /// let b = HandKnowledge::new(3, pool(3..9));
    ///
    /// let sig = Signature::of(&[a, b]);
    /// assert_eq!(sig.as_slice(), &[3, 3, 0, 2, 2, 4]);
    /// ```
    #[must_use]
    pub fn of(hands: &[HandKnowledge]) -> Self {
        let mut ordered = hands.to_vec();
        canonical_order(&mut ordered);
        Self::of_ordered(&ordered)
    }

    /// Signature of hands already in canonical order.
    #[must_use]
    pub fn of_ordered(hands: &[HandKnowledge]) -> Self {
        let k = hands.len();
        assert!(k <= MAX_SIGNATURE_HANDS, "At most {MAX_SIGNATURE_HANDS} hands per signature");

        let mut membership: FxHashMap<Card, usize> = FxHashMap::default();
        for (i, hand) in hands.iter().enumerate() {
            let bit = 1 << (k - 1 - i);
            for &card in hand.possible_cards() {
                *membership.entry(card).or_default() |= bit;
            }
        }

        let mut regions = vec![0u32; 1 << k];
        for mask in membership.into_values() {
            regions[mask] += 1;
        }

        let key = hands
            .iter()
            .map(|hand| hand.num_unknown() as u32)
            .chain(regions)
            .collect();
        Self(key)
    }

    /// The raw signature values.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Sort hands into canonical order.
///
/// Groups larger than `MAX_SIGNATURE_HANDS` are never signed, so they are
/// only sorted by completion count (stable).
pub fn canonical_order(hands: &mut [HandKnowledge]) {
    if hands.len() > MAX_SIGNATURE_HANDS {
        hands.sort_by_key(HandKnowledge::completion_count);
        return;
    }
    if hands.len() < 2 {
        return;
    }

    let overlaps = overlap_matrix(hands);
    let mut keyed: Vec<(OrderKey, HandKnowledge)> = hands
        .iter()
        .zip(overlaps)
        .map(|(hand, mut profile)| {
            profile.sort_unstable();
            let key = (
                hand.completion_count(),
                hand.num_unknown(),
                hand.possible_cards().len(),
                profile,
            );
            (key, hand.clone())
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut ordered: Vec<HandKnowledge> = keyed.iter().map(|(_, hand)| hand.clone()).collect();
    let blocks = ambiguous_blocks(&keyed);
    if !blocks.is_empty() {
        settle_ties(&mut ordered, &blocks);
    }

    for (slot, hand) in hands.iter_mut().zip(ordered) {
        *slot = hand;
    }
}

/// `overlaps[i]` lists `|pool_i ∩ pool_j|` for every `j != i`.
fn overlap_matrix(hands: &[HandKnowledge]) -> Vec<SmallVec<[usize; 16]>> {
    let k = hands.len();
    let mut membership: FxHashMap<Card, u32> = FxHashMap::default();
    for (i, hand) in hands.iter().enumerate() {
        for &card in hand.possible_cards() {
            *membership.entry(card).or_default() |= 1 << i;
        }
    }

    let mut shared = vec![vec![0usize; k]; k];
    for mask in membership.into_values() {
        for i in 0..k {
            if mask & (1 << i) == 0 {
                continue;
            }
            for j in 0..k {
                if j != i && mask & (1 << j) != 0 {
                    shared[i][j] += 1;
                }
            }
        }
    }

    shared
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, n)| n)
                .collect()
        })
        .collect()
}

/// Runs of equal keys whose hands are not all interchangeable.
fn ambiguous_blocks(keyed: &[(OrderKey, HandKnowledge)]) -> Vec<std::ops::Range<usize>> {
    let same_shape = |a: &HandKnowledge, b: &HandKnowledge| {
        a.num_unknown() == b.num_unknown() && a.possible_cards() == b.possible_cards()
    };

    let mut blocks = Vec::new();
    let mut start = 0;
    while start < keyed.len() {
        let mut end = start + 1;
        while end < keyed.len() && keyed[end].0 == keyed[start].0 {
            end += 1;
        }
        let block = &keyed[start..end];
        if block.iter().any(|(_, hand)| !same_shape(hand, &block[0].1)) {
            blocks.push(start..end);
        }
        start = end;
    }
    blocks
}

/// Reorder each tied block so the whole group gets its smallest signature.
fn settle_ties(ordered: &mut [HandKnowledge], blocks: &[std::ops::Range<usize>]) {
    let mut orderings: usize = 1;
    for block in blocks {
        orderings = (1..=block.len()).fold(orderings, usize::saturating_mul);
        if orderings > MAX_TIE_ORDERINGS {
            return;
        }
    }

    let per_block: Vec<Vec<SmallVec<[usize; 8]>>> =
        blocks.iter().map(|block| permutations(block.len())).collect();
    let original = ordered.to_vec();
    let mut choice = vec![0usize; blocks.len()];
    let mut best: Option<(Signature, Vec<HandKnowledge>)> = None;

    loop {
        let mut candidate = original.clone();
        for ((block, perms), &pick) in blocks.iter().zip(&per_block).zip(&choice) {
            for (offset, &from) in perms[pick].iter().enumerate() {
                candidate[block.start + offset] = original[block.start + from].clone();
            }
        }
        let signature = Signature::of_ordered(&candidate);
        if best.as_ref().map_or(true, |(sig, _)| signature < *sig) {
            best = Some((signature, candidate));
        }

        // odometer over the per-block permutation choices
        let mut digit = 0;
        loop {
            if digit == choice.len() {
                if let Some((_, hands)) = best {
                    ordered.clone_from_slice(&hands);
                }
                return;
            }
            choice[digit] += 1;
            if choice[digit] < per_block[digit].len() {
                break;
            }
            choice[digit] = 0;
            digit += 1;
        }
    }
}

/// All orderings of `0..n`.
fn permutations(n: usize) -> Vec<SmallVec<[usize; 8]>> {
    if n == 0 {
        return vec![SmallVec::new()];
    }
    let mut out = Vec::new();
    for shorter in permutations(n - 1) {
        for at in 0..n {
            let mut perm = shorter.clone();
            perm.insert(at, n - 1);
            out.push(perm);
        }
    }
    out
}
