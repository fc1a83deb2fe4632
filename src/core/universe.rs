//! The fixed card catalogue of a game.
//!
//! `CardUniverse` lists every card, category by category, and provides
//! lookup by name and by category. Card IDs are assigned in listing order:
//! suspects first, then weapons, then rooms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardSet, Category, Guess};
use super::error::{DeductionError, Result};

const CLASSIC_SUSPECTS: [&str; 6] = [
    "Colonel Mustard",
    "Miss Scarlet",
    "Professor Plum",
    "Mr. Green",
    "Mrs. White",
    "Mrs. Peacock",
];

const CLASSIC_WEAPONS: [&str; 6] = [
    "Rope",
    "Lead Pipe",
    "Knife",
    "Wrench",
    "Candlestick",
    "Revolver",
];

const CLASSIC_ROOMS: [&str; 9] = [
    "Kitchen",
    "Study",
    "Conservatory",
    "Hall",
    "Dining Room",
    "Billiard Room",
    "Lounge",
    "Library",
    "Ballroom",
];

/// Card catalogue partitioned into suspects, weapons and rooms.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{CardUniverse, Category};
///
/// let universe = CardUniverse::classic();
/// assert_eq!(universe.len(), 21);
///
/// let rope = universe.find("Rope").unwrap();
/// assert_eq!(universe.category_of(rope), Some(Category::Weapon));
///
/// // 18 cards dealt round-robin to 6 players
/// assert_eq!(universe.hand_sizes(6), vec![3; 6]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardUniverse {
    names: Vec<String>,
    /// Number of cards per category, in `Category::ALL` order.
    counts: [u8; 3],
    #[serde(skip)]
    by_name: FxHashMap<String, Card>,
}

impl PartialEq for CardUniverse {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.counts == other.counts
    }
}

impl Eq for CardUniverse {}

impl CardUniverse {
    /// The standard board game catalogue: 6 suspects, 6 weapons, 9 rooms.
    #[must_use]
    pub fn classic() -> Self {
        Self::with_names(&CLASSIC_SUSPECTS, &CLASSIC_WEAPONS, &CLASSIC_ROOMS)
    }

    /// Build an anonymous universe with the given category sizes.
    ///
    /// Cards are named "Suspect 1", "Weapon 1", "Room 1", ...
    #[must_use]
    pub fn new(suspects: usize, weapons: usize, rooms: usize) -> Self {
        let make = |prefix: &str, n: usize| -> Vec<String> {
            (1..=n).map(|i| format!("{prefix} {i}")).collect()
        };
        Self::with_names(&make("Suspect", suspects), &make("Weapon", weapons), &make("Room", rooms))
    }

    /// Build a universe from explicit card names.
    ///
    /// Panics if a category is empty, names repeat, or there are more than
    /// 255 cards.
    #[must_use]
    pub fn with_names<S: AsRef<str>>(suspects: &[S], weapons: &[S], rooms: &[S]) -> Self {
        let total = suspects.len() + weapons.len() + rooms.len();
        assert!(
            !suspects.is_empty() && !weapons.is_empty() && !rooms.is_empty(),
            "Every category needs at least one card"
        );
        assert!(total <= u8::MAX as usize, "At most 255 cards supported");

        let names: Vec<String> = suspects
            .iter()
            .chain(weapons)
            .chain(rooms)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut universe = Self {
            names,
            counts: [suspects.len() as u8, weapons.len() as u8, rooms.len() as u8],
            by_name: FxHashMap::default(),
        };
        universe.rebuild_index();
        assert_eq!(universe.by_name.len(), total, "Card names must be unique");
        universe
    }

    /// Rebuild the name index (needed after deserialization).
    pub fn rebuild_index(&mut self) {
        self.by_name = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), Card(i as u8)))
            .collect();
    }

    /// Total number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the universe is empty (never true for a constructed universe).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if a card belongs to this universe.
    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        card.index() < self.names.len()
    }

    /// Iterate over all cards in order.
    pub fn cards(&self) -> impl Iterator<Item = Card> {
        (0..self.names.len() as u8).map(Card)
    }

    /// All cards as a set.
    #[must_use]
    pub fn all_cards(&self) -> CardSet {
        self.cards().collect()
    }

    fn range_of(&self, category: Category) -> std::ops::Range<u8> {
        let start: u8 = self.counts[..category.index()].iter().sum();
        start..start + self.counts[category.index()]
    }

    /// Number of cards in a category.
    #[must_use]
    pub fn category_len(&self, category: Category) -> usize {
        self.counts[category.index()] as usize
    }

    /// Iterate over the cards of one category.
    pub fn cards_in(&self, category: Category) -> impl Iterator<Item = Card> {
        self.range_of(category).map(Card)
    }

    /// The cards of one category as a set.
    #[must_use]
    pub fn category_set(&self, category: Category) -> CardSet {
        self.cards_in(category).collect()
    }

    /// Category of a card, `None` if the card is outside the universe.
    #[must_use]
    pub fn category_of(&self, card: Card) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|&category| self.range_of(category).contains(&card.0))
    }

    /// Human-readable name of a card.
    #[must_use]
    pub fn name(&self, card: Card) -> Option<&str> {
        self.names.get(card.index()).map(String::as_str)
    }

    /// Look up a card by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Card> {
        self.by_name.get(name).copied()
    }

    /// Check that a guess names one suspect, one weapon and one room, in that order.
    pub fn validate_guess(&self, guess: &Guess) -> Result<()> {
        let slots = [
            (guess.suspect, Category::Suspect),
            (guess.weapon, Category::Weapon),
            (guess.room, Category::Room),
        ];
        for (card, expected) in slots {
            match self.category_of(card) {
                Some(found) if found == expected => {}
                Some(found) => {
                    return Err(DeductionError::InvalidGuess(format!(
                        "{card} is a {found}, expected a {expected}"
                    )))
                }
                None => {
                    return Err(DeductionError::InvalidGuess(format!(
                        "{card} is not part of this universe"
                    )))
                }
            }
        }
        Ok(())
    }

    /// Build a guess from an arbitrary set of cards holding one card per category.
    #[must_use]
    pub fn guess_from(&self, cards: &CardSet) -> Option<Guess> {
        let mut slots: [Option<Card>; 3] = [None; 3];
        for &card in cards {
            let category = self.category_of(card)?;
            if slots[category.index()].replace(card).is_some() {
                return None;
            }
        }
        Some(Guess::new(slots[0]?, slots[1]?, slots[2]?))
    }

    /// Hand sizes after removing the envelope and dealing round-robin.
    ///
    /// Seat 0 receives the first card, so lower seats get the extra cards
    /// when the deck does not divide evenly.
    #[must_use]
    pub fn hand_sizes(&self, player_count: usize) -> Vec<usize> {
        assert!(player_count > 0, "Must have at least 1 player");
        let dealt = self.len() - Category::ALL.len();
        let base = dealt / player_count;
        let extra = dealt % player_count;
        (0..player_count)
            .map(|seat| base + usize::from(seat < extra))
            .collect()
    }

    /// Format a guess with card names.
    #[must_use]
    pub fn describe(&self, guess: &Guess) -> String {
        let name = |card: Card| self.name(card).unwrap_or("?");
        format!(
            "{} with the {} in the {}",
            name(guess.suspect),
            name(guess.weapon),
            name(guess.room)
        )
    }
}
