//! Cards, categories and guesses.
//!
//! A `Card` is an index into a `CardUniverse`. The universe lays its cards
//! out category by category, so the natural `Ord` on `Card` is the fixed
//! total order used wherever iteration order matters (constraint branching,
//! candidate enumeration, tie breaking).
//!
//! ## CardSet
//!
//! `CardSet` is an `im::OrdSet<Card>`: clones are O(1) with structural
//! sharing, and iteration is always in ascending card order.

use im::OrdSet;
use serde::{Deserialize, Serialize};

/// Ordered persistent set of cards.
pub type CardSet = OrdSet<Card>;

/// Identifier for one card of a `CardUniverse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(pub u8);

impl Card {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw index into the universe.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for Card {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The three card categories. Each envelope holds exactly one of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Suspect,
    Weapon,
    Room,
}

impl Category {
    /// All categories in universe order.
    pub const ALL: [Category; 3] = [Category::Suspect, Category::Weapon, Category::Room];

    /// Position of this category in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Category::Suspect => 0,
            Category::Weapon => 1,
            Category::Room => 2,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Suspect => "suspect",
            Category::Weapon => "weapon",
            Category::Room => "room",
        };
        f.write_str(name)
    }
}

/// A suspect/weapon/room triple, used both for guesses and accusations.
///
/// The constructor does not check categories; use
/// `CardUniverse::validate_guess` at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guess {
    pub suspect: Card,
    pub weapon: Card,
    pub room: Card,
}

impl Guess {
    /// Create a new guess.
    #[must_use]
    pub const fn new(suspect: Card, weapon: Card, room: Card) -> Self {
        Self { suspect, weapon, room }
    }

    /// The three cards in suspect, weapon, room order.
    #[must_use]
    pub const fn cards(&self) -> [Card; 3] {
        [self.suspect, self.weapon, self.room]
    }

    /// Check whether the guess names `card`.
    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards().contains(&card)
    }

    /// The guess as a card set (used as a disjunctive constraint).
    #[must_use]
    pub fn to_set(&self) -> CardSet {
        self.cards().into_iter().collect()
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.suspect, self.weapon, self.room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_order_follows_index() {
        let mut cards = vec![Card(5), Card(1), Card(3)];
        cards.sort();
        assert_eq!(cards, vec![Card(1), Card(3), Card(5)]);
        assert_eq!(Card(4).index(), 4);
        assert_eq!(format!("{}", Card(7)), "Card(7)");
    }

    #[test]
    fn test_card_set_iterates_in_order() {
        let set: CardSet = [Card(9), Card(2), Card(4)].into_iter().collect();
        let order: Vec<_> = set.iter().copied().collect();
        assert_eq!(order, vec![Card(2), Card(4), Card(9)]);
    }

    #[test]
    fn test_category_index() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(format!("{}", Category::Weapon), "weapon");
    }

    #[test]
    fn test_guess_cards() {
        let guess = Guess::new(Card(0), Card(7), Card(15));
        assert_eq!(guess.cards(), [Card(0), Card(7), Card(15)]);
        assert!(guess.contains(Card(7)));
        assert!(!guess.contains(Card(8)));
        assert_eq!(guess.to_set().len(), 3);
    }

    #[test]
    fn test_guess_serialization() {
        let guess = Guess::new(Card(1), Card(6), Card(12));
        let json = serde_json::to_string(&guess).unwrap();
        let deserialized: Guess = serde_json::from_str(&json).unwrap();
        assert_eq!(guess, deserialized);
    }
}
