//! Turn records: a guess plus the responses it drew.
//!
//! The game controller walks the other players in seat order until one can
//! disprove the guess. Each player asked contributes one `Response`. Only the
//! guesser learns which card was shown; everyone else sees `Concealed`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, Guess};
use super::player::PlayerId;

/// What one player did when asked to disprove a guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Response {
    /// The player holds none of the guessed cards.
    CouldNotDisprove,
    /// The player showed this card to the observer.
    Shown(Card),
    /// The player showed a card, but not to the observer.
    Concealed,
}

impl Response {
    /// Check if the player disproved the guess.
    #[must_use]
    pub fn disproved(self) -> bool {
        !matches!(self, Response::CouldNotDisprove)
    }
}

/// A guess and the responses it drew, as seen by one observer.
///
/// ## Example
///
/// ```
/// use clue_deduce::core::{Card, Guess, PlayerId, Response, TurnRecord};
///
/// let guess = Guess::new(Card(0), Card(6), Card(12));
/// let mut record = TurnRecord::new(PlayerId::new(0), guess);
/// record.push(PlayerId::new(1), Response::CouldNotDisprove);
/// record.push(PlayerId::new(2), Response::Shown(Card(6)));
///
/// assert_eq!(record.disprover(), Some(PlayerId::new(2)));
/// assert!(!record.undisproved());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Player who made the guess.
    pub guesser: PlayerId,

    /// The guess itself.
    pub guess: Guess,

    /// Responses in the order the players were asked.
    /// SmallVec covers the usual 2-7 responders without heap allocation.
    pub responses: SmallVec<[(PlayerId, Response); 8]>,
}

impl TurnRecord {
    /// Create a record with no responses yet.
    #[must_use]
    pub fn new(guesser: PlayerId, guess: Guess) -> Self {
        Self {
            guesser,
            guess,
            responses: SmallVec::new(),
        }
    }

    /// Append one response.
    pub fn push(&mut self, player: PlayerId, response: Response) {
        self.responses.push((player, response));
    }

    /// The player who disproved the guess, if anyone did.
    #[must_use]
    pub fn disprover(&self) -> Option<PlayerId> {
        self.responses
            .iter()
            .find(|(_, response)| response.disproved())
            .map(|&(player, _)| player)
    }

    /// True if every player asked failed to disprove.
    #[must_use]
    pub fn undisproved(&self) -> bool {
        self.responses.iter().all(|(_, response)| !response.disproved())
    }

    /// The same record with any shown card hidden, as seen by a bystander.
    #[must_use]
    pub fn concealed(&self) -> Self {
        let mut record = self.clone();
        for (_, response) in record.responses.iter_mut() {
            if let Response::Shown(_) = response {
                *response = Response::Concealed;
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_guess() -> Guess {
        Guess::new(Card(1), Card(7), Card(13))
    }

    #[test]
    fn test_undisproved_when_empty() {
        let record = TurnRecord::new(PlayerId::new(0), sample_guess());
        assert!(record.undisproved());
        assert_eq!(record.disprover(), None);
    }

    #[test]
    fn test_disprover() {
        let mut record = TurnRecord::new(PlayerId::new(3), sample_guess());
        record.push(PlayerId::new(4), Response::CouldNotDisprove);
        record.push(PlayerId::new(5), Response::Concealed);

        assert_eq!(record.disprover(), Some(PlayerId::new(5)));
        assert!(!record.undisproved());
    }

    #[test]
    fn test_concealed_hides_shown_card() {
        let mut record = TurnRecord::new(PlayerId::new(0), sample_guess());
        record.push(PlayerId::new(1), Response::CouldNotDisprove);
        record.push(PlayerId::new(2), Response::Shown(Card(7)));

        let public = record.concealed();
        assert_eq!(public.responses[0].1, Response::CouldNotDisprove);
        assert_eq!(public.responses[1].1, Response::Concealed);
        // original untouched
        assert_eq!(record.responses[1].1, Response::Shown(Card(7)));
    }

    #[test]
    fn test_record_serialization() {
        let mut record = TurnRecord::new(PlayerId::new(0), sample_guess());
        record.push(PlayerId::new(1), Response::Shown(Card(1)));

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: TurnRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
