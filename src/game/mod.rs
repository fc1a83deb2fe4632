//! A simulated deduction game.
//!
//! Deals a `CardUniverse` to a table of `Detective`s and runs the turn loop:
//! each player guesses, the others are asked in seat order until one can
//! disprove, only the guesser sees the shown card, and the guesser may then
//! accuse.
//!
//! Supports any number of players the deck can cover.

mod controller;
mod detective;

pub use controller::{deal, Accusation, ClueGame, GameOutcome};
pub use detective::{
    DeductiveDetective, Detective, FrequencyDetective, ParticipantDetective, RandomDetective,
};
