//! Core types: cards, the card universe, players, turns, RNG, configuration
//! and errors.
//!
//! Everything here is independent of the deduction algorithms; the
//! `knowledge`, `counting` and `engine` modules build on it.

pub mod card;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod turn;
pub mod universe;

pub use card::{Card, CardSet, Category, Guess};
pub use config::{CounterConfig, GameConfig};
pub use error::{DeductionError, Result};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use turn::{Response, TurnRecord};
pub use universe::CardUniverse;
