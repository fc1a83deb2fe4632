//! # clue-deduce
//!
//! Exact envelope deduction for Clue-style hidden-card games.
//!
//! N players each hold a secret hand drawn from three card categories
//! (suspects, weapons, rooms), and one card per category is hidden in an
//! envelope. From everything one player has observed, the engine counts how
//! many complete deals are consistent with each envelope candidate. A count
//! of 0 rules a candidate out; a single nonzero candidate is a certain
//! accusation.
//!
//! ## Design Principles
//!
//! 1. **Exact Counts**: No sampling. Counts are `u128`, proportional to the
//!    posterior probability of each candidate under a uniform deal.
//!
//! 2. **Shape Memoization**: Joint completions are memoized by a
//!    relabeling-invariant signature of the hands' overlap structure, so
//!    isomorphic subproblems are counted once per process (or once ever,
//!    with a durable cache).
//!
//! 3. **Persistent Data Structures**: O(1) cloning via `im-rs` for every
//!    resolver and counter branch.
//!
//! ## Modules
//!
//! - `core`: Cards, the card universe, players, turns, RNG, configuration, errors
//! - `knowledge`: Hand knowledge, constraint resolution, cross-player enumeration
//! - `counting`: Signatures, memo caches, the state counter
//! - `engine`: Per-candidate envelope counts and the observer's notebook
//! - `game`: Dealing, the turn loop, and detectives that play it

pub mod core;
pub mod counting;
pub mod engine;
pub mod game;
pub mod knowledge;

// Re-export commonly used types
pub use crate::core::{
    Card, CardSet, CardUniverse, Category, CounterConfig, DeductionError, GameConfig, GameRng,
    Guess, PlayerId, PlayerMap, Response, Result, TurnRecord,
};

pub use crate::knowledge::{enumerate_global_states, resolve, GlobalState, HandKnowledge};

pub use crate::counting::{
    choose, CounterStats, Deadline, DurableCache, MemoryCache, Signature, StateCache, StateCount,
    StateCounter,
};

pub use crate::engine::{Candidate, EnvelopeCounts, EnvelopeProbabilityEngine, Notebook};

pub use crate::game::{
    ClueGame, DeductiveDetective, Detective, FrequencyDetective, GameOutcome, ParticipantDetective,
    RandomDetective,
};
