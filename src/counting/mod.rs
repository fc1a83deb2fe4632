//! Counting consistent game states.
//!
//! - `combin`: binomial coefficients and k-combinations
//! - `signature`: relabeling-invariant keys for hand groups
//! - `cache`: the memo table, in memory or persisted with bincode
//! - `counter`: the memoized joint-completion counter
//! - `deadline`: time limit and cancellation for long queries

pub mod cache;
pub mod combin;
pub mod counter;
pub mod deadline;
pub mod signature;
pub mod stats;

pub use cache::{DurableCache, MemoryCache, StateCache};
pub use combin::{checked_choose, choose, Combinations, StateCount};
pub use counter::StateCounter;
pub use deadline::Deadline;
pub use signature::{canonical_order, Signature, MAX_SIGNATURE_HANDS, MAX_TIE_ORDERINGS};
pub use stats::CounterStats;
