//! Hand knowledge and constraint resolution.
//!
//! ## Key Types
//!
//! - `HandKnowledge`: known cards, possible cards and "at least one of"
//!   constraints for one hand
//! - `resolve`: split a constrained hand into disjoint constraint-free
//!   partitions
//! - `enumerate_global_states`: combine resolved partitions across players
//!   without card collisions

pub mod enumerate;
pub mod hand;
pub mod resolve;

pub use enumerate::{enumerate_global_states, GlobalState};
pub use hand::HandKnowledge;
pub use resolve::resolve;
