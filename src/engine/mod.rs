//! Envelope queries on top of the counting layer.
//!
//! `EnvelopeProbabilityEngine` turns an envelope plus the other hands into
//! per-candidate counts; `Notebook` keeps those hands up to date from game
//! events and answers the strategy questions.

mod envelope;
mod notebook;

pub use envelope::{envelope_candidates, Candidate, EnvelopeCounts, EnvelopeProbabilityEngine};
pub use notebook::Notebook;
