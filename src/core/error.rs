//! Error type shared by the deduction engine.
//!
//! Unsatisfiable observations are not errors: they resolve to zero
//! consistent states. Errors are reserved for misuse (counting hands that
//! still carry constraints), cancelled queries and cache I/O.

use thiserror::Error;

/// Errors produced by the deduction engine.
#[derive(Debug, Error)]
pub enum DeductionError {
    #[error("hand still carries {remaining} unresolved constraint(s); resolve before counting")]
    UnresolvedConstraints { remaining: usize },
    #[error("state count does not fit in 128 bits")]
    CountOverflow,
    #[error("state count cancelled before completion")]
    Cancelled,
    #[error("cache I/O error: {source}")]
    CacheIo {
        #[from]
        source: std::io::Error,
    },
    #[error("cache encoding error: {source}")]
    CacheFormat {
        #[from]
        source: bincode::Error,
    },
    #[error("invalid guess: {0}")]
    InvalidGuess(String),
    #[error("no envelope candidate is consistent with the observations")]
    NoCandidates,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DeductionError>;
