//! Cancellation hook for long counting queries.
//!
//! A `Deadline` combines an optional wall-clock expiry with an optional
//! shared cancel flag. The counter checks it on every recursive call and
//! aborts with `DeductionError::Cancelled`; partially computed subproblems
//! are never written to the cache.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::{DeductionError, Result};

/// When a counting query must give up.
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use clue_deduce::counting::Deadline;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let deadline = Deadline::none().with_cancel_flag(flag.clone());
/// assert!(!deadline.is_expired());
///
/// flag.store(true, Ordering::Relaxed);
/// assert!(deadline.is_expired());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Deadline {
    expires_at: Option<Instant>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl Deadline {
    /// Never expires.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Expires `limit` from now.
    #[must_use]
    pub fn after(limit: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + limit),
            cancel_flag: None,
        }
    }

    /// Expires `limit` from now, or never if `limit` is `None`.
    #[must_use]
    pub fn from_limit(limit: Option<Duration>) -> Self {
        limit.map_or_else(Self::none, Self::after)
    }

    /// Also expire once `flag` is set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Check whether the deadline has passed or cancellation was requested.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        if let Some(flag) = &self.cancel_flag {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_expired() {
            Err(DeductionError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_expires() {
        assert!(!Deadline::none().is_expired());
        assert!(Deadline::from_limit(None).check().is_ok());
    }

    #[test]
    fn test_zero_limit_expires_immediately() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.is_expired());
        assert!(matches!(deadline.check(), Err(DeductionError::Cancelled)));
    }

    #[test]
    fn test_generous_limit() {
        let deadline = Deadline::from_limit(Some(Duration::from_secs(3600)));
        assert!(!deadline.is_expired());
    }
}
