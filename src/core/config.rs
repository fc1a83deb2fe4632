//! Configuration types.
//!
//! - `CounterConfig`: cache persistence and query time limit for the
//!   state counter
//! - `GameConfig`: seating, seed and round limit for a simulated game
//!
//! Both are plain data with builder methods, so callers can keep them in
//! files alongside other settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the memoized state counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Where the durable cache lives. `None` keeps the cache in memory only.
    pub cache_path: Option<PathBuf>,

    /// Skip the write at session end when no entries were added since load.
    pub save_only_if_changed: bool,

    /// Wall-clock limit for one envelope query. `None` = unlimited.
    pub time_limit: Option<Duration>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            cache_path: None,
            save_only_if_changed: true,
            time_limit: None,
        }
    }
}

impl CounterConfig {
    /// Persist the cache at the given path.
    #[must_use]
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Bound each envelope query by a wall-clock limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Always rewrite the cache file at session end.
    #[must_use]
    pub fn always_save(mut self) -> Self {
        self.save_only_if_changed = false;
        self
    }
}

/// Settings for a simulated game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (1-255).
    pub player_count: usize,

    /// Seed for the deal and for random guessing.
    pub seed: u64,

    /// Stop after this many full rounds without a winner.
    pub max_rounds: u32,
}

impl GameConfig {
    /// Create a new game configuration.
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            seed: 0,
            max_rounds: 200,
        }
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the round limit.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }
}
