//! Memo tables for the state counter.
//!
//! The counter only talks to a `StateCache` (get/put), so it can be tested
//! against a plain in-memory table and run in production against a cache
//! that is loaded at session start and flushed at session end.
//!
//! The table only grows: entries are never evicted.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{CounterConfig, DeductionError, Result};

use super::combin::StateCount;
use super::signature::Signature;

/// Signature → count memo table.
pub trait StateCache {
    /// Look up a previously computed count.
    fn get(&self, signature: &Signature) -> Option<StateCount>;

    /// Record a computed count.
    fn put(&mut self, signature: Signature, count: StateCount);

    /// Number of entries.
    fn len(&self) -> usize;

    /// Check if the cache has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory cache backed by an `FxHashMap`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryCache {
    entries: FxHashMap<Signature, StateCount>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &StateCount)> {
        self.entries.iter()
    }
}

impl StateCache for MemoryCache {
    fn get(&self, signature: &Signature) -> Option<StateCount> {
        self.entries.get(signature).copied()
    }

    fn put(&mut self, signature: Signature, count: StateCount) {
        self.entries.insert(signature, count);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A `MemoryCache` persisted to a file with `bincode`.
///
/// `load` never fails: a missing or unreadable file yields an empty cache
/// and a log line. `save` skips the write when nothing was added since the
/// last load or save, unless the cache was configured to always save.
#[derive(Debug)]
pub struct DurableCache {
    path: PathBuf,
    entries: MemoryCache,
    size_at_sync: usize,
    save_only_if_changed: bool,
}

impl DurableCache {
    /// Load the cache stored at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => {
                info!(path = %path.display(), entries = entries.len(), "loaded state cache");
                entries
            }
            Err(DeductionError::CacheIo { source }) if source.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no state cache found, starting empty");
                MemoryCache::new()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding unreadable state cache");
                MemoryCache::new()
            }
        };

        let size_at_sync = entries.len();
        Self {
            path,
            entries,
            size_at_sync,
            save_only_if_changed: true,
        }
    }

    /// Load the cache named by `config`, if it names one.
    pub fn from_config(config: &CounterConfig) -> Option<Self> {
        let path = config.cache_path.as_ref()?;
        let mut cache = Self::load(path);
        cache.save_only_if_changed = config.save_only_if_changed;
        Some(cache)
    }

    /// File backing this cache.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if entries were added since the last load or save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.entries.len() != self.size_at_sync
    }

    /// Write the cache to disk.
    ///
    /// Returns `Ok(false)` when the write was skipped because nothing
    /// changed.
    pub fn save(&mut self) -> Result<bool> {
        if self.save_only_if_changed && !self.is_dirty() {
            debug!(path = %self.path.display(), "state cache unchanged, not saving");
            return Ok(false);
        }
        self.save_forced()?;
        Ok(true)
    }

    /// Write the cache to disk unconditionally.
    pub fn save_forced(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // write-then-rename so a crash never leaves a truncated cache behind
        let tmp = self.path.with_extension("tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            bincode::serialize_into(writer, &self.entries)?;
        }
        fs::rename(&tmp, &self.path)?;

        self.size_at_sync = self.entries.len();
        info!(path = %self.path.display(), entries = self.size_at_sync, "saved state cache");
        Ok(())
    }
}

impl StateCache for DurableCache {
    fn get(&self, signature: &Signature) -> Option<StateCount> {
        self.entries.get(signature)
    }

    fn put(&mut self, signature: Signature, count: StateCount) {
        self.entries.put(signature, count);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn read_entries(path: &Path) -> Result<MemoryCache> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}
