//! Profile frame caching for one conversion batch.
//!
//! A profile's frame is computed once per distinct profile key and then read
//! by every member that uses the profile. The cache is safe to share across
//! worker threads:
//! - the key map is locked only long enough to find or create the key's slot
//! - each slot is a once-cell, so exactly one caller computes a given key and
//!   concurrent callers for that key wait only for that first computation
//! - hit/miss counters are atomics
//!
//! # Example
//! ```ignore
//! let cache = ProfileFrameCache::new();
//! let frame = cache.get_or_compute("W310x39", || member.profile_boundary());
//! let stats = cache.stats();
//! println!("profiles: {}, hits: {}", stats.entries, stats.hits);
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::profile::{ProfileFrame, SectionPoint};

type Slot = Arc<OnceLock<ProfileFrame>>;

/// Insert-if-absent cache of [`ProfileFrame`]s keyed by profile identity.
#[derive(Debug)]
pub struct ProfileFrameCache<K = String> {
    slots: Mutex<HashMap<K, Slot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Cache statistics for diagnostics and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileFrameCacheStats {
    /// Number of distinct profile keys seen.
    pub entries: usize,
    /// Lookups answered by an already computed frame.
    pub hits: usize,
    /// Lookups that computed a frame.
    pub misses: usize,
}

impl ProfileFrameCacheStats {
    /// Returns the cache hit rate as a value between 0.0 and 1.0.
    /// Returns 0.0 if no lookups have been made.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl<K> Default for ProfileFrameCache<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }
}

impl<K: Eq + Hash> ProfileFrameCache<K> {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the frame for `key`, deriving it from the boundary produced by
    /// `boundary` on first use. `boundary` is not called on a hit.
    pub fn get_or_compute<Q, F>(&self, key: &Q, boundary: F) -> ProfileFrame
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce() -> Vec<Vec<SectionPoint>>,
    {
        let slot = self.slot(key);
        let mut computed = false;
        let frame = *slot.get_or_init(|| {
            computed = true;
            ProfileFrame::from_boundary(&boundary())
        });
        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        frame
    }

    /// Returns the frame for `key` if it has already been computed.
    pub fn get<Q>(&self, key: &Q) -> Option<ProfileFrame>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).and_then(|slot| slot.get().copied())
    }

    /// Returns cache statistics.
    #[must_use]
    pub fn stats(&self) -> ProfileFrameCacheStats {
        let entries = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        ProfileFrameCacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drops every cached frame and resets the counters (batch end).
    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn slot<Q>(&self, key: &Q) -> Slot
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        slots.insert(key.to_owned(), Arc::clone(&slot));
        slot
    }
}
