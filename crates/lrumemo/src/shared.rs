//! Lock-guarded store for use across threads
//!
//! One mutex covers the whole lookup: key derivation, the origin call on a
//! miss and the recency update. A slow origin therefore serializes every
//! caller, including callers asking for unrelated keys. The mutex is not
//! reentrant: an origin that calls back into the same store deadlocks.

use std::fmt;
use std::fmt::Display;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::key::Arguments;
use crate::stats::CacheStats;
use crate::store::LruStore;

/// [`LruStore`] behind a single mutex
pub struct SharedLruStore<A, V, F> {
    inner: Mutex<LruStore<A, V, F>>,
}

impl<A, V, F> SharedLruStore<A, V, F>
where
    A: Display,
{
    /// Create a shared store holding at most `capacity` entries
    pub fn new<E>(origin: F, capacity: i64) -> Result<Self>
    where
        F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
    {
        Ok(Self::from_store(LruStore::new(origin, capacity)?))
    }

    /// Return a copy of the cached value for `args`, calling the origin on a miss
    pub fn get<E>(&self, args: &Arguments<A>) -> std::result::Result<V, E>
    where
        F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
        E: From<Error>,
        V: Clone,
    {
        let mut store = self.inner.lock();
        store.get(args).cloned()
    }
}

impl<A, V, F> SharedLruStore<A, V, F> {
    /// Share an existing store
    pub fn from_store(store: LruStore<A, V, F>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Snapshot of the hit/miss counters
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Take the store back out
    pub fn into_inner(self) -> LruStore<A, V, F> {
        self.inner.into_inner()
    }
}

impl<A, V, F> fmt::Display for SharedLruStore<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self.inner.lock())
    }
}
