//! LruStore: memoizing cache in front of an origin function

use std::collections::HashMap;
use std::fmt;
use std::fmt::Display;
use std::marker::PhantomData;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::key::{derive_key, Arguments};
use crate::lru::RecencyList;
use crate::stats::CacheStats;

/// Capacity used by [`LruStore::with_default_capacity`]
pub const DEFAULT_CAPACITY: i64 = 1024;

/// Upper bound on slots reserved up front; larger stores grow on demand
const MAX_PREALLOCATED: usize = DEFAULT_CAPACITY as usize;

/// Cached result for one key
struct Entry<V> {
    value: V,
    /// Slot of the key's node in the recency list
    slot: usize,
}

/// Least-recently-used cache that calls `origin` on a miss
///
/// The origin has the shape `FnMut(&Arguments<A>) -> Result<V, E>`. Its
/// error type must absorb the cache's own [`Error`] through `From`, so a
/// failing origin reaches the caller of [`get`](Self::get) untouched.
///
/// The store is single-threaded; see [`SharedLruStore`](crate::SharedLruStore)
/// for a locked variant.
pub struct LruStore<A, V, F> {
    origin: F,
    entries: HashMap<String, Entry<V>, RandomState>,
    recency: RecencyList<String>,
    stats: CacheStats,
    capacity: usize,
    _args: PhantomData<fn(&Arguments<A>)>,
}

/// Validate a requested capacity
pub(crate) fn checked_capacity(capacity: i64) -> Result<usize> {
    match capacity {
        0 => Err(Error::UnsupportedCapacity),
        c if c < 0 => Err(Error::InvalidCapacity(c)),
        c => usize::try_from(c).map_err(|_| Error::InvalidCapacity(c)),
    }
}

impl<A, V, F> LruStore<A, V, F>
where
    A: Display,
{
    /// Create a store holding at most `capacity` entries
    ///
    /// # Arguments
    /// * `origin` - Function called with the original arguments on a miss
    /// * `capacity` - Maximum number of cached entries
    ///
    /// # Returns
    /// * `Err(Error::UnsupportedCapacity)` - if `capacity` is 0
    /// * `Err(Error::InvalidCapacity)` - if `capacity` is negative
    pub fn new<E>(origin: F, capacity: i64) -> Result<Self>
    where
        F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
    {
        let capacity = checked_capacity(capacity)?;
        // One extra slot: a miss inserts before the tail is evicted
        let reserved = capacity.min(MAX_PREALLOCATED) + 1;
        debug!(capacity, "created LRU store");

        Ok(Self {
            origin,
            entries: HashMap::with_capacity_and_hasher(reserved, RandomState::new()),
            recency: RecencyList::with_capacity(reserved),
            stats: CacheStats::new(),
            capacity,
            _args: PhantomData,
        })
    }

    /// Create a store with [`DEFAULT_CAPACITY`]
    pub fn with_default_capacity<E>(origin: F) -> Result<Self>
    where
        F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
    {
        Self::new(origin, DEFAULT_CAPACITY)
    }

    /// Return the cached value for `args`, calling the origin on a miss
    ///
    /// A hit makes the key the most recent one. A miss stores the origin's
    /// value as the most recent entry and evicts the least recent entry if
    /// the store overflows. If the origin fails, its error is returned and
    /// the store is left untouched.
    pub fn get<E>(&mut self, args: &Arguments<A>) -> std::result::Result<&V, E>
    where
        F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
        E: From<Error>,
    {
        let key = derive_key(args)?;

        if let Some(slot) = self.entries.get(&key).map(|entry| entry.slot) {
            trace!(key = %key, "cache hit");
            self.recency.move_to_front(slot);
            self.stats.record_hit();
            return Ok(&self.entries[&key].value);
        }

        debug!(key = %key, "cache miss");
        let value = (self.origin)(args)?;
        self.stats.record_miss();

        let slot = self.recency.push_front(key.clone());
        self.entries.insert(key.clone(), Entry { value, slot });

        if self.recency.len() > self.capacity {
            self.evict();
        }

        Ok(&self.entries[&key].value)
    }

    /// Check whether `args` is cached without touching recency
    pub fn contains(&self, args: &Arguments<A>) -> Result<bool> {
        let key = derive_key(args)?;
        Ok(self.entries.contains_key(&key))
    }

    /// Drop the entry for `args`, returning its value if it was cached
    pub fn invalidate(&mut self, args: &Arguments<A>) -> Result<Option<V>> {
        let key = derive_key(args)?;
        Ok(self.remove_key(&key).map(|value| {
            debug!(key = %key, "invalidated cache entry");
            self.stats.record_invalidation();
            value
        }))
    }
}

impl<A, V, F> LruStore<A, V, F> {
    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the next miss will evict
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Keys from most recently to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.recency.iter().map(String::as_str)
    }

    /// Hit/miss/eviction counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.reset();
    }

    fn evict(&mut self) {
        if let Some(key) = self.recency.pop_back() {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, "evicted least recently used entry");
        }
    }

    fn remove_key(&mut self, key: &str) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(entry.slot);
        Some(entry.value)
    }
}

impl<A, V, F> fmt::Display for LruStore<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recency.is_empty() {
            return write!(f, "[ | ]");
        }

        write!(f, "[ ")?;
        for (i, key) in self.keys().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", key)?;
        }
        write!(f, " ]")
    }
}

impl<A, V, F> fmt::Debug for LruStore<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("recency", &format_args!("{}", self))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Cache(Error),
        Unknown(String),
    }

    impl From<Error> for TestError {
        fn from(err: Error) -> Self {
            TestError::Cache(err)
        }
    }

    fn example(key: &str) -> std::result::Result<i64, TestError> {
        match key {
            "a" => Ok(123),
            "b" => Ok(456),
            "c" => Ok(123456),
            "d" => Ok(765432),
            "e" => Ok(7981454),
            other => Err(TestError::Unknown(other.to_string())),
        }
    }

    fn call(key: &str) -> Arguments<&str> {
        Arguments::new().arg(key)
    }

    fn assert_consistent<A, V, F>(store: &LruStore<A, V, F>) {
        assert_eq!(store.keys().count(), store.len());
        assert_eq!(store.recency.len(), store.len());
        assert!(store.len() <= store.capacity());
        for key in store.keys() {
            assert!(store.entries.contains_key(key));
        }
    }

    #[test]
    fn test_store_capacity_validation() {
        let origin = |args: &Arguments<&str>| example(args.positional()[0]);
        assert_eq!(LruStore::new(origin, 0).unwrap_err(), Error::UnsupportedCapacity);
        assert_eq!(LruStore::new(origin, -1).unwrap_err(), Error::InvalidCapacity(-1));
        assert_eq!(LruStore::new(origin, 1).unwrap().capacity(), 1);
        assert_eq!(
            LruStore::with_default_capacity(origin).unwrap().capacity(),
            DEFAULT_CAPACITY as usize
        );
    }

    #[test]
    fn test_store_huge_capacity() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), i64::MAX).unwrap();
        assert_eq!(store.capacity(), i64::MAX as usize);

        for key in ["a", "b", "c", "a"] {
            store.get(&call(key)).unwrap();
        }

        assert_eq!(store.to_string(), "[ a | c | b ]");
        assert_eq!(store.stats().misses(), 3);
        assert!(!store.is_full());
        assert_consistent(&store);
    }

    #[test]
    fn test_store_hit_and_miss() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 2).unwrap();

        assert_eq!(store.get(&call("a")), Ok(&123));
        assert_eq!(store.get(&call("a")), Ok(&123));
        assert_eq!(store.stats().misses(), 1);
        assert_eq!(store.stats().hits(), 1);
        assert_consistent(&store);
    }

    #[test]
    fn test_store_eviction() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 2).unwrap();

        store.get(&call("a")).unwrap();
        store.get(&call("b")).unwrap();
        assert!(store.is_full());
        store.get(&call("c")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.to_string(), "[ c | b ]");
        assert_eq!(store.stats().evictions(), 1);
        assert!(!store.contains(&call("a")).unwrap());
        assert_consistent(&store);
    }

    #[test]
    fn test_store_capacity_one() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 1).unwrap();

        store.get(&call("a")).unwrap();
        store.get(&call("b")).unwrap();
        store.get(&call("b")).unwrap();

        assert_eq!(store.to_string(), "[ b ]");
        assert_eq!(store.stats().misses(), 2);
        assert_consistent(&store);
    }

    #[test]
    fn test_store_origin_failure_leaves_store_untouched() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 2).unwrap();
        store.get(&call("a")).unwrap();

        assert_eq!(store.get(&call("zz")), Err(TestError::Unknown("zz".to_string())));
        assert_eq!(store.len(), 1);
        assert_eq!(store.to_string(), "[ a ]");
        assert_eq!(store.stats().lookups(), 1);
        assert_consistent(&store);
    }

    #[test]
    fn test_store_empty_arguments() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 2).unwrap();

        assert_eq!(
            store.get(&Arguments::new()),
            Err(TestError::Cache(Error::InvalidArguments))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_invalidate() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 3).unwrap();
        store.get(&call("a")).unwrap();
        store.get(&call("b")).unwrap();
        store.get(&call("c")).unwrap();

        assert_eq!(store.invalidate(&call("b")), Ok(Some(456)));
        assert_eq!(store.invalidate(&call("b")), Ok(None));
        assert_eq!(store.to_string(), "[ c | a ]");
        assert_eq!(store.stats().invalidations(), 1);
        assert_consistent(&store);

        // Freed room is used before anything is evicted
        store.get(&call("d")).unwrap();
        assert_eq!(store.to_string(), "[ d | c | a ]");
        assert_eq!(store.stats().evictions(), 0);
        assert_consistent(&store);
    }

    #[test]
    fn test_store_clear() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 3).unwrap();
        store.get(&call("a")).unwrap();
        store.get(&call("b")).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.to_string(), "[ | ]");
        assert_eq!(store.stats(), CacheStats::default());
        assert_consistent(&store);
    }

    #[test]
    fn test_store_debug() {
        let mut store = LruStore::new(|args: &Arguments<&str>| example(args.positional()[0]), 3).unwrap();
        store.get(&call("a")).unwrap();

        let debug = format!("{:?}", store);
        assert!(debug.contains("capacity: 3"));
        assert!(debug.contains("[ a ]"));
    }
}
