//! Function wrapper backed by an [`LruStore`]

use std::fmt::Display;

use crate::error::{Error, Result};
use crate::key::Arguments;
use crate::stats::CacheStats;
use crate::store::LruStore;

/// A function whose results are cached by argument
pub struct Memoized<A, V, F> {
    store: LruStore<A, V, F>,
}

/// Wrap `func` in an LRU cache holding at most `capacity` results
///
/// ```
/// use lrumemo::{memoize, Arguments, Error};
///
/// let mut add = memoize(10, |args: &Arguments<i32>| {
///     Ok::<_, Error>(args.positional().iter().sum::<i32>())
/// })
/// .unwrap();
///
/// assert_eq!(add.call(&Arguments::new().arg(3).arg(2)), Ok(5));
/// ```
pub fn memoize<A, V, E, F>(capacity: i64, func: F) -> Result<Memoized<A, V, F>>
where
    A: Display,
    F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
{
    Ok(Memoized {
        store: LruStore::new(func, capacity)?,
    })
}

impl<A, V, F> Memoized<A, V, F>
where
    A: Display,
    V: Clone,
{
    /// Call the wrapped function, or return the cached result
    pub fn call<E>(&mut self, args: &Arguments<A>) -> std::result::Result<V, E>
    where
        F: FnMut(&Arguments<A>) -> std::result::Result<V, E>,
        E: From<Error>,
    {
        self.store.get(args).cloned()
    }
}

impl<A, V, F> Memoized<A, V, F> {
    /// Number of cached results
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if nothing is cached yet
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Counters of the underlying store
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memoize_single_key() {
        let mut increment = memoize(10, |args: &Arguments<i32>| Ok::<_, Error>(args.positional()[0] + 1)).unwrap();

        assert_eq!(increment.call(&Arguments::new().arg(3)), Ok(4));
        assert_eq!(increment.call(&Arguments::new().arg(2)), Ok(3));
        assert_eq!(increment.len(), 2);
    }

    #[test]
    fn test_memoize_named_arguments() {
        let mut scale = memoize(10, |args: &Arguments<i32>| {
            let value = args.positional()[0];
            let factor = args.named_value("factor").copied().unwrap_or(1);
            Ok::<_, Error>(value * factor)
        })
        .unwrap();

        assert_eq!(scale.call(&Arguments::new().arg(3).named("factor", 4)), Ok(12));
        assert_eq!(scale.call(&Arguments::new().arg(3)), Ok(3));
        assert_eq!(scale.stats().misses(), 2);
    }

    #[test]
    fn test_memoize_no_arguments() {
        let mut nothing = memoize(10, |_: &Arguments<i32>| Ok::<_, Error>("nope")).unwrap();

        assert_eq!(nothing.call(&Arguments::new()), Err(Error::InvalidArguments));
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_memoize_invalid_capacity() {
        let identity = |args: &Arguments<i32>| Ok::<_, Error>(args.positional()[0]);
        assert!(matches!(memoize(0, identity), Err(Error::UnsupportedCapacity)));
        assert!(matches!(memoize(-1, identity), Err(Error::InvalidCapacity(-1))));
    }
}
