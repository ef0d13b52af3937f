//! Call arguments and cache key derivation
//!
//! A key is the `Display` form of every positional value, followed by every
//! named value as `name=value`, joined with [`KEY_SEPARATOR`]. Named values
//! are kept sorted by name, so the order in which they were supplied does
//! not change the key.
//!
//! Keys are only as distinct as the string forms of the values: `"a|b"` as a
//! single positional value derives the same key as `"a"` followed by `"b"`.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::{Error, Result};

/// Separator placed between the stringified arguments of a key
pub const KEY_SEPARATOR: &str = "|";

/// Arguments of one call to a cached function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments<A> {
    positional: Vec<A>,
    named: BTreeMap<String, A>,
}

impl<A> Arguments<A> {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self {
            positional: Vec::new(),
            named: BTreeMap::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: A) -> Self {
        self.positional.push(value);
        self
    }

    /// Set a named argument, replacing any earlier value under the same name
    pub fn named(mut self, name: impl Into<String>, value: A) -> Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Positional arguments in call order
    pub fn positional(&self) -> &[A] {
        &self.positional
    }

    /// Look up a named argument
    pub fn named_value(&self, name: &str) -> Option<&A> {
        self.named.get(name)
    }

    /// Named arguments, sorted by name
    pub fn named_values(&self) -> impl Iterator<Item = (&str, &A)> {
        self.named.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Total number of arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// True when there is nothing to derive a key from
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl<A> Default for Arguments<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FromIterator<A> for Arguments<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().collect(),
            named: BTreeMap::new(),
        }
    }
}

/// Derive the cache key for a call
///
/// # Returns
/// * `Err(Error::InvalidArguments)` - if `args` holds no values at all
pub fn derive_key<A: Display>(args: &Arguments<A>) -> Result<String> {
    if args.is_empty() {
        return Err(Error::InvalidArguments);
    }

    let pieces: Vec<String> = args
        .positional
        .iter()
        .map(|value| value.to_string())
        .chain(args.named.iter().map(|(name, value)| format!("{}={}", name, value)))
        .collect();

    Ok(pieces.join(KEY_SEPARATOR))
}
