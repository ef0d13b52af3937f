//! Error types for lrumemo

use std::fmt;

/// Result type alias for lrumemo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the cache itself.
///
/// Failures of the origin function are never wrapped in this type; they reach
/// the caller of `get` as the origin's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Capacity 0 was requested
    UnsupportedCapacity,

    /// A negative capacity was requested
    InvalidCapacity(i64),

    /// Lookup without any positional or named argument
    InvalidArguments,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedCapacity => write!(f, "Unsupported capacity: a cache of size 0 is not supported"),
            Error::InvalidCapacity(capacity) => write!(f, "Invalid capacity: {} (must be positive)", capacity),
            Error::InvalidArguments => write!(f, "Invalid arguments: cannot derive a key from an empty call"),
        }
    }
}

impl std::error::Error for Error {}
