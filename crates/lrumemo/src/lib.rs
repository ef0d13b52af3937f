//! # lrumemo
//!
//! Memoizing LRU cache that fronts an arbitrary origin function.
//!
//! ## Architecture
//! - **Key**: call arguments stringified into one `|`-separated key
//! - **HashMap**: AHash map from key to cached value and list slot (O(1))
//! - **Recency list**: index-based doubly-linked list for eviction (O(1))
//! - **Origin**: called only on a miss; its errors pass through unchanged
//!
//! ```
//! use lrumemo::{Arguments, Error, LruStore};
//!
//! let mut store = LruStore::new(|args: &Arguments<&str>| Ok::<_, Error>(args.positional()[0].len()), 2)?;
//!
//! store.get::<Error>(&Arguments::new().arg("a"))?;
//! store.get::<Error>(&Arguments::new().arg("bb"))?;
//! store.get::<Error>(&Arguments::new().arg("ccc"))?;
//!
//! assert_eq!(store.to_string(), "[ ccc | bb ]");
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]

mod error;
mod key;
mod lru;
mod memoize;
mod shared;
mod stats;
mod store;

pub use error::{Error, Result};
pub use key::{derive_key, Arguments, KEY_SEPARATOR};
pub use memoize::{memoize, Memoized};
pub use shared::SharedLruStore;
pub use stats::CacheStats;
pub use store::{LruStore, DEFAULT_CAPACITY};
