//! Scripted call sequences against a logging origin

use anyhow::{bail, Result};
use lrumemo::{derive_key, Arguments, CacheStats, LruStore};
use tracing::debug;

/// Outcome of a single scripted call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub call: String,
    pub hit: bool,
}

/// Everything observed while replaying a script
#[derive(Debug)]
pub struct Report {
    pub outcomes: Vec<CallOutcome>,
    /// Keys the origin was invoked with, in invocation order
    pub origin_log: Vec<String>,
    /// Recency rendering after the last call
    pub recency: String,
    pub stats: CacheStats,
}

/// Parse one call spec such as `3`, `a,b` or `x=1,y=2`
pub fn parse_call(spec: &str) -> Result<Arguments<String>> {
    let mut args = Arguments::new();

    for piece in spec.split(',').map(str::trim).filter(|piece| !piece.is_empty()) {
        match piece.split_once('=') {
            Some((name, value)) => {
                let name = name.trim();
                if name.is_empty() {
                    bail!("Missing argument name in '{}'", piece);
                }
                args = args.named(name, value.trim().to_string());
            }
            None => args = args.arg(piece.to_string()),
        }
    }

    Ok(args)
}

/// Run every call in `calls` through a store of the given capacity
pub fn replay(capacity: i64, calls: &[String]) -> Result<Report> {
    let mut origin_log = Vec::new();
    let mut store = LruStore::new(
        |args: &Arguments<String>| {
            let key = derive_key(args)?;
            origin_log.push(key.clone());
            Ok::<_, anyhow::Error>(key)
        },
        capacity,
    )?;

    let mut outcomes = Vec::with_capacity(calls.len());
    for call in calls {
        let args = parse_call(call)?;
        let hits_before = store.stats().hits();
        store.get(&args)?;
        let hit = store.stats().hits() > hits_before;
        debug!(call = %call, hit, "replayed call");

        outcomes.push(CallOutcome {
            call: call.clone(),
            hit,
        });
    }

    let recency = store.to_string();
    let stats = store.stats();
    drop(store);

    Ok(Report {
        outcomes,
        origin_log,
        recency,
        stats,
    })
}
