//! lrumemo-replay - run a scripted call sequence through an LRU cache

mod replay;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::replay::replay;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = lrumemo::DEFAULT_CAPACITY, allow_negative_numbers = true)]
    capacity: i64,

    /// Calls to replay, e.g. `3`, `a,b` or `x=1,y=2`
    #[arg(allow_hyphen_values = true)]
    calls: Vec<String>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Replaying {} calls with capacity {}", args.calls.len(), args.capacity);

    let report = replay(args.capacity, &args.calls)?;

    for outcome in &report.outcomes {
        println!("{:<24} {}", outcome.call, if outcome.hit { "hit" } else { "miss" });
    }

    println!("\norigin calls: [{}]", report.origin_log.join(", "));
    println!("recency:      {}", report.recency);
    println!(
        "stats:        {} hits, {} misses, {} evictions ({:.1}% hit rate)",
        report.stats.hits(),
        report.stats.misses(),
        report.stats.evictions(),
        report.stats.hit_ratio() * 100.0
    );

    Ok(())
}
