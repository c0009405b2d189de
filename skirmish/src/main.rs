//! Skirmish roster and encounter tracker.
//!
//! Runs a headless, line-oriented session over stdin/stdout:
//!
//! ```bash
//! cargo run -p skirmish -- --seed
//! ```
//!
//! Configuration comes from the environment (a `.env` file is honored):
//! `SKIRMISH_DEFAULT_HP`, `SKIRMISH_AVATAR_BASE_URL`, `SKIRMISH_SEED`.
//! Logs go to stderr and are filtered with `RUST_LOG`.

mod headless;
mod image;

use anyhow::{Context, Result};
use skirmish_core::{Tracker, TrackerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish=info,skirmish_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut config = TrackerConfig::from_env().context("Invalid configuration")?;
    if args.iter().any(|a| a == "--seed") {
        config = config.with_sample_data(true);
    }

    let tracker = Tracker::new(config).context("Failed to start tracker")?;
    headless::run_headless(tracker).await
}

fn print_help() {
    println!("Skirmish roster and encounter tracker");
    println!();
    println!("Usage: skirmish [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed       Start with the sample team and opening encounter");
    println!("  -h, --help   Print this help");
    println!();
    println!("Environment:");
    println!("  SKIRMISH_DEFAULT_HP        Hit points for new operatives (default 30)");
    println!("  SKIRMISH_AVATAR_BASE_URL   Generated-avatar service base URL");
    println!("  SKIRMISH_SEED              Start with sample data (true/false)");
    println!("  RUST_LOG                   Log filter (logs go to stderr)");
}
