//! Runs the chain and projection workloads across the configured sizes.
//!
//! Pass a TOML file to override the defaults:
//!
//! ```text
//! cargo run --example chain_demo -- deltablue.toml
//! ```
//!
//! Set `RUST_LOG=deltablue=debug` to follow every constraint added.

use std::time::Instant;

use deltablue::drivers::{chain_test_with, projection_test_with};
use deltablue::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    println!("DeltaBlue benchmark");
    println!("===================");
    println!(
        "change repetitions: {}, chain edits: {}",
        config.planner.change_repetitions, config.drivers.chain_edits
    );
    println!();

    for &n in &config.drivers.inner_iterations {
        let start = Instant::now();
        chain_test_with(n, &config.drivers, config.planner.clone())?;
        let chain = start.elapsed();

        let start = Instant::now();
        projection_test_with(n, config.planner.clone())?;
        let projection = start.elapsed();

        println!(
            "n = {:>6}  chain: {:>10.3?}  projection: {:>10.3?}",
            n, chain, projection
        );
    }

    println!();
    println!("All checks passed");
    Ok(())
}
