use anyhow::Result;
use dotenv::dotenv;
use reconciler_rust::{driver, Config};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting stat reconciler...");

    let config = Config::from_env()?;
    info!(
        "Candidates: {}, reference: {}, thresholds {}/{}",
        config.candidates_path.display(),
        config.reference_path.display(),
        config.matcher.accept_threshold,
        config.matcher.disambiguation_threshold
    );

    let started = Instant::now();
    let summary = driver::run(&config)?;

    info!(
        "Reconciled {} rows in {:.2?}: {} matched, {} unmatched, {} malformed, {} discrepancies",
        summary.reference_rows,
        started.elapsed(),
        summary.matched,
        summary.unmatched_total(),
        summary.malformed,
        summary.discrepancies
    );

    Ok(())
}
