//! Settlers self-play benchmark.

use anyhow::Context;
use settlers_core::Layout;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod runner;

use config::BenchConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BenchConfig::from_env()?;

    let layout = match &config.layout {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading layout {}", path.display()))?;
            Some(Arc::new(Layout::from_json(&json)?))
        }
        None => None,
    };

    info!(
        games = config.games,
        players = config.players,
        seed = ?config.seed,
        "Starting settlers benchmark..."
    );

    let report = runner::run(Arc::new(config), layout).await?;
    info!(
        finished = report.finished,
        failed = report.failed,
        average_turns = report.average_turns,
        "benchmark complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
