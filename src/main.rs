use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use star_ledger::config::Config;
use star_ledger::rating::engine::RatingEngine;
use star_ledger::replay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so stdout carries only results)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "star_ledger=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("⭐ star-ledger v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "star-ledger.toml".to_string());

    let config = Config::load(&config_path)?;
    info!("Config loaded from {}", config_path);

    let config = Arc::new(config);
    let engine = Arc::new(RatingEngine::new(config)?);

    // Start decay scheduler
    let decay_engine = engine.clone();
    tokio::spawn(async move {
        decay_engine.run_decay_loop().await;
    });

    // Replay commands from stdin, one JSON object per line
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(out) = replay::handle_line(&engine, &line) {
                    println!("{}", out);
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        }
    }

    info!("Input closed, final stats: {}", engine.get_stats());
    Ok(())
}
