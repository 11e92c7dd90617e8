use std::path::PathBuf;

use anyhow::Context;
use relay::config::Config;
use relay::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("relay=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let cfg = Config::load(path.as_deref()).context("failed to load configuration")?;

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
