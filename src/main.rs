use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::info;

mod api;
mod config;
mod engine;
mod message;
mod models;
mod probe;
mod state;

#[derive(Debug, Parser)]
#[command(name = "netwatch", version, about = "Endpoint reachability monitor with Telegram alerts")]
struct Args {
    /// Path to the JSON monitor configuration
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run a single monitoring cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into()))
        .with_ansi(true)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.once {
        let config = config::load_runtime_config(&args.config)?;
        return engine::run_once(&config).await;
    }

    tokio::select! {
        result = engine::run_forever(&args.config) => result,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received. Closing monitor...");
            Ok(())
        }
    }
}
