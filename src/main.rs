//! Finboard main entry point

use clap::Parser;
use finboard_api::start_server;
use finboard_config::Config;
use finboard_store::Store;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finboard")]
#[command(version = "0.1.0")]
#[command(about = "Personal finance dashboard API server", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    log::info!("config loaded from {}", args.config.display());
    log::info!("opening database {}", config.database.url);

    let store = Store::connect(&config.database.url).await?;
    log::info!("database ready, migrations applied");

    start_server(config, store).await
}
