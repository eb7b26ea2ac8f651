use anyhow::Result;
use clap::Parser;
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

use dividend_analysis::{
    config::{Config, Secrets},
    notify::WebhookNotifier,
    queue::HttpQueue,
    worker::Worker,
};
use market_data::providers::{alpaca_rest::AlpacaProvider, polygon_rest::PolygonProvider};

#[derive(Parser)]
#[command(version, about = "Dividend-capture analysis worker")]
struct Cli {
    /// Path to the worker config file (TOML)
    #[arg(short, long)]
    config: String,
}

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

fn init_logger() {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).with_target(true).init();
        tracing::info!(service = "dividend-worker", "logger initialized");
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let secrets = Secrets::from_env()?;

    let bars = AlpacaProvider::new(&secrets.alpaca_key, &secrets.alpaca_secret)?;
    let dividends = PolygonProvider::new(secrets.polygon_key, config.page_period())?;
    let queue = HttpQueue::new(config.queue_url.clone());
    let notifier = WebhookNotifier::new(config.notify_url.clone());

    let worker = Worker::new(
        Box::new(queue),
        Box::new(dividends),
        Box::new(bars),
        Box::new(notifier),
        &config,
    );
    worker.run().await?;

    Ok(())
}
