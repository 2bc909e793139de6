use ferrumset::{console, Dispatcher, EngineConfig};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EngineConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("FerrumSet starting...");
    info!(
        "Key-space capacity {}, default SSCAN COUNT {}, RNG seed {:?}",
        config.initial_capacity, config.scan_count, config.rng_seed
    );

    let dispatcher = Dispatcher::from_config(&config);
    console::run(dispatcher, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
