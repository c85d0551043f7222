use anyhow::Context;
use ingest::JsonRepository;
use query::DatasetStore;
use std::path::Path;

// Entry point for `cargo run -p web-server`: serve the converted datasets
// with settings from `config.toml` and the environment.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config(Path::new("config.toml"))?;
    let _guard = configuration::init_tracing(&config.telemetry)?;

    let repository = JsonRepository::new(&config.data.output_dir);
    let datasets = repository
        .load_all()
        .with_context(|| format!("Failed to load datasets from {}", config.data.output_dir.display()))?;

    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("Invalid server address {}", config.server.address()))?;
    web_server::run_server(addr, DatasetStore::new(datasets), config.server.static_dir.as_deref()).await
}
