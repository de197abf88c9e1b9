//! sofascore-relay: fetches SofaScore sport pages on behalf of browser
//! clients and relays the HTML back with permissive CORS.

mod config;
mod error;
mod proxy;
mod routes;
mod server;

use config::RelayConfig;
use server::AppState;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1).cloned())
        .or_else(|| args.get(1).filter(|a| !a.starts_with('-')).cloned())
        .or_else(|| std::env::var("RELAY_CONFIG").ok())
        .unwrap_or_else(|| "sofascore-relay.toml".to_string());

    // A local .env may supply PORT / RELAY_* before the config is read
    let dotenv_path = dotenvy::dotenv().ok();

    let config = RelayConfig::load(&config_path)?;

    // Build the tokio runtime first; the tonic OTLP exporter needs a reactor
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let tracing_guard = relay_tracing::init_tracing(&config.tracing);

        tracing::info!(
            config_path = %config_path,
            dotenv = ?dotenv_path,
            listen_address = %config.server.listen_address(),
            upstream_base = %config.upstream.base_url,
            timeout_secs = config.upstream.timeout_secs,
            otlp_export = tracing_guard.is_exporting(),
            "Starting sofascore-relay"
        );

        run(config).await
    })
}

async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    server::run(state).await
}
