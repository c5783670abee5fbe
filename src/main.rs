use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use blanktable::api::{start_server, AppState, ServerConfig};
use blanktable::counter::CounterProxy;
use blanktable::upstream::{UpstreamClient, UpstreamConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("blanktable=info".parse()?))
        .init();

    tracing::info!("blanktable proxy starting...");

    let upstream_config = UpstreamConfig::from_env();
    let missing = upstream_config.missing_settings();
    if !missing.is_empty() {
        // Not fatal: upstream calls fail and clients fall back to their cache.
        tracing::warn!(
            missing = ?missing,
            "Upstream credentials incomplete, like counter requests will fail"
        );
    }

    tracing::info!(
        base_url = %upstream_config.base_url,
        count_field = %upstream_config.count_field,
        "Using upstream record store"
    );

    let count_field = upstream_config.count_field.clone();
    let upstream = UpstreamClient::new(upstream_config)?;
    let counter = Arc::new(CounterProxy::with_field(upstream, count_field));
    let state = Arc::new(AppState::new(counter));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    start_server(ServerConfig::from_env(), state, shutdown).await?;

    Ok(())
}
