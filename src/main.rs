use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_api::{
    cache::{Cache, SWEEP_INTERVAL},
    create_router, AppState, Config, Providers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        cache_ttl_secs = config.cache_ttl_secs,
        upstream_timeout_secs = config.upstream_timeout_secs,
        "Configuration loaded"
    );

    let cache = Cache::new(config.cache_ttl());
    let sweeper = cache.spawn_sweeper(SWEEP_INTERVAL);

    let providers = Providers::from_config(&config).context("Failed to build upstream clients")?;
    let state = Arc::new(AppState::new(providers, cache));
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
