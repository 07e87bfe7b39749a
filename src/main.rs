//! Market Pager - market-data tool server
//!
//! Serves cached, token-budgeted market-data tool calls over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_pager::api::create_router;
use market_pager::tools::{FixtureSource, MarketDataSource};
use market_pager::{spawn_cleanup_task, AppState, Config, ToolService};

/// Main entry point for the tool server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the market-data fixtures, if configured
/// 4. Create the tool service and its shared cache
/// 5. Start the background expiry sweep
/// 6. Serve HTTP until SIGINT/SIGTERM, then shut down gracefully
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_pager=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Market Pager");

    let config = Config::from_env();
    info!(
        "Configuration loaded: token_budget={}, overhead={}, capacity={}, short_ttl={}s, long_ttl={}s, port={}, cleanup_interval={}s",
        config.token_budget,
        config.overhead_tokens,
        config.cache_capacity,
        config.short_ttl,
        config.long_ttl,
        config.server_port,
        config.cleanup_interval
    );

    let source: Arc<dyn MarketDataSource> = match &config.fixture_dir {
        Some(dir) => Arc::new(
            FixtureSource::load_dir(dir)
                .with_context(|| format!("loading fixtures from {}", dir.display()))?,
        ),
        None => {
            warn!("FIXTURE_DIR not set, every tool call will report unknown tickers");
            Arc::new(FixtureSource::new())
        }
    };

    let shutdown = CancellationToken::new();
    let service = ToolService::from_config(&config, source).with_shutdown(shutdown.clone());

    let cleanup_handle = (config.cleanup_interval > 0).then(|| {
        info!("Background expiry sweep started");
        spawn_cleanup_task(
            service.cache().clone(),
            Duration::from_secs(config.cleanup_interval),
        )
    });

    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown, cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then cancels in-flight exports and stops
/// the expiry sweep.
async fn shutdown_signal(shutdown: CancellationToken, cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();
    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep aborted");
    }
}
