pub mod core;
pub mod routes;

#[cfg(test)]
mod test_support;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::core::error::SiteResult;
use crate::core::state::{AppState, SiteConfig};

pub fn run() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mineshish_lib=debug")),
        )
        .init();

    tracing::info!("Mineshish site starting...");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve()) {
        tracing::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn serve() -> SiteResult<()> {
    let config = SiteConfig::from_env()?;
    let addr = (config.bind_addr, config.port);
    tracing::info!(
        "Serving {} (mods for {} {}), stats from {}",
        config.public_dir.display(),
        config.loader,
        config.game_version,
        config.stats_url
    );

    let state = AppState::new(config)?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C elsewhere).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Signal handlers unavailable, falling back to Ctrl+C: {}", e);
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigint.recv() => tracing::info!("Received SIGINT"),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C");
        }
    }
}
