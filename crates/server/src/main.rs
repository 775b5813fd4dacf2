mod api;
mod app_config;
mod db;
mod router;
mod state;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app_config::load_config;
use state::AppState;

async fn serve(config: &paddy_core::Config) -> anyhow::Result<()> {
    config.log_summary();

    let stores = db::init_stores(&config.storage).await?;
    let state = Arc::new(AppState::new(stores));
    let app = router::build_router(state, &config.server)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    info!("API docs at http://localhost:{}/docs", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let config = load_config();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None | Some("serve") => serve(&config).await?,
        Some("migrate") => db::migrate(&config.storage).await?,
        _ => {
            println!("paddy-server v0.1.0");
            println!("Usage: paddy-server <command>");
            println!("  serve     Start HTTP server (default)");
            println!("  migrate   Apply database migrations and exit");
        }
    }

    Ok(())
}
