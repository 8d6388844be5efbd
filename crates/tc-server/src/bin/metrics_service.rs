use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tc_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;
    info!(provider = ?config.provider, origins = ?config.allowed_origins, "starting metrics service");

    let router = app(AppState::new(config));

    let listener = TcpListener::bind(addr).await?;
    info!("metrics service listening on http://{addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("metrics service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, stopping"),
        Err(e) => {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
