mod api;
mod config;
mod relay;
mod router;

pub use config::ServerConfig;
pub use relay::{RelayService, ws_handler};
pub use router::router;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

/// Bind `config.bind` and serve the relay until the process ends.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    serve_on(listener, config).await
}

/// Serve the relay on an already bound listener.
pub async fn serve_on(listener: TcpListener, config: ServerConfig) -> Result<()> {
    let addr = listener.local_addr()?;
    let service = RelayService::new(config.ice);
    info!("Signaling relay listening on http://{}", addr);

    axum::serve(listener, router(service))
        .await
        .context("relay server stopped")
}
