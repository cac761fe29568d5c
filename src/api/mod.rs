//! Read-only HTTP surface over the feed trackers.

pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use tracing::info;

use crate::coordination::ShutdownToken;
use crate::error::{Result, TrackerError};

/// Serve the read API until shutdown
pub async fn serve(state: AppState, addr: SocketAddr, mut shutdown: ShutdownToken) -> Result<()> {
    let app = create_router(state);

    info!("Server is running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.wait_for_shutdown().await;
        })
        .await
        .map_err(|e| TrackerError::Internal(format!("API server error: {}", e)))?;

    Ok(())
}
