//! Report API server lifecycle: starts/stops the axum HTTP server.
//!
//! bind → spawn server task + idle-session sweeper → return handle
//! with shutdown channel.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// How often idle sessions are swept.
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get server address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Handle to a running report API server.
pub struct ReportServer {
    addr: SocketAddr,
    started_at: chrono::DateTime<chrono::Utc>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_task: JoinHandle<()>,
    sweeper_task: JoinHandle<()>,
}

impl ReportServer {
    /// Address actually bound (resolves port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Shut down the server gracefully. In-flight requests finish first.
    pub fn shutdown(&mut self) {
        self.sweeper_task.abort();
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Report API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn wait(self) {
        if let Err(e) = self.server_task.await {
            tracing::error!("Report API server task failed: {e}");
        }
    }
}

/// Start the report API server on `addr`.
///
/// Spawns the axum server and a periodic idle-session sweeper in
/// background tokio tasks.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ReportServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let sessions = ctx.sessions.clone();
    let app = api_router(ctx);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Report API server received shutdown signal");
        };

        tracing::info!(%addr, "Report API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Report API server error: {e}");
        }

        tracing::info!("Report API server stopped");
    });

    let sweeper_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(EVICTION_INTERVAL);
        // First tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            sessions.evict_idle();
        }
    });

    Ok(ReportServer {
        addr,
        started_at: chrono::Utc::now(),
        shutdown_tx: Some(shutdown_tx),
        server_task,
        sweeper_task,
    })
}
