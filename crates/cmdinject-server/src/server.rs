//! Listener lifecycle
//!
//! `start` binds and returns a handle while the accept loop runs on the
//! runtime. `ServerHandle::shutdown` stops accepting, drains in-flight
//! requests and releases the socket. Dropping the handle without calling
//! `shutdown` also stops the server.

use crate::error::{Result, ServerError};
use crate::routes::{create_router, AppState};
use cmdinject_core::Config;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Handle to a running listener
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Bind the configured address and start serving in the background
pub async fn start(config: &Config, state: AppState) -> Result<ServerHandle> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;
    let local_addr = listener.local_addr().map_err(|e| ServerError::Bind {
        addr: addr.clone(),
        reason: e.to_string(),
    })?;

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let app = create_router(state);

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // Err means the handle was dropped, which also stops the server
                shutdown_rx.wait_for(|stop| *stop).await.ok();
            })
            .await
    });

    info!("Listening on {}", local_addr);

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        task,
    })
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down listener on {}", self.local_addr);
        self.shutdown_tx.send(true).ok();

        match self.task.await {
            Ok(Ok(())) => {
                info!("Server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(ServerError::Serve(e.to_string())),
            Err(e) => Err(ServerError::Serve(e.to_string())),
        }
    }
}
