// src/serve/mod.rs

//! Development server: static files plus live reload.
//!
//! The server binds `127.0.0.1:<port>`, serves `[server].base_dir` (which
//! is expected to contain `index.html`), injects the live-reload client
//! script into HTML responses, and pushes `reload` over a websocket when a
//! rebuild finishes. It never opens a browser.

pub mod http;
pub mod livereload;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

pub use livereload::ReloadHandle;

/// Handle to a running dev server.
///
/// The accept loop runs in the background; the handle only carries the
/// bound address and the reload fan-out.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    reload: ReloadHandle,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Tell connected browsers to reload. Returns the client count.
    pub fn notify_reload(&self) -> usize {
        self.reload.notify()
    }
}

/// Bind the server and spawn its accept loop.
///
/// Completes once the listener is bound and accepting; serving continues in
/// the background. A port that is already in use surfaces here as the bind
/// error, unchanged.
pub async fn spawn_server(
    base_dir: PathBuf,
    port: u16,
    reload: ReloadHandle,
) -> Result<ServerHandle> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding dev server to {addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("reading dev server local address")?;

    info!(addr = %local_addr, dir = ?base_dir, "dev server listening");

    let accept_reload = reload.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    debug!(%peer, "connection accepted");
                    let base_dir = base_dir.clone();
                    let reload = accept_reload.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            http::handle_connection(stream, &base_dir, reload).await
                        {
                            debug!(error = %e, "connection error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                }
            }
        }
    });

    Ok(ServerHandle { local_addr, reload })
}
