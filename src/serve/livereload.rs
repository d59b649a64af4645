// src/serve/livereload.rs

//! Live-reload plumbing.
//!
//! A `broadcast` channel fans a rebuild notification out to every connected
//! browser. Each HTML page served gets a small client script that opens a
//! websocket to [`WS_PATH`] and reloads the page when `reload` arrives.

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

/// URL path of the websocket endpoint.
pub const WS_PATH: &str = "/__devloop/ws";

/// URL path of the injected client script.
pub const SCRIPT_PATH: &str = "/__devloop/livereload.js";

/// Message broadcast to clients when a rebuild finishes.
pub const RELOAD_MESSAGE: &str = "reload";

/// Client-side script: connect to the websocket, reload on message.
pub const CLIENT_SCRIPT: &str = r#"(function () {
  var proto = location.protocol === "https:" ? "wss" : "ws";
  var socket = new WebSocket(proto + "://" + location.host + "/__devloop/ws");
  socket.onmessage = function (event) {
    if (event.data === "reload") {
      location.reload();
    }
  };
})();
"#;

/// Sender half of the live-reload fan-out.
///
/// Cheap to clone; the watch loop holds one and the server subscribes one
/// receiver per websocket client.
#[derive(Debug, Clone)]
pub struct ReloadHandle {
    tx: broadcast::Sender<()>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Tell every connected browser to reload.
    ///
    /// Returns the number of clients notified; zero when nobody is
    /// connected, which is not an error (watch can run without serve).
    pub fn notify(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve one websocket client until it disconnects.
///
/// The stream must still contain the unconsumed HTTP upgrade request;
/// tungstenite performs the handshake itself.
pub async fn serve_ws_client(stream: TcpStream, reload: ReloadHandle) -> Result<()> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws.split();
    let mut reload_rx = reload.subscribe();

    loop {
        tokio::select! {
            changed = reload_rx.recv() => {
                match changed {
                    Ok(()) => {
                        write.send(Message::Text(RELOAD_MESSAGE.to_string())).await?;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Several rebuilds raced this client; one reload
                        // covers all of them.
                        debug!(skipped, "reload receiver lagged");
                        write.send(Message::Text(RELOAD_MESSAGE.to_string())).await?;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(error = %e, "websocket read error");
                        break;
                    }
                }
            }
        }
    }

    debug!("livereload client disconnected");
    Ok(())
}
