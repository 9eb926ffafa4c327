//! TCP line transport.
//!
//! One JSON request per line, one JSON response per line. Malformed
//! JSON gets a failure response on the same connection; only a socket
//! error ends it. Request handling itself is synchronous (the backend
//! serializes access), so each connection task simply alternates
//! read/handle/write.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use sheetstore_proto::{Request, Response};

use crate::service::ApiService;

/// The TCP server.
pub struct Server {
    service: Arc<ApiService>,
    addr: String,
}

impl Server {
    /// Creates a server for the given bind address.
    #[must_use]
    pub fn new(service: Arc<ApiService>, addr: impl Into<String>) -> Self {
        Self {
            service,
            addr: addr.into(),
        }
    }

    /// Binds and serves until the task is cancelled.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!("sheetstore listening on {}", self.addr);
        Self::serve_on(listener, self.service).await
    }

    /// Serves on an already-bound listener.
    pub async fn serve_on(
        listener: TcpListener,
        service: Arc<ApiService>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        loop {
            let (socket, peer) = listener.accept().await?;
            debug!(%peer, "client connected");
            let service = service.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(service, socket).await {
                    warn!(%peer, error = %e, "connection ended with error");
                }
                debug!(%peer, "client disconnected");
            });
        }
    }
}

async fn handle_connection(
    service: Arc<ApiService>,
    socket: TcpStream,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => service.handle(&request),
            Err(e) => {
                warn!(error = %e, "malformed request line");
                Response::failure(format!("Malformed request: {e}"))
            }
        };
        let mut out = serde_json::to_string(&response).unwrap_or_else(|e| {
            // A response that cannot serialize is a bug; still answer.
            format!("{{\"ok\":false,\"error\":\"response serialization failed: {e}\"}}")
        });
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
    }

    Ok(())
}
