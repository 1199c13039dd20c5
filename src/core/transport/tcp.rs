//! TCP transport implementation.
//!
//! Line-delimited JSON-RPC over a TCP socket. The server accepts exactly one
//! client and serves it for its lifetime; there is no multi-client routing.

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::connection::serve_connection;
use super::session::McpSession;
use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the TCP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);
        Self::serve(listener, server).await
    }

    /// Accept one client on an already bound listener and serve it.
    pub async fn serve(listener: TcpListener, server: McpServer) -> TransportResult<()> {
        let (stream, peer_addr) = listener
            .accept()
            .await
            .map_err(|e| TransportError::connection(format!("failed to accept client: {e}")))?;
        drop(listener);
        info!("Accepted connection from {}", peer_addr);

        // Set TCP_NODELAY to disable Nagle's algorithm
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
        }

        let max_in_flight = server.config().dispatch.max_in_flight;
        let (read_half, write_half) = stream.into_split();
        serve_connection(
            McpSession::new(server),
            read_half,
            write_half,
            max_in_flight,
        )
        .await?;

        info!("Client {} disconnected", peer_addr);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_serves_single_client() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = McpServer::new(Config::default()).unwrap();
        let handle = tokio::spawn(TcpTransport::serve(listener, server));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        write_half
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
            .await
            .unwrap();

        let mut lines = BufReader::new(read_half).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        assert_eq!(line, r#"{"jsonrpc":"2.0","id":1,"result":{}}"#);

        drop(write_half);
        handle.await.unwrap().unwrap();
    }
}
