//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! Messages are read from stdin and answered on stdout; logs go to stderr.

use tracing::info;

use super::TransportResult;
use super::connection::serve_connection;
use super::session::McpSession;
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin is closed.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let max_in_flight = server.config().dispatch.max_in_flight;
        serve_connection(
            McpSession::new(server),
            tokio::io::stdin(),
            tokio::io::stdout(),
            max_in_flight,
        )
        .await?;

        info!("STDIO transport finished");
        Ok(())
    }
}
