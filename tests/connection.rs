//! End-to-end tests over an in-memory duplex channel.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::DateTime;
use serde_json::{Value, json};
use tokio::io::{
    AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;

use mcp_apps_server::core::transport::{MAX_LINE_BYTES, McpSession, TransportResult, serve_connection};
use mcp_apps_server::core::{Config, Content, ContentEnvelope, McpServer, Registry, ToolDescriptor};
use mcp_apps_server::core::handlers::{NoArgs, ToolError};

struct Client {
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    next_id: u64,
}

impl Client {
    async fn send(&mut self, message: Value) {
        let mut bytes = serde_json::to_vec(&message).unwrap();
        bytes.push(b'\n');
        self.writer.write_all(&bytes).await.unwrap();
    }

    async fn send_raw(&mut self, raw: &[u8]) {
        self.writer.write_all(raw).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for a response")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn request(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        self.send(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .await;
        let response = self.recv().await;
        assert_eq!(response["id"], id);
        response
    }

    async fn call_tool(&mut self, name: &str) -> Value {
        self.request("tools/call", json!({ "name": name, "arguments": {} })).await
    }
}

fn start(server: McpServer, max_in_flight: usize) -> (Client, JoinHandle<TransportResult<()>>) {
    let (client_side, server_side) = tokio::io::duplex(256 * 1024);
    let (server_read, server_write) = tokio::io::split(server_side);
    let handle = tokio::spawn(serve_connection(
        McpSession::new(server),
        server_read,
        server_write,
        max_in_flight,
    ));

    let (client_read, client_write) = tokio::io::split(client_side);
    let client = Client {
        writer: client_write,
        lines: BufReader::new(client_read).lines(),
        next_id: 0,
    };
    (client, handle)
}

/// Output side whose every write fails.
struct ClosedOutput;

impl AsyncWrite for ClosedOutput {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed")))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn demo_server() -> McpServer {
    McpServer::new(Config::default()).unwrap()
}

fn text_tool(name: &str, calls: Arc<AtomicUsize>) -> ToolDescriptor {
    ToolDescriptor::from_fn(name, "Counts calls", move |_: NoArgs| {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok::<_, ToolError>(ContentEnvelope::new(vec![Content::text("counted")])))
    })
}

#[tokio::test]
async fn get_time_returns_text_then_clock_app() {
    let (mut client, _handle) = start(demo_server(), 1);

    let response = client.call_tool("get-time").await;
    let content = response["result"]["content"].as_array().unwrap().clone();
    assert_eq!(content.len(), 2);

    let text = content[0]["text"].as_str().unwrap();
    let timestamp = text.strip_prefix("Current server time: ").unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");
    assert!(timestamp.ends_with('Z'));

    assert_eq!(content[1]["type"], "resource");
    assert_eq!(content[1]["resource"]["uri"], "ui://get-time/clock.html");
    assert_eq!(content[1]["resource"]["mimeType"], "text/html");
}

#[tokio::test]
async fn embedded_markup_matches_resource_read() {
    let (mut client, _handle) = start(demo_server(), 1);

    for (tool, uri) in [
        ("get-time", "ui://get-time/clock.html"),
        ("show-dashboard", "ui://dashboard/dashboard.html"),
    ] {
        let call = client.call_tool(tool).await;
        let embedded = call["result"]["content"][1]["resource"]["text"].clone();

        let read = client.request("resources/read", json!({ "uri": uri })).await;
        let contents = read["result"]["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["text"], embedded, "{uri}");
    }
}

#[tokio::test]
async fn dashboard_text_is_json_with_string_fields() {
    let (mut client, _handle) = start(demo_server(), 1);

    let response = client.call_tool("show-dashboard").await;
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let snapshot: Value = serde_json::from_str(text).unwrap();

    for key in ["cpu", "memory", "uptime", "timestamp"] {
        let value = snapshot[key].as_str().unwrap_or_default();
        assert!(!value.is_empty(), "{key} missing in {snapshot}");
    }
}

#[tokio::test]
async fn repeated_calls_keep_their_shape() {
    let (mut client, _handle) = start(demo_server(), 1);

    fn shape(response: &Value) -> Vec<(String, Option<String>)> {
        response["result"]["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|unit| {
                (
                    unit["type"].as_str().unwrap().to_string(),
                    unit["resource"]["uri"].as_str().map(str::to_string),
                )
            })
            .collect()
    }

    for tool in ["get-time", "show-dashboard"] {
        let first = client.call_tool(tool).await;
        let second = client.call_tool(tool).await;
        assert_eq!(shape(&first), shape(&second));
    }
}

#[tokio::test]
async fn listings_over_the_wire() {
    let (mut client, _handle) = start(demo_server(), 1);

    let tools = client.request("tools/list", json!({})).await;
    let tools = tools["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "get-time");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");

    let resources = client.request("resources/list", json!({})).await;
    let resources = resources["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert!(resources.iter().all(|r| r["mimeType"] == "text/html"));
}

#[tokio::test]
async fn unknown_tool_never_runs_a_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    registry.register_tool(text_tool("count", Arc::clone(&calls)));
    let (mut client, _handle) = start(McpServer::with_registry(Config::default(), registry), 1);

    let response = client.call_tool("cuont").await;
    assert_eq!(response["error"]["data"]["kind"], "UnknownTool");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let response = client.call_tool("count").await;
    assert_eq!(response["result"]["content"][0]["text"], "counted");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_handler_keeps_the_channel_open() {
    let mut registry = Registry::new();
    registry.register_tool(ToolDescriptor::from_fn("broken", "Always fails", |_: NoArgs| {
        std::future::ready(Err::<ContentEnvelope, _>(ToolError::execution_failed("disk on fire")))
    }));
    let (mut client, _handle) = start(McpServer::with_registry(Config::default(), registry), 1);

    let response = client.call_tool("broken").await;
    assert_eq!(response["error"]["code"], -32603);
    assert_eq!(response["error"]["data"]["kind"], "HandlerFailure");
    assert!(response["error"]["message"].as_str().unwrap().contains("disk on fire"));

    let response = client.request("ping", json!({})).await;
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn garbage_is_answered_and_skipped() {
    let (mut client, _handle) = start(demo_server(), 1);

    client.send_raw(b"\n   \n{oops\n").await;
    let response = client.recv().await;
    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["error"]["code"], -32700);

    client.send_raw(&[0xff, 0xfe, b'\n']).await;
    let response = client.recv().await;
    assert_eq!(response["error"]["code"], -32700);

    let response = client.request("ping", json!({})).await;
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn notifications_get_no_reply() {
    let (mut client, _handle) = start(demo_server(), 1);

    client
        .send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
        .await;
    let response = client.request("ping", json!({})).await;
    assert_eq!(response["id"], 1);
}

#[tokio::test]
async fn end_of_input_ends_the_session_cleanly() {
    let (mut client, handle) = start(demo_server(), 1);
    client.request("ping", json!({})).await;

    drop(client);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn slow_handler_does_not_block_others_when_concurrent() {
    let mut registry = Registry::new();
    registry.register_tool(ToolDescriptor::from_fn("slow", "Sleeps", |_: NoArgs| async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok::<_, ToolError>(ContentEnvelope::new(vec![Content::text("done")]))
    }));
    let (mut client, _handle) = start(McpServer::with_registry(Config::default(), registry), 4);

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": "slow",
            "method": "tools/call",
            "params": { "name": "slow" }
        }))
        .await;
    client
        .send(json!({ "jsonrpc": "2.0", "id": "fast", "method": "ping" }))
        .await;

    let first = client.recv().await;
    let second = client.recv().await;
    assert_eq!(first["id"], "fast");
    assert_eq!(second["id"], "slow");
    assert_eq!(second["result"]["content"][0]["text"], "done");
}

#[tokio::test]
async fn sequential_mode_answers_in_order() {
    let mut registry = Registry::new();
    registry.register_tool(ToolDescriptor::from_fn("slow", "Sleeps", |_: NoArgs| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, ToolError>(ContentEnvelope::new(vec![Content::text("done")]))
    }));
    let (mut client, _handle) = start(McpServer::with_registry(Config::default(), registry), 1);

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": "slow",
            "method": "tools/call",
            "params": { "name": "slow" }
        }))
        .await;
    client
        .send(json!({ "jsonrpc": "2.0", "id": "fast", "method": "ping" }))
        .await;

    assert_eq!(client.recv().await["id"], "slow");
    assert_eq!(client.recv().await["id"], "fast");
}

async fn assert_write_failure_ends_session(max_in_flight: usize) {
    let (mut input, server_side) = tokio::io::duplex(1024);
    let handle = tokio::spawn(serve_connection(
        McpSession::new(demo_server()),
        server_side,
        ClosedOutput,
        max_in_flight,
    ));

    input
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
        .await
        .unwrap();

    // Input stays open: only the failed write may end the session.
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("session kept running after its output failed")
        .unwrap();
    assert!(result.is_err(), "max_in_flight={max_in_flight}");
    drop(input);
}

#[tokio::test]
async fn write_failure_ends_sequential_session() {
    assert_write_failure_ends_session(1).await;
}

#[tokio::test]
async fn write_failure_ends_concurrent_session() {
    assert_write_failure_ends_session(4).await;
}

#[tokio::test]
async fn oversized_line_is_answered_and_skipped() {
    for max_in_flight in [1, 4] {
        let (mut client, _handle) = start(demo_server(), max_in_flight);

        let mut line = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"pad\":\"".to_vec();
        line.resize(MAX_LINE_BYTES + 64, b'x');
        line.extend_from_slice(b"\"}\n");
        client.send_raw(&line).await;

        let response = client.recv().await;
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["error"]["data"]["kind"], "TransportDecodeError");

        let response = client.request("ping", json!({})).await;
        assert_eq!(response["result"], json!({}), "max_in_flight={max_in_flight}");
    }
}
