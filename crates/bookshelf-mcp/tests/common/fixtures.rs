//! Test data fixtures for MCP server tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use bookshelf::Catalog;
use bookshelf_mcp::protocol::{CallContext, ProtocolHandler};
use bookshelf_mcp::session::{SessionHandle, SessionRegistry};
use bookshelf_mcp::transport::{ConnectionFlowState, FrameReceiver, StreamConnection};

/// Session id used by dispatcher tests that have no real stream.
pub const TEST_SESSION: &str = "0123456789abcdef0123456789abcdef";

/// A handler over the built-in sample catalog.
pub fn test_handler() -> ProtocolHandler {
    ProtocolHandler::new(Arc::new(Catalog::sample()))
}

/// A call context for a single live session.
pub fn test_context() -> CallContext {
    CallContext::new(TEST_SESSION, 1, chrono::Utc::now())
}

/// Dispatch a JSON value and return the reply as JSON (`Null` if none).
pub fn dispatch(handler: &ProtocolHandler, request: Value) -> Value {
    let body = serde_json::to_vec(&request).expect("request serializes");
    dispatch_raw(handler, &body)
}

/// Dispatch raw body bytes and return the reply as JSON (`Null` if none).
pub fn dispatch_raw(handler: &ProtocolHandler, body: &[u8]) -> Value {
    match handler.handle_body(body, &test_context()) {
        Some(reply) => serde_json::to_value(&reply).expect("reply serializes"),
        None => Value::Null,
    }
}

/// Parse the JSON text carried in a tool result's first content item.
pub fn tool_payload(reply: &Value) -> Value {
    let text = reply["result"]["content"][0]["text"]
        .as_str()
        .expect("tool result has text content");
    serde_json::from_str(text).expect("tool text is JSON")
}

/// Register a stream connection with the given high-water mark.
pub fn open_session(
    registry: &Arc<SessionRegistry>,
    high_water_mark: usize,
) -> (SessionHandle, FrameReceiver, Arc<StreamConnection>) {
    let flow = Arc::new(ConnectionFlowState::new());
    flow.mark_sse();
    let (connection, receiver) = StreamConnection::channel(flow.clone(), high_water_mark);
    connection.subscribe(flow);
    let handle = registry.allocate(connection.clone());
    (handle, receiver, connection)
}

/// Split one SSE frame into its event name and joined data.
pub fn parse_frame(frame: &[u8]) -> (String, String) {
    let text = std::str::from_utf8(frame).expect("frame is UTF-8");
    assert!(text.ends_with("\n\n"), "frame must end with a blank line: {text:?}");
    let mut event = String::new();
    let mut data = Vec::new();
    for line in text.trim_end_matches('\n').split('\n') {
        if let Some(name) = line.strip_prefix("event: ") {
            event = name.to_string();
        } else if let Some(chunk) = line.strip_prefix("data: ") {
            data.push(chunk);
        }
    }
    (event, data.join("\n"))
}

/// Receive the next frame, failing the test after two seconds.
pub async fn next_frame(receiver: &mut FrameReceiver) -> bytes::Bytes {
    tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("frame arrives in time")
        .expect("stream is open")
}
