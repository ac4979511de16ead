//! Phase 4: Sessions, flow control, and notifications.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, Method};
use http_body_util::BodyExt;
use serde_json::json;
use tokio_test::{assert_pending, assert_ready};

use bookshelf_mcp::session::{generate_session_id, SessionRegistry};
use bookshelf_mcp::streaming::{framer, NotificationEmitter};
use bookshelf_mcp::transport::{
    ConnectionFlowState, FlowControlListener, RequestKind, StreamConnection, TransportAdapter,
};
use bookshelf_mcp::types::LogLevel;

mod common;
use common::fixtures::{next_frame, open_session, parse_frame};

#[test]
fn test_session_ids_are_128_bit_hex() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(id, generate_session_id());
}

#[test]
fn test_lookup_after_allocate_and_after_close() {
    let registry = Arc::new(SessionRegistry::new());
    let (handle, receiver, _conn) = open_session(&registry, 1024);
    let id = handle.id().to_string();

    assert!(registry.lookup(&id).is_some());
    assert_eq!(registry.count(), 1);

    drop(receiver);
    drop(handle);

    assert!(registry.lookup(&id).is_none());
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_release_is_idempotent() {
    let registry = Arc::new(SessionRegistry::new());
    let (handle, _receiver, _conn) = open_session(&registry, 1024);
    let id = handle.id().to_string();

    assert!(registry.release(&id));
    assert!(!registry.release(&id));
    drop(handle);
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_each_session_gets_a_distinct_id() {
    let registry = Arc::new(SessionRegistry::new());
    let sessions: Vec<_> = (0..8).map(|_| open_session(&registry, 1024)).collect();
    let mut ids: Vec<_> = sessions.iter().map(|(h, _, _)| h.id().to_string()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(registry.count(), 8);
}

#[derive(Default)]
struct CountingListener {
    full: AtomicUsize,
    drained: AtomicUsize,
}

impl FlowControlListener for CountingListener {
    fn on_buffer_full(&self) {
        self.full.fetch_add(1, Ordering::SeqCst);
    }

    fn on_buffer_drained(&self) {
        self.drained.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_buffer_full_pauses_and_drain_resumes() {
    let flow = Arc::new(ConnectionFlowState::new());
    let (connection, mut receiver) = StreamConnection::channel(flow.clone(), 40);
    let counter = Arc::new(CountingListener::default());
    connection.subscribe(flow.clone());
    connection.subscribe(counter.clone());

    connection.write(framer::frame("message", "1234")).unwrap();
    assert!(!flow.is_paused());

    connection.write(framer::frame("message", "5678")).unwrap();
    assert!(flow.is_paused());
    assert_eq!(counter.full.load(Ordering::SeqCst), 1);

    // Further writes while full do not re-fire the listener.
    connection.write(framer::frame("message", "9")).unwrap();
    assert_eq!(counter.full.load(Ordering::SeqCst), 1);

    let mut waiter = tokio_test::task::spawn(flow.wait_resumed());
    assert_pending!(waiter.poll());

    receiver.recv().await.unwrap();
    receiver.recv().await.unwrap();
    assert!(!flow.is_paused());
    assert_eq!(counter.drained.load(Ordering::SeqCst), 1);
    assert!(waiter.is_woken());
    assert_ready!(waiter.poll());

    receiver.recv().await.unwrap();
    assert_eq!(connection.buffered(), 0);
}

#[tokio::test]
async fn test_ready_fails_once_peer_is_gone() {
    let flow = Arc::new(ConnectionFlowState::new());
    let (connection, receiver) = StreamConnection::channel(flow.clone(), 1);
    connection.subscribe(flow.clone());
    connection.write(framer::frame("message", "overflow")).unwrap();
    assert!(flow.is_paused());

    drop(receiver);
    assert!(connection.is_closed());
    assert!(connection.ready().await.is_err());
    assert!(connection.write(framer::frame("message", "late")).is_err());
}

#[test]
fn test_classify_requires_get_and_event_stream_accept() {
    let adapter = TransportAdapter::default();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/event-stream, */*"),
    );

    let flow = ConnectionFlowState::new();
    assert_eq!(adapter.classify(&Method::GET, &headers, &flow), RequestKind::Sse);
    assert!(flow.is_sse());

    let flow = ConnectionFlowState::new();
    assert_eq!(adapter.classify(&Method::POST, &headers, &flow), RequestKind::Http);
    assert!(!flow.is_sse());

    let flow = ConnectionFlowState::new();
    assert_eq!(
        adapter.classify(&Method::GET, &HeaderMap::new(), &flow),
        RequestKind::Http
    );
    assert!(!flow.is_sse());
}

#[tokio::test]
async fn test_plain_http_stream_closes_after_endpoint() {
    let registry = Arc::new(SessionRegistry::new());
    let adapter = TransportAdapter::default();
    let flow = Arc::new(ConnectionFlowState::new());

    let (connection, receiver) = adapter.open_stream(flow.clone());
    let handle = registry.allocate(connection.clone());
    let endpoint = framer::endpoint_event("/message", handle.id());
    connection.write(endpoint.clone()).unwrap();

    let body = adapter.encode_stream(&flow, receiver, handle);
    assert_eq!(registry.count(), 0);

    let collected = body.collect().await.unwrap().to_bytes();
    assert_eq!(collected, endpoint);
}

#[tokio::test]
async fn test_send_notification_reaches_session() {
    let registry = Arc::new(SessionRegistry::new());
    let (handle, mut receiver, _conn) = open_session(&registry, 1024);
    let emitter = NotificationEmitter::new(registry.clone());

    assert!(emitter.send_notification(
        handle.id(),
        "notifications/resources/list_changed",
        None
    ));

    let (event, data) = parse_frame(&next_frame(&mut receiver).await);
    assert_eq!(event, "message");
    let message: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(message["jsonrpc"], "2.0");
    assert_eq!(message["method"], "notifications/resources/list_changed");
    assert!(message.get("id").is_none());
}

#[test]
fn test_send_notification_to_unknown_session_is_noop() {
    let registry = Arc::new(SessionRegistry::new());
    let emitter = NotificationEmitter::new(registry);
    assert!(!emitter.send_notification("ffffffffffffffffffffffffffffffff", "x", None));
}

#[tokio::test]
async fn test_send_progress() {
    let registry = Arc::new(SessionRegistry::new());
    let (handle, mut receiver, _conn) = open_session(&registry, 1024);
    let emitter = NotificationEmitter::new(registry.clone());

    assert!(emitter.send_progress(handle.id(), "import-1", 2.0, Some(5.0), Some("indexing".to_string())));

    let (_, data) = parse_frame(&next_frame(&mut receiver).await);
    let message: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(message["method"], "notifications/progress");
    assert_eq!(
        message["params"],
        json!({"progressToken": "import-1", "progress": 2.0, "total": 5.0, "message": "indexing"})
    );
}

#[tokio::test]
async fn test_send_log_message() {
    let registry = Arc::new(SessionRegistry::new());
    let (handle, mut receiver, _conn) = open_session(&registry, 1024);
    let emitter = NotificationEmitter::new(registry.clone());

    assert!(emitter.send_log_message(handle.id(), LogLevel::Warning, json!("catalog reloaded")));

    let (_, data) = parse_frame(&next_frame(&mut receiver).await);
    let message: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(message["method"], "notifications/message");
    assert_eq!(message["params"]["level"], "warning");
    assert_eq!(message["params"]["data"], "catalog reloaded");
}

#[test]
fn test_broadcast_with_no_sessions() {
    let emitter = NotificationEmitter::new(Arc::new(SessionRegistry::new()));
    assert_eq!(emitter.broadcast("message", "{}"), 0);
}

#[tokio::test]
async fn test_broadcast_skips_dead_connections() {
    let registry = Arc::new(SessionRegistry::new());
    let (_h1, mut live_a, _c1) = open_session(&registry, 1024);
    let (_h2, dead, _c2) = open_session(&registry, 1024);
    let (_h3, mut live_b, _c3) = open_session(&registry, 1024);
    drop(dead);

    let emitter = NotificationEmitter::new(registry.clone());
    assert_eq!(emitter.broadcast("announcement", "new books"), 2);

    for receiver in [&mut live_a, &mut live_b] {
        let (event, data) = parse_frame(&next_frame(receiver).await);
        assert_eq!(event, "announcement");
        assert_eq!(data, "new books");
    }
}
