//! SSE transport: Server-Sent Events over HTTP for web-based MCP clients.
//!
//! `GET /sse` opens a session stream and announces the POST endpoint. Each
//! POST carries one JSON-RPC request for a named session; the reply travels
//! back over that session's stream while the POST itself answers 202.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::protocol::{validator, CallContext, ProtocolHandler};
use crate::session::SessionRegistry;
use crate::streaming::{framer, NotificationEmitter};
use crate::types::{McpError, McpResult};

use super::adapter::{ConnectionFlowState, RequestKind, TransportAdapter};

/// Header carrying the session id on the stream response and on POSTs.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Path that opens a session stream.
pub const SSE_PATH: &str = "/sse";

/// Default path clients POST requests to.
pub const DEFAULT_POST_PATH: &str = "/message";

/// Paths accepting POSTed requests besides the configured one.
const EXTRA_POST_PATHS: [&str; 2] = ["/", "/mcp"];

/// SSE transport for web-based MCP clients.
pub struct SseTransport {
    handler: Arc<ProtocolHandler>,
    registry: Arc<SessionRegistry>,
    adapter: TransportAdapter,
    post_path: String,
    started_at: DateTime<Utc>,
}

#[derive(Clone)]
struct AppState {
    handler: Arc<ProtocolHandler>,
    registry: Arc<SessionRegistry>,
    adapter: TransportAdapter,
    post_path: Arc<str>,
    started_at: DateTime<Utc>,
}

impl SseTransport {
    /// Create a new SSE transport with default flow control.
    pub fn new(handler: ProtocolHandler) -> Self {
        Self::with_adapter(handler, TransportAdapter::default(), DEFAULT_POST_PATH)
    }

    /// Create a transport with explicit flow control and POST path.
    pub fn with_adapter(handler: ProtocolHandler, adapter: TransportAdapter, post_path: &str) -> Self {
        Self {
            handler: Arc::new(handler),
            registry: Arc::new(SessionRegistry::new()),
            adapter,
            post_path: post_path.to_string(),
            started_at: Utc::now(),
        }
    }

    /// The live session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// An emitter for pushing notifications to this transport's sessions.
    pub fn notifier(&self) -> NotificationEmitter {
        NotificationEmitter::new(self.registry.clone())
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        let state = AppState {
            handler: self.handler.clone(),
            registry: self.registry.clone(),
            adapter: self.adapter.clone(),
            post_path: Arc::from(self.post_path.as_str()),
            started_at: self.started_at,
        };

        let mut post_paths: Vec<&str> = vec![self.post_path.as_str()];
        for path in EXTRA_POST_PATHS {
            if !post_paths.contains(&path) {
                post_paths.push(path);
            }
        }

        let mut router = Router::new()
            .route(SSE_PATH, with_cors_preflight(get(open_stream)))
            .route("/health", with_cors_preflight(get(health)));
        for path in post_paths {
            router = router.route(path, with_cors_preflight(post(post_message)));
        }

        router
            .fallback(fallback)
            .layer(cors_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
            .layer(cors_header(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                "GET, POST, OPTIONS",
            ))
            .layer(cors_header(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Mcp-Session-Id",
            ))
            .layer(cors_header(
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                "Mcp-Session-Id",
            ))
            .with_state(state)
    }

    /// Run the SSE server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("SSE transport listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn with_cors_preflight(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.options(preflight).fallback(not_found)
}

fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// `GET /sse`. An event-stream request gets a long-lived body and its session
/// id in `Mcp-Session-Id`. Any other GET receives the `endpoint` event as a
/// finished body; its session is already released, so no session header and
/// no `Connection: keep-alive` are sent.
async fn open_stream(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let flow = Arc::new(ConnectionFlowState::new());
    let kind = state.adapter.classify(&method, &headers, &flow);

    let (connection, receiver) = state.adapter.open_stream(flow.clone());
    let session = state.registry.allocate(connection.clone());
    let session_id = session.id().to_string();

    if let Err(e) = connection.write(framer::endpoint_event(&state.post_path, &session_id)) {
        tracing::warn!(session = %session_id, "Failed to queue endpoint event: {e}");
    }
    tracing::info!(session = %session_id, ?kind, "SSE connection established");

    let body = state.adapter.encode_stream(&flow, receiver, session);
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response();

    if kind == RequestKind::Sse {
        let response_headers = response.headers_mut();
        response_headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        match HeaderValue::from_str(&session_id) {
            Ok(value) => {
                response_headers.insert(HeaderName::from_static(SESSION_HEADER), value);
            }
            Err(e) => tracing::warn!(session = %session_id, "Unusable session header: {e}"),
        }
    }
    response
}

async fn post_message(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session_id = query.get("session_id").cloned().or_else(|| {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    let session = session_id
        .as_deref()
        .and_then(|id| state.registry.lookup(id).map(|conn| (id, conn)));
    let Some((session_id, connection)) = session else {
        tracing::warn!(session = ?session_id, "POST for unknown session");
        return no_session(session_id.as_deref(), &body);
    };

    if connection.ready().await.is_err() {
        return no_session(Some(session_id), &body);
    }

    let ctx = CallContext::new(session_id, state.registry.count(), state.started_at);
    if let Some(reply) = state.handler.handle_body(&body, &ctx) {
        let written = framer::message_event(&reply).and_then(|frame| connection.write(frame));
        if let Err(e) = written {
            tracing::warn!(session = %session_id, "Failed to deliver reply: {e}");
        }
    }

    StatusCode::ACCEPTED.into_response()
}

fn no_session(session_id: Option<&str>, body: &[u8]) -> Response {
    let error = McpError::SessionNotFound(session_id.unwrap_or_default().to_string())
        .to_json_rpc_error(validator::peek_id(body));
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "transport": "sse",
        "connections": state.registry.count(),
    }))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "path": uri.path(),
        })),
    )
        .into_response()
}

async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        preflight().await.into_response()
    } else {
        not_found(uri).await
    }
}
