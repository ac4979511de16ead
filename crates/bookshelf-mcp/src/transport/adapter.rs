//! Transport adapter: classifies requests, tracks per-connection flow state,
//! and turns a session's frame queue into a response body.
//!
//! HTTP parsing and encoding stay in hyper. What lives here is the part hyper
//! does not know about: which GETs are event streams, when a stream's outbound
//! buffer is too full to accept more work from its peer, and the rule that an
//! event stream body never ends on its own.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method};
use bytes::{Bytes, BytesMut};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::session::SessionHandle;
use crate::streaming::framer;
use crate::types::{McpError, McpResult};

/// Default outbound high-water mark per stream, in bytes.
pub const DEFAULT_HIGH_WATER_MARK: usize = 64 * 1024;

/// How an incoming request should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A GET that asked for `text/event-stream`.
    Sse,
    /// Anything else; normal request/response semantics.
    Http,
}

/// Callbacks fired when a stream's outbound buffer crosses its high-water mark.
pub trait FlowControlListener: Send + Sync {
    /// Buffered bytes rose above the mark.
    fn on_buffer_full(&self);
    /// Buffered bytes fell back to or below the mark.
    fn on_buffer_drained(&self);
}

/// Per-connection flags. Lives exactly as long as the connection.
#[derive(Debug)]
pub struct ConnectionFlowState {
    sse_mode: AtomicBool,
    paused: watch::Sender<bool>,
}

impl Default for ConnectionFlowState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionFlowState {
    /// Fresh state: plain HTTP, not paused.
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            sse_mode: AtomicBool::new(false),
            paused,
        }
    }

    /// Mark the connection as an event stream.
    pub fn mark_sse(&self) {
        self.sse_mode.store(true, Ordering::Release);
    }

    /// Whether the connection is an event stream.
    pub fn is_sse(&self) -> bool {
        self.sse_mode.load(Ordering::Acquire)
    }

    /// Whether input from the peer is currently held back.
    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    /// Resolve once the connection is not paused.
    pub async fn wait_resumed(&self) {
        let mut rx = self.paused.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|paused| !*paused).await;
    }
}

impl FlowControlListener for ConnectionFlowState {
    fn on_buffer_full(&self) {
        tracing::debug!("Outbound buffer full; pausing peer input");
        self.paused.send_replace(true);
    }

    fn on_buffer_drained(&self) {
        tracing::debug!("Outbound buffer drained; resuming peer input");
        self.paused.send_replace(false);
    }
}

#[derive(Debug, Default)]
struct BufferState {
    buffered: usize,
    full: bool,
}

/// The writable end of one long-lived event stream.
///
/// The outbound queue is unbounded; `high_water_mark` only decides when the
/// listeners are told to pause and resume.
pub struct StreamConnection {
    tx: mpsc::UnboundedSender<Bytes>,
    state: Mutex<BufferState>,
    high_water_mark: usize,
    listeners: RwLock<Vec<Arc<dyn FlowControlListener>>>,
    flow: Arc<ConnectionFlowState>,
}

impl std::fmt::Debug for StreamConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConnection")
            .field("buffered", &self.buffered())
            .field("high_water_mark", &self.high_water_mark)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl StreamConnection {
    /// Create a connection and the receiver its body will drain.
    pub fn channel(
        flow: Arc<ConnectionFlowState>,
        high_water_mark: usize,
    ) -> (Arc<Self>, FrameReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = Arc::new(Self {
            tx,
            state: Mutex::new(BufferState::default()),
            high_water_mark,
            listeners: RwLock::new(Vec::new()),
            flow,
        });
        let receiver = FrameReceiver {
            rx,
            connection: connection.clone(),
        };
        (connection, receiver)
    }

    /// Register a flow-control listener.
    pub fn subscribe(&self, listener: Arc<dyn FlowControlListener>) {
        self.listeners.write().push(listener);
    }

    /// Flow state of the underlying connection.
    pub fn flow(&self) -> &Arc<ConnectionFlowState> {
        &self.flow
    }

    /// Bytes queued but not yet handed to the HTTP layer.
    pub fn buffered(&self) -> usize {
        self.state.lock().buffered
    }

    /// Whether the peer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolve once the peer has gone away.
    pub async fn closed(&self) {
        self.tx.closed().await
    }

    /// Queue one already-framed event.
    pub fn write(&self, frame: Bytes) -> McpResult<()> {
        let len = frame.len();
        let mut state = self.state.lock();
        self.tx
            .send(frame)
            .map_err(|_| McpError::Transport("stream closed".to_string()))?;
        state.buffered += len;
        if state.buffered > self.high_water_mark && !state.full {
            state.full = true;
            for listener in self.listeners.read().iter() {
                listener.on_buffer_full();
            }
        }
        Ok(())
    }

    /// Wait until the peer may send more work: not paused, or gone.
    pub async fn ready(&self) -> McpResult<()> {
        tokio::select! {
            _ = self.flow.wait_resumed() => Ok(()),
            _ = self.closed() => Err(McpError::Transport("stream closed".to_string())),
        }
    }

    fn drained(&self, len: usize) {
        let mut state = self.state.lock();
        state.buffered = state.buffered.saturating_sub(len);
        if state.full && state.buffered <= self.high_water_mark {
            state.full = false;
            for listener in self.listeners.read().iter() {
                listener.on_buffer_drained();
            }
        }
    }
}

/// The reading end of a [`StreamConnection`]; draining it releases buffer space.
pub struct FrameReceiver {
    rx: mpsc::UnboundedReceiver<Bytes>,
    connection: Arc<StreamConnection>,
}

impl FrameReceiver {
    /// Next frame. Never `None` while the receiver is alive, since it keeps
    /// its own connection (and so a sender) alive.
    pub async fn recv(&mut self) -> Option<Bytes> {
        let frame = self.rx.recv().await?;
        self.connection.drained(frame.len());
        Some(frame)
    }

    /// Next frame if one is already queued.
    pub fn try_recv(&mut self) -> Option<Bytes> {
        let frame = self.rx.try_recv().ok()?;
        self.connection.drained(frame.len());
        Some(frame)
    }
}

/// Adapter between the HTTP layer and session streams.
#[derive(Debug, Clone)]
pub struct TransportAdapter {
    high_water_mark: usize,
    keep_alive: Option<Duration>,
}

impl Default for TransportAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_WATER_MARK, None)
    }
}

impl TransportAdapter {
    /// Create an adapter. A zero keep-alive disables comment pings.
    pub fn new(high_water_mark: usize, keep_alive: Option<Duration>) -> Self {
        Self {
            high_water_mark,
            keep_alive: keep_alive.filter(|d| !d.is_zero()),
        }
    }

    /// Classify a decoded request, marking the connection when it is an event stream.
    pub fn classify(
        &self,
        method: &Method,
        headers: &HeaderMap,
        flow: &ConnectionFlowState,
    ) -> RequestKind {
        let wants_stream = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.contains("text/event-stream"));
        if method == Method::GET && wants_stream {
            flow.mark_sse();
            RequestKind::Sse
        } else {
            RequestKind::Http
        }
    }

    /// Create the stream connection for a new session and subscribe the
    /// connection's flow state to its buffer events.
    pub fn open_stream(&self, flow: Arc<ConnectionFlowState>) -> (Arc<StreamConnection>, FrameReceiver) {
        let (connection, receiver) = StreamConnection::channel(flow.clone(), self.high_water_mark);
        connection.subscribe(flow);
        (connection, receiver)
    }

    /// Encode a session's queue as a response body.
    ///
    /// Event-stream connections get a body that only ends when the peer
    /// disconnects; dropping it drops `session` and releases the id. Anything
    /// else gets what is already queued and then ends like a normal response.
    pub fn encode_stream(
        &self,
        flow: &ConnectionFlowState,
        mut receiver: FrameReceiver,
        session: SessionHandle,
    ) -> Body {
        if !flow.is_sse() {
            let mut buf = BytesMut::new();
            while let Some(frame) = receiver.try_recv() {
                buf.extend_from_slice(&frame);
            }
            tracing::debug!(session = %session.id(), "Non-streaming GET; closing after send");
            drop(session);
            return Body::from(buf.freeze());
        }

        let keep_alive = self.keep_alive.map(|period| {
            let mut tick = tokio::time::interval_at(Instant::now() + period, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tick
        });
        let state = BodyState {
            receiver,
            keep_alive,
            _session: session,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            let frame = match state.keep_alive.as_mut() {
                Some(tick) => tokio::select! {
                    frame = state.receiver.recv() => frame?,
                    _ = tick.tick() => framer::keep_alive_comment(),
                },
                None => state.receiver.recv().await?,
            };
            Some((Ok::<_, Infallible>(frame), state))
        });
        Body::from_stream(stream)
    }
}

struct BodyState {
    receiver: FrameReceiver,
    keep_alive: Option<Interval>,
    _session: SessionHandle,
}
