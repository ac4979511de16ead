//! Transport layer: the HTTP/SSE binding and its connection adapter.

pub mod adapter;
pub mod sse;

pub use adapter::{
    ConnectionFlowState, FlowControlListener, FrameReceiver, RequestKind, StreamConnection,
    TransportAdapter,
};
pub use sse::SseTransport;
