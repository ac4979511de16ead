//! Bookshelf MCP Server: a book catalog exposed over MCP on Server-Sent Events.
//!
//! A client opens `GET /sse`, learns its session id from the `endpoint` event,
//! and POSTs JSON-RPC requests that name that session. Replies and
//! notifications come back as `message` events on the open stream.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod session;
pub mod streaming;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use session::SessionRegistry;
pub use streaming::NotificationEmitter;
pub use transport::SseTransport;
