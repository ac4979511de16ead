//! Streaming support: SSE framing and server-initiated notifications.

pub mod framer;
pub mod notifier;

pub use notifier::NotificationEmitter;
