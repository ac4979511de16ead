//! Server → client notifications over session streams.

use std::sync::Arc;

use serde_json::Value;

use crate::session::SessionRegistry;
use crate::types::{
    JsonRpcNotification, LogLevel, LogMessageParams, McpResult, ProgressParams, ProgressToken,
};

use super::framer;

/// Pushes notifications to one session or to all of them.
#[derive(Debug, Clone)]
pub struct NotificationEmitter {
    registry: Arc<SessionRegistry>,
}

impl NotificationEmitter {
    /// Create an emitter over the given registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Send `{jsonrpc, method, params}` as a `message` event. Returns whether it
    /// was queued; an unknown session is silently ignored.
    pub fn send_notification(&self, session_id: &str, method: &str, params: Option<Value>) -> bool {
        let Some(connection) = self.registry.lookup(session_id) else {
            tracing::debug!(session = %session_id, method, "Notification for unknown session dropped");
            return false;
        };

        let notification = JsonRpcNotification::new(method.to_string(), params);
        let result = framer::message_event(&notification).and_then(|frame| connection.write(frame));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(session = %session_id, method, "Failed to send notification: {e}");
                false
            }
        }
    }

    /// Send `notifications/progress`.
    pub fn send_progress(
        &self,
        session_id: &str,
        token: impl Into<ProgressToken>,
        progress: f64,
        total: Option<f64>,
        message: Option<String>,
    ) -> bool {
        let params = ProgressParams {
            progress_token: token.into(),
            progress,
            total,
            message,
        };
        self.send_serialized(session_id, "notifications/progress", &params)
    }

    /// Send `notifications/message` (an MCP log record).
    pub fn send_log_message(&self, session_id: &str, level: LogLevel, data: Value) -> bool {
        let params = LogMessageParams {
            level,
            logger: Some(crate::types::SERVER_NAME.to_string()),
            data,
        };
        self.send_serialized(session_id, "notifications/message", &params)
    }

    /// Write one framed event to every live session. A failed write is logged
    /// and skipped; returns how many sessions received it.
    pub fn broadcast(&self, event: &str, data: &str) -> usize {
        let frame = framer::frame(event, data);
        let mut delivered = 0;
        for (id, connection) in self.registry.connections() {
            match connection.write(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(session = %id, event, "Broadcast write failed: {e}"),
            }
        }
        delivered
    }

    fn send_serialized<T: serde::Serialize>(&self, session_id: &str, method: &str, params: &T) -> bool {
        match to_params(params) {
            Ok(value) => self.send_notification(session_id, method, Some(value)),
            Err(e) => {
                tracing::warn!(method, "Failed to serialize notification params: {e}");
                false
            }
        }
    }
}

fn to_params<T: serde::Serialize>(params: &T) -> McpResult<Value> {
    Ok(serde_json::to_value(params)?)
}
