//! Per-call context handed to method and tool handlers.

use chrono::{DateTime, Utc};

/// What a handler may know about the call beyond its params.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Session the request arrived on.
    pub session_id: String,
    /// Live sessions at dispatch time.
    pub live_sessions: usize,
    /// When the server started.
    pub started_at: DateTime<Utc>,
}

impl CallContext {
    /// Build a context.
    pub fn new(session_id: impl Into<String>, live_sessions: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            live_sessions,
            started_at,
        }
    }

    /// Whole seconds since the server started.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
