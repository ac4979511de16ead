//! `server_status` tool. Liveness and basic counters.

use serde_json::{json, Value};

use bookshelf::Catalog;

use crate::protocol::CallContext;
use crate::types::{McpResult, ToolCallResult, ToolDefinition, SERVER_VERSION};

/// Return the tool definition for server_status.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "server_status".to_string(),
        description: Some("Get server status and connection count".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Execute the server_status tool.
pub fn execute(_args: Value, catalog: &Catalog, ctx: &CallContext) -> McpResult<ToolCallResult> {
    Ok(ToolCallResult::json(&json!({
        "status": "ok",
        "transport": "sse",
        "connections": ctx.live_sessions,
        "session_id": ctx.session_id,
        "catalog_size": catalog.len(),
        "started_at": ctx.started_at.to_rfc3339(),
        "uptime_secs": ctx.uptime_secs(),
        "version": SERVER_VERSION,
    })))
}
