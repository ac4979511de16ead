//! MCP initialization. The server is stateless across requests, so `initialize`
//! only inspects what the client sent and returns the fixed descriptor.

use serde_json::Value;

use crate::types::{InitializeParams, InitializeResult, MCP_VERSION};

/// Answer an `initialize` request. Always succeeds; malformed params are ignored.
pub fn negotiate(params: Option<Value>) -> InitializeResult {
    let params: InitializeParams = params
        .and_then(|p| serde_json::from_value(p).ok())
        .unwrap_or_default();

    if let Some(requested) = params.protocol_version.as_deref() {
        if requested != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                requested,
                MCP_VERSION
            );
        }
    }

    if let Some(client) = &params.client_info {
        tracing::info!("Initialized with client: {} v{}", client.name, client.version);
    }

    InitializeResult::default_result()
}
