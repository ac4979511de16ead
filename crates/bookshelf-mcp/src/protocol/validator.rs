//! Structural validation of incoming JSON-RPC bodies.

use serde_json::Value;

use crate::types::{JsonRpcError, JsonRpcRequest, McpError, RequestId, JSONRPC_VERSION};

/// Parse a POST body into a request, or the error reply it deserves.
///
/// Malformed JSON answers with `id: null`; JSON that is not a request object,
/// or that does not declare `"jsonrpc": "2.0"`, echoes its `id` when one can be
/// read.
pub fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| McpError::ParseError(e.to_string()).to_json_rpc_error(RequestId::Null))?;

    if !value.is_object() {
        return Err(McpError::InvalidRequest("expected a single request object".to_string())
            .to_json_rpc_error(RequestId::Null));
    }

    let id = id_of(&value);
    let request = serde_json::from_value::<JsonRpcRequest>(value)
        .map_err(|e| McpError::InvalidRequest(e.to_string()).to_json_rpc_error(id.clone()))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "unsupported jsonrpc version: {:?}",
            request.jsonrpc
        ))
        .to_json_rpc_error(id));
    }
    Ok(request)
}

/// Best-effort read of a body's `id`, for replies that cannot go through dispatch.
pub fn peek_id(body: &[u8]) -> RequestId {
    serde_json::from_slice::<Value>(body)
        .map(|v| id_of(&v))
        .unwrap_or(RequestId::Null)
}

fn id_of(value: &Value) -> RequestId {
    value
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
        .unwrap_or(RequestId::Null)
}
