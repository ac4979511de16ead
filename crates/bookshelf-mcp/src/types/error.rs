//! Error types and JSON-RPC error codes.

use thiserror::Error;

use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-defined error codes (the -32000 to -32099 range).
pub mod mcp_error_codes {
    /// Generic server error; every fault raised inside a handler is reported with it.
    pub const SERVER_ERROR: i32 = -32000;
}

/// Errors that can occur while serving requests.
#[derive(Debug, Error)]
pub enum McpError {
    /// Body was not valid JSON.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Body was JSON but not a request object.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown method.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Parameters did not match what the handler expects.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unknown tool name in `tools/call`.
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Unsupported resource uri in `resources/read`.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Catalog lookup or loading failed.
    #[error(transparent)]
    Catalog(#[from] bookshelf::CatalogError),

    /// No live stream for the given session id.
    #[error("No active SSE connection.")]
    SessionNotFound(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Transport-level failure (write to a closed stream, bind failure).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            McpError::ParseError(_) => error_codes::PARSE_ERROR,
            McpError::InvalidRequest(_) | McpError::SessionNotFound(_) => {
                error_codes::INVALID_REQUEST
            }
            McpError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            McpError::ToolNotFound(_) | McpError::ResourceNotFound(_) | McpError::Catalog(_) => {
                mcp_error_codes::SERVER_ERROR
            }
            McpError::Internal(_)
            | McpError::Transport(_)
            | McpError::Config(_)
            | McpError::Io(_)
            | McpError::Json(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Build a JSON-RPC error response carrying this error.
    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.to_string())
    }

    /// Build the `-32000` envelope used for faults raised inside a handler.
    pub fn to_server_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, mcp_error_codes::SERVER_ERROR, self.to_string())
    }
}

/// Result alias used throughout the crate.
pub type McpResult<T> = Result<T, McpError>;
