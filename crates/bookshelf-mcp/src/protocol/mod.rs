//! MCP protocol layer: request validation, method dispatch, and initialization.

pub mod context;
pub mod handler;
pub mod negotiation;
pub mod validator;

pub use context::CallContext;
pub use handler::{lookup_method, MethodHandler, ProtocolHandler, METHODS};
