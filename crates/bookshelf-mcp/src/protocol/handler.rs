//! JSON-RPC dispatcher: routes one request through the static method table.
//!
//! Dispatch is a pure function of the request and its [`CallContext`]; nothing
//! survives between calls. Parse errors and unknown methods are detected
//! structurally. Every fault a handler raises becomes a `-32000` reply at this
//! boundary.

use std::sync::Arc;

use serde_json::Value;

use bookshelf::Catalog;

use crate::prompts::PromptRegistry;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use crate::types::{
    EmptyResult, JsonRpcReply, JsonRpcRequest, JsonRpcResponse, McpError, McpResult,
    MethodResult, PromptListResult, RequestId, ResourceListResult,
    ResourceReadParams, ResourceTemplateListResult, ToolCallParams, ToolListResult,
};

use super::context::CallContext;
use super::{negotiation, validator};

/// Client notification that completes the handshake; never answered.
pub const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";

/// Signature shared by every method handler.
pub type MethodHandler = fn(&ProtocolHandler, Option<Value>, &CallContext) -> McpResult<MethodResult>;

/// Every supported method, by name.
pub const METHODS: &[(&str, MethodHandler)] = &[
    ("initialize", ProtocolHandler::initialize),
    (INITIALIZED_NOTIFICATION, ProtocolHandler::initialized),
    ("ping", ProtocolHandler::ping),
    ("tools/list", ProtocolHandler::list_tools),
    ("tools/call", ProtocolHandler::call_tool),
    ("resources/list", ProtocolHandler::list_resources),
    ("resources/templates/list", ProtocolHandler::list_resource_templates),
    ("resources/read", ProtocolHandler::read_resource),
    ("prompts/list", ProtocolHandler::list_prompts),
];

/// Find the handler for `method`.
pub fn lookup_method(method: &str) -> Option<MethodHandler> {
    METHODS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, handler)| *handler)
}

/// Stateless request router over the book catalog.
#[derive(Debug, Clone)]
pub struct ProtocolHandler {
    catalog: Arc<Catalog>,
}

impl ProtocolHandler {
    /// Create a handler serving `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// The catalog being served.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handle a raw POST body. `None` means nothing goes back on the stream.
    pub fn handle_body(&self, body: &[u8], ctx: &CallContext) -> Option<JsonRpcReply<MethodResult>> {
        match validator::parse_request(body) {
            Ok(request) => self.handle_request(request, ctx),
            Err(error) => {
                tracing::debug!(session = %ctx.session_id, code = error.error.code, "Rejected request body");
                Some(JsonRpcReply::Failure(error))
            }
        }
    }

    /// Dispatch one parsed request.
    pub fn handle_request(
        &self,
        request: JsonRpcRequest,
        ctx: &CallContext,
    ) -> Option<JsonRpcReply<MethodResult>> {
        let notification = request.is_notification() || request.method == INITIALIZED_NOTIFICATION;
        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        tracing::debug!(session = %ctx.session_id, %method, notification, "Dispatching");

        let Some(handler) = lookup_method(&method) else {
            if notification {
                return None;
            }
            return Some(JsonRpcReply::Failure(
                McpError::MethodNotFound(method).to_json_rpc_error(id.unwrap_or(RequestId::Null)),
            ));
        };

        let outcome = handler(self, params, ctx);
        if notification {
            if let Err(e) = outcome {
                tracing::debug!(session = %ctx.session_id, %method, "Notification failed: {e}");
            }
            return None;
        }
        let id = id.unwrap_or(RequestId::Null);

        Some(match outcome {
            Ok(result) => JsonRpcReply::Success(JsonRpcResponse::new(id, result)),
            Err(e) => {
                tracing::warn!(session = %ctx.session_id, %method, "Request failed: {e}");
                JsonRpcReply::Failure(e.to_server_error(id))
            }
        })
    }

    fn initialize(&self, params: Option<Value>, _ctx: &CallContext) -> McpResult<MethodResult> {
        Ok(MethodResult::Initialize(negotiation::negotiate(params)))
    }

    fn initialized(&self, _params: Option<Value>, ctx: &CallContext) -> McpResult<MethodResult> {
        tracing::info!(session = %ctx.session_id, "MCP handshake complete");
        Ok(MethodResult::Empty(EmptyResult::default()))
    }

    fn ping(&self, _params: Option<Value>, _ctx: &CallContext) -> McpResult<MethodResult> {
        Ok(MethodResult::Empty(EmptyResult::default()))
    }

    fn list_tools(&self, _params: Option<Value>, _ctx: &CallContext) -> McpResult<MethodResult> {
        Ok(MethodResult::ToolList(ToolListResult {
            tools: ToolRegistry::list_tools(),
            next_cursor: None,
        }))
    }

    fn call_tool(&self, params: Option<Value>, ctx: &CallContext) -> McpResult<MethodResult> {
        let params: ToolCallParams = parse_params(params)?;
        let args = params.arguments.unwrap_or_else(|| Value::Object(Default::default()));
        let result = ToolRegistry::call(&params.name, args, &self.catalog, ctx)?;
        Ok(MethodResult::ToolCall(result))
    }

    fn list_resources(&self, _params: Option<Value>, _ctx: &CallContext) -> McpResult<MethodResult> {
        Ok(MethodResult::ResourceList(ResourceListResult {
            resources: ResourceRegistry::list_resources(),
            next_cursor: None,
        }))
    }

    fn list_resource_templates(
        &self,
        _params: Option<Value>,
        _ctx: &CallContext,
    ) -> McpResult<MethodResult> {
        Ok(MethodResult::ResourceTemplateList(ResourceTemplateListResult {
            resource_templates: ResourceRegistry::list_templates(),
            next_cursor: None,
        }))
    }

    fn read_resource(&self, params: Option<Value>, _ctx: &CallContext) -> McpResult<MethodResult> {
        let params: ResourceReadParams = parse_params(params)?;
        let result = ResourceRegistry::read(&params.uri, &self.catalog)?;
        Ok(MethodResult::ReadResource(result))
    }

    fn list_prompts(&self, _params: Option<Value>, _ctx: &CallContext) -> McpResult<MethodResult> {
        Ok(MethodResult::PromptList(PromptListResult {
            prompts: PromptRegistry::list_prompts(),
            next_cursor: None,
        }))
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> McpResult<T> {
    let params = params.ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}
