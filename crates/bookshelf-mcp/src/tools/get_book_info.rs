//! `get_book_info` tool. Full record for one book.

use serde::Deserialize;
use serde_json::{json, Value};

use bookshelf::Catalog;

use crate::protocol::CallContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct InfoParams {
    book_id: String,
}

/// Return the tool definition for get_book_info.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_book_info".to_string(),
        description: Some("Get the full catalog record for a book".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "book_id": { "type": "string", "description": "Catalog id of the book" }
            },
            "required": ["book_id"]
        }),
    }
}

/// Execute the get_book_info tool.
pub fn execute(args: Value, catalog: &Catalog, _ctx: &CallContext) -> McpResult<ToolCallResult> {
    let params: InfoParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let book = catalog.get(&params.book_id)?;
    Ok(ToolCallResult::json(book))
}
