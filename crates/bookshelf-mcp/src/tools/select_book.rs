//! `select_book` tool. Confirm a book choice for the calling session.

use serde::Deserialize;
use serde_json::{json, Value};

use bookshelf::Catalog;

use crate::protocol::CallContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct SelectParams {
    book_id: String,
}

/// Return the tool definition for select_book.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "select_book".to_string(),
        description: Some("Select a book from the catalog".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "book_id": { "type": "string", "description": "Catalog id of the book to select" }
            },
            "required": ["book_id"]
        }),
    }
}

/// Execute the select_book tool. The selection is echoed back, not stored.
pub fn execute(args: Value, catalog: &Catalog, ctx: &CallContext) -> McpResult<ToolCallResult> {
    let params: SelectParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let book = catalog.get(&params.book_id)?;

    tracing::info!(session = %ctx.session_id, book = %book.id, "Book selected");

    Ok(ToolCallResult::json(&json!({
        "selected": true,
        "session_id": ctx.session_id,
        "book": book
    })))
}
