//! `list_books` tool. Catalog listing with optional genre/author filters.

use serde::Deserialize;
use serde_json::{json, Value};

use bookshelf::Catalog;

use crate::protocol::CallContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    genre: Option<String>,
    author: Option<String>,
}

/// Return the tool definition for list_books.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "list_books".to_string(),
        description: Some("List books in the catalog".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "genre": { "type": "string", "description": "Only books of this genre" },
                "author": { "type": "string", "description": "Only books whose author contains this" }
            }
        }),
    }
}

/// Execute the list_books tool.
pub fn execute(args: Value, catalog: &Catalog, _ctx: &CallContext) -> McpResult<ToolCallResult> {
    let params: ListParams = if args.is_null() {
        ListParams::default()
    } else {
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?
    };

    let books: Vec<Value> = catalog
        .list(params.genre.as_deref(), params.author.as_deref())
        .into_iter()
        .map(|book| json!(book.summary()))
        .collect();

    Ok(ToolCallResult::json(&json!({
        "count": books.len(),
        "genres": catalog.genres(),
        "books": books
    })))
}
