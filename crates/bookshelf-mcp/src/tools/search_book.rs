//! `search_book` tool. Case-insensitive search over titles, authors and genres.

use serde::Deserialize;
use serde_json::{json, Value};

use bookshelf::{Catalog, SearchField};

use crate::protocol::CallContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default = "default_field")]
    field: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_field() -> String {
    "any".to_string()
}

fn default_limit() -> usize {
    10
}

/// Return the tool definition for search_book.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "search_book".to_string(),
        description: Some("Search the catalog by title, author or genre".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Text to look for" },
                "field": {
                    "type": "string",
                    "enum": ["any", "title", "author", "genre"],
                    "default": "any"
                },
                "limit": { "type": "integer", "minimum": 1, "default": 10 }
            },
            "required": ["query"]
        }),
    }
}

/// Execute the search_book tool.
pub fn execute(args: Value, catalog: &Catalog, _ctx: &CallContext) -> McpResult<ToolCallResult> {
    let params: SearchParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let field = SearchField::from_name(&params.field)
        .ok_or_else(|| McpError::InvalidParams(format!("Unknown search field: {}", params.field)))?;

    let books: Vec<Value> = catalog
        .search(&params.query, field, params.limit.max(1))
        .into_iter()
        .map(|book| json!(book.summary()))
        .collect();

    Ok(ToolCallResult::json(&json!({
        "query": params.query,
        "field": params.field,
        "count": books.len(),
        "books": books
    })))
}
