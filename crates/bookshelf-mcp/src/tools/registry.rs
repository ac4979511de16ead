//! Tool registration and dispatch.

use serde_json::Value;

use bookshelf::Catalog;

use crate::protocol::CallContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{get_book_info, list_books, search_book, select_book, server_status};

/// Signature shared by every tool.
pub type ToolHandler = fn(Value, &Catalog, &CallContext) -> McpResult<ToolCallResult>;

/// One row of the tool table.
pub struct ToolEntry {
    /// Tool name as advertised in `tools/list`.
    pub name: &'static str,
    /// Builds the advertised definition.
    pub definition: fn() -> ToolDefinition,
    /// Runs the tool.
    pub execute: ToolHandler,
}

/// Every tool, in the order `tools/list` reports them.
pub const TOOLS: &[ToolEntry] = &[
    ToolEntry {
        name: "search_book",
        definition: search_book::definition,
        execute: search_book::execute,
    },
    ToolEntry {
        name: "get_book_info",
        definition: get_book_info::definition,
        execute: get_book_info::execute,
    },
    ToolEntry {
        name: "list_books",
        definition: list_books::definition,
        execute: list_books::execute,
    },
    ToolEntry {
        name: "select_book",
        definition: select_book::definition,
        execute: select_book::execute,
    },
    ToolEntry {
        name: "server_status",
        definition: server_status::definition,
        execute: server_status::execute,
    },
];

/// Registry of all available MCP tools.
pub struct ToolRegistry;

impl ToolRegistry {
    /// List all tool definitions.
    pub fn list_tools() -> Vec<ToolDefinition> {
        TOOLS.iter().map(|entry| (entry.definition)()).collect()
    }

    /// Run the tool called `name`.
    pub fn call(
        name: &str,
        args: Value,
        catalog: &Catalog,
        ctx: &CallContext,
    ) -> McpResult<ToolCallResult> {
        let entry = TOOLS
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;
        (entry.execute)(args, catalog, ctx)
    }
}
