//! Resource registration and dispatch for MCP resources.

use bookshelf::Catalog;

use crate::types::{
    McpError, McpResult, ReadResourceResult, ResourceContent, ResourceDefinition,
    ResourceTemplateDefinition,
};

use super::templates;

/// URI of the full catalog listing.
pub const LIBRARY_LIST_URI: &str = "book://library/list";

/// Registry of all available MCP resources.
pub struct ResourceRegistry;

impl ResourceRegistry {
    /// List all resource URI templates.
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    /// List all concrete (non-templated) resources.
    pub fn list_resources() -> Vec<ResourceDefinition> {
        templates::list_resources()
    }

    /// Read a resource by URI.
    pub fn read(uri: &str, catalog: &Catalog) -> McpResult<ReadResourceResult> {
        if uri != LIBRARY_LIST_URI {
            return Err(McpError::ResourceNotFound(uri.to_string()));
        }

        let text = serde_json::to_string_pretty(catalog.books())?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                mime_type: Some("application/json".to_string()),
                text: Some(text),
                blob: None,
            }],
        })
    }
}
