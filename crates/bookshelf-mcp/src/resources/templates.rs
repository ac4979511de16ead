//! Resource and resource-template definitions.

use crate::types::{ResourceDefinition, ResourceTemplateDefinition};

use super::registry::LIBRARY_LIST_URI;

/// Return all resource URI templates. The catalog exposes none.
pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    Vec::new()
}

/// Return all concrete resource definitions.
pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: LIBRARY_LIST_URI.to_string(),
        name: "Book Catalog".to_string(),
        description: Some("Every book in the library as JSON".to_string()),
        mime_type: Some("application/json".to_string()),
    }]
}
