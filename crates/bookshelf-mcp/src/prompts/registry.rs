//! Prompt registration.

use crate::types::PromptDefinition;

/// Registry of all available MCP prompts.
pub struct PromptRegistry;

impl PromptRegistry {
    /// List all available prompt definitions.
    pub fn list_prompts() -> Vec<PromptDefinition> {
        Vec::new()
    }
}
