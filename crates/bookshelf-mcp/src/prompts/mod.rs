//! MCP prompt templates. The catalog server advertises none.

pub mod registry;

pub use registry::PromptRegistry;
