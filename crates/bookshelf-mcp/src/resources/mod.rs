//! MCP resource implementations: read-only views of the book catalog.

pub mod registry;
pub mod templates;

pub use registry::{ResourceRegistry, LIBRARY_LIST_URI};
