//! MCP tool implementations: lookups over the book catalog.

pub mod get_book_info;
pub mod list_books;
pub mod registry;
pub mod search_book;
pub mod select_book;
pub mod server_status;

pub use registry::{ToolEntry, ToolRegistry, TOOLS};
