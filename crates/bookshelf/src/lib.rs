//! Bookshelf: a small in-memory book catalog.
//!
//! Books are loaded once (from a JSON file or the built-in sample set) and
//! then only read: lookups by id, filtered listings and substring search.

pub mod book;
pub mod catalog;
pub mod error;

pub use book::{Book, BookSummary};
pub use catalog::{Catalog, SearchField};
pub use error::{CatalogError, CatalogResult};
