//! Book records.

use serde::{Deserialize, Serialize};

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Year of first publication.
    pub year: i32,
    /// Genre label.
    pub genre: String,
    /// ISBN, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The short form of a book used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    /// Book id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Year of first publication.
    pub year: i32,
}

impl Book {
    /// Build the listing form of this book.
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
        }
    }
}
