//! The book catalog: validated, ordered, read-only after construction.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::book::Book;
use crate::error::{CatalogError, CatalogResult};

/// Which field a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Title, author, genre or tags.
    #[default]
    Any,
    /// Title only.
    Title,
    /// Author only.
    Author,
    /// Genre only.
    Genre,
}

impl SearchField {
    /// Parse a field name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "any" => Some(Self::Any),
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "genre" => Some(Self::Genre),
            _ => None,
        }
    }
}

/// An ordered collection of books with unique ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    books: Vec<Book>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { books: Vec<Book> },
    Bare(Vec<Book>),
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and blank titles.
    pub fn from_books(books: Vec<Book>) -> CatalogResult<Self> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if book.id.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    id: book.id.clone(),
                    reason: "id is empty".to_string(),
                });
            }
            if book.title.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    id: book.id.clone(),
                    reason: "title is empty".to_string(),
                });
            }
            if !seen.insert(book.id.as_str()) {
                return Err(CatalogError::DuplicateId(book.id.clone()));
            }
        }
        Ok(Self { books })
    }

    /// Parse a catalog from JSON: either `[..]` or `{"books": [..]}`.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let books = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Wrapped { books } | CatalogFile::Bare(books) => books,
        };
        Self::from_books(books)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The built-in sample catalog.
    pub fn sample() -> Self {
        let books = vec![
            sample_book(
                "pride-and-prejudice",
                "Pride and Prejudice",
                "Jane Austen",
                1813,
                "romance",
                "A witty courtship between Elizabeth Bennet and Mr. Darcy.",
                &["classic", "regency"],
            ),
            sample_book(
                "moby-dick",
                "Moby-Dick",
                "Herman Melville",
                1851,
                "adventure",
                "Captain Ahab's obsessive hunt for the white whale.",
                &["classic", "sea"],
            ),
            sample_book(
                "frankenstein",
                "Frankenstein",
                "Mary Shelley",
                1818,
                "science fiction",
                "A scientist creates life and is haunted by the result.",
                &["classic", "gothic"],
            ),
            sample_book(
                "dracula",
                "Dracula",
                "Bram Stoker",
                1897,
                "horror",
                "An ancient count travels from Transylvania to England.",
                &["classic", "gothic", "epistolary"],
            ),
            sample_book(
                "time-machine",
                "The Time Machine",
                "H. G. Wells",
                1895,
                "science fiction",
                "A Victorian inventor journeys to the year 802,701.",
                &["novella"],
            ),
            sample_book(
                "emma",
                "Emma",
                "Jane Austen",
                1815,
                "romance",
                "A well-meaning matchmaker misreads everyone around her.",
                &["classic", "regency"],
            ),
        ];
        Self { books }
    }

    /// Number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog has no books.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All books in catalog order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Look up a book by id.
    pub fn get(&self, id: &str) -> CatalogResult<&Book> {
        self.books
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| CatalogError::BookNotFound(id.to_string()))
    }

    /// Books matching optional genre and author filters (case-insensitive, exact for
    /// genre, substring for author).
    pub fn list(&self, genre: Option<&str>, author: Option<&str>) -> Vec<&Book> {
        let genre = genre.map(str::to_lowercase);
        let author = author.map(str::to_lowercase);
        self.books
            .iter()
            .filter(|b| genre.as_ref().map_or(true, |g| b.genre.to_lowercase() == *g))
            .filter(|b| {
                author
                    .as_ref()
                    .map_or(true, |a| b.author.to_lowercase().contains(a.as_str()))
            })
            .collect()
    }

    /// Case-insensitive substring search, at most `limit` results in catalog order.
    pub fn search(&self, query: &str, field: SearchField, limit: usize) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);
        self.books
            .iter()
            .filter(|b| match field {
                SearchField::Title => hit(&b.title),
                SearchField::Author => hit(&b.author),
                SearchField::Genre => hit(&b.genre),
                SearchField::Any => {
                    hit(&b.title) || hit(&b.author) || hit(&b.genre) || b.tags.iter().any(|t| hit(t))
                }
            })
            .take(limit)
            .collect()
    }

    /// Distinct genres, in first-seen order.
    pub fn genres(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.books
            .iter()
            .map(|b| b.genre.as_str())
            .filter(|g| seen.insert(*g))
            .collect()
    }
}

fn sample_book(
    id: &str,
    title: &str,
    author: &str,
    year: i32,
    genre: &str,
    summary: &str,
    tags: &[&str],
) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        year,
        genre: genre.to_string(),
        isbn: None,
        summary: Some(summary.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}
