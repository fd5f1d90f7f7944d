//! Data models for Bookshelf
//!
//! Defines the core data structures: Book, BookStatus and Member.
//! Books live in the catalog's canonical store and are addressed by
//! [`BookKey`]; members refer to the books they hold through those keys.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque handle to a record in the catalog's canonical book store
///
/// Keys are never reused within a catalog, so a key held by a member keeps
/// pointing at the same record even after that record leaves the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookKey(pub(crate) u64);

/// Handle to a member registered in a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey(pub(crate) usize);

/// Lending status of a book
///
/// Data files may carry status words other than `available` and `borrowed`.
/// Those are kept in [`BookStatus::Other`] and written back unchanged; a book
/// in that state is not available for borrowing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookStatus {
    /// On the shelf and free to borrow
    #[default]
    Available,
    /// Held by a member
    Borrowed,
    /// Unrecognised word read from storage, kept verbatim
    Other(String),
}

impl BookStatus {
    /// The word used for this status in listings and data files
    pub fn as_str(&self) -> &str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::Other(word) => word,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BookStatus::Available)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for BookStatus {
    fn from(word: String) -> Self {
        match word.as_str() {
            "available" => BookStatus::Available,
            "borrowed" => BookStatus::Borrowed,
            _ => BookStatus::Other(word),
        }
    }
}

impl From<BookStatus> for String {
    fn from(status: BookStatus) -> Self {
        match status {
            BookStatus::Other(word) => word,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for BookStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BookStatus::from(s.to_string()))
    }
}

/// A single book in the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Caller-assigned identifier (not required to be unique)
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub status: BookStatus,
}

impl Book {
    /// Create a new, available book
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::with_status(id, title, author, BookStatus::Available)
    }

    /// Create a book with an explicit status (for loading from storage)
    pub fn with_status(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        status: BookStatus,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            status,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} by {} - Status: {}",
            self.id, self.title, self.author, self.status
        )
    }
}

/// A library member who can borrow books
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    /// Caller-assigned identifier (not required to be unique)
    pub id: String,
    /// Books currently held, in borrow order
    pub(crate) held: Vec<BookKey>,
}

impl Member {
    /// Create a member holding no books
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            held: Vec::new(),
        }
    }

    /// Keys of the books this member holds, in borrow order
    pub fn held_keys(&self) -> &[BookKey] {
        &self.held
    }

    /// Number of books currently held
    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}
