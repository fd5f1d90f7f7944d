//! Catalog error taxonomy

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by catalog operations
///
/// Lookup misses and invalid state transitions never mutate the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No book on the shelf carries this id
    #[error("Book not found: '{id}'")]
    BookNotFound { id: String },

    /// No registered member matches this id or key
    #[error("Member not found: '{id}'")]
    MemberNotFound { id: String },

    /// The first book with this id is already lent out
    #[error("Book '{id}' is already borrowed")]
    AlreadyBorrowed { id: String },

    /// The member holds no book with this id
    #[error("Member '{member_id}' did not borrow book '{book_id}'")]
    NotBorrowedByMember { book_id: String, member_id: String },

    /// Reading or writing the data file failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// True for lookup misses (book or member)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::BookNotFound { .. } | CatalogError::MemberNotFound { .. }
        )
    }

    /// True when the request was rejected because of a book's lending state
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            CatalogError::AlreadyBorrowed { .. } | CatalogError::NotBorrowedByMember { .. }
        )
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
