//! Storage layer
//!
//! Persists the catalog's books to a plain text file, one record per line.
//!
//! ## Format
//!
//! ```text
//! <book_id>,<title>,<author>,<status>
//! ```
//!
//! No header, no quoting, no escaping. Members are not persisted.

pub mod error;
pub mod flat_file;
pub mod record;

pub use error::{StorageError, StorageResult};
pub use flat_file::LoadOutcome;
