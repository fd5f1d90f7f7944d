//! Bookshelf Core Library
//!
//! This crate provides the core functionality for Bookshelf, a small library
//! catalog that lends books to members and keeps its books in a flat text file.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use bookshelf_core::{Book, Catalog, Member};
//!
//! let mut catalog = Catalog::new();
//! catalog.load(Path::new("library_data.txt"))?;
//!
//! catalog.add_book(Book::new("B1", "Dune", "Herbert"));
//! let alice = catalog.add_member(Member::new("Alice", "M1"));
//! catalog.borrow_book("B1", alice)?;
//!
//! catalog.save(Path::new("library_data.txt"))?;
//! # Ok::<(), bookshelf_core::CatalogError>(())
//! ```
//!
//! # Modules
//!
//! - `catalog`: The catalog and its lending operations (main entry point)
//! - `models`: Books, members and their handles
//! - `storage`: Flat-file persistence
//! - `error`: Catalog error taxonomy
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use catalog::{Books, Catalog};
pub use config::Config;
pub use error::{CatalogError, CatalogResult};
pub use models::{Book, BookKey, BookStatus, Member, MemberKey};
pub use storage::{LoadOutcome, StorageError};
