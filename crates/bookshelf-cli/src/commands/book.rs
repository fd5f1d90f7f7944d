//! Book command handlers
//!
//! Each command loads the data file, applies one operation and, for
//! mutations, saves the file again.

use std::path::Path;

use anyhow::Result;

use bookshelf_core::{Book, Catalog, LoadOutcome};

use super::storage_failure;
use crate::output::Output;
use crate::prompt::confirm;

/// Load the catalog stored at `data_file`
fn open(data_file: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    let outcome = catalog.load(data_file).map_err(|e| {
        storage_failure(e, format!("Failed to load library data from {:?}", data_file))
    })?;
    if outcome == LoadOutcome::NoData {
        tracing::debug!(path = %data_file.display(), "No data file yet");
    }
    Ok(catalog)
}

fn persist(catalog: &Catalog, data_file: &Path) -> Result<()> {
    catalog
        .save(data_file)
        .map_err(|e| storage_failure(e, format!("Failed to save library data to {:?}", data_file)))
}

/// List all books
pub fn list(data_file: &Path, output: &Output) -> Result<()> {
    let catalog = open(data_file)?;
    output.print_books(catalog.list_books())
}

/// Add a book
pub fn add(data_file: &Path, id: String, title: String, author: String, output: &Output) -> Result<()> {
    let mut catalog = open(data_file)?;

    let message = format!("Book '{}' added to the library.", title);
    catalog.add_book(Book::new(id, title, author));
    persist(&catalog, data_file)?;

    output.success(&message);
    Ok(())
}

/// Remove the first book with the given id
pub fn remove(data_file: &Path, id: String, yes: bool, output: &Output) -> Result<()> {
    let mut catalog = open(data_file)?;

    let book = catalog.find_book(&id)?;

    // Confirm removal
    if output.should_prompt() && !yes {
        output.message(&format!("Remove book: {}", book));
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    let removed = catalog.remove_book(&id)?;
    persist(&catalog, data_file)?;

    output.success(&format!("Book '{}' removed successfully.", removed.title));
    Ok(())
}

/// Show a single book
pub fn show(data_file: &Path, id: String, output: &Output) -> Result<()> {
    let catalog = open(data_file)?;
    let book = catalog.find_book(&id)?;
    output.print_book(book)
}
