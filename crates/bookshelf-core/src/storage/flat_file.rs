//! Flat-file persistence for the catalog
//!
//! Saving rewrites the whole file; loading reads it in full and appends the
//! records to the catalog only when every line parsed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::error::{StorageError, StorageResult};
use super::record;
use crate::catalog::Catalog;

/// What a load found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed; this many books were appended
    Loaded(usize),
    /// There was no file; the catalog was left as it was
    NoData,
}

impl Catalog {
    /// Write every book in the catalog to `path`, one record per line
    ///
    /// The file is truncated first. Books removed from the catalog but still
    /// held by a member are not written.
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let file = File::create(path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
        let mut writer = BufWriter::new(file);

        let mut count = 0usize;
        for book in self.books() {
            writeln!(writer, "{}", record::encode(book))
                .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
            count += 1;
        }

        writer
            .flush()
            .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

        info!(path = %path.display(), count, "Catalog saved");
        Ok(())
    }

    /// Append the books stored in `path` to the catalog
    ///
    /// A missing file is not an error. Any line that is not a valid record
    /// fails the whole load and leaves the catalog untouched.
    pub fn load(&mut self, path: &Path) -> StorageResult<LoadOutcome> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No data file, starting empty");
                return Ok(LoadOutcome::NoData);
            }
            Err(e) => return Err(StorageError::from_read(e, path.to_path_buf())),
        };

        let mut books = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| StorageError::from_read(e, path.to_path_buf()))?;
            let book = record::decode(&line).map_err(|details| StorageError::MalformedRecord {
                path: path.to_path_buf(),
                line: index + 1,
                details,
            })?;
            debug!(id = %book.id, "Parsed record");
            books.push(book);
        }

        let count = books.len();
        for book in books {
            self.add_book(book);
        }

        info!(path = %path.display(), count, "Catalog loaded");
        Ok(LoadOutcome::Loaded(count))
    }
}
