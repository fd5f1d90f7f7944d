//! Line codec for the flat data file
//!
//! One book per line: `id,title,author,status`. Fields are joined with a
//! bare comma and never escaped, so a comma or newline inside a field makes
//! the file unreadable on the next load.

use crate::models::{Book, BookStatus};

/// Field separator
pub const SEPARATOR: char = ',';

/// Number of fields in every record
pub const FIELD_COUNT: usize = 4;

/// Render a book as a single record line (without the trailing newline)
pub fn encode(book: &Book) -> String {
    format!(
        "{id}{sep}{title}{sep}{author}{sep}{status}",
        id = book.id,
        title = book.title,
        author = book.author,
        status = book.status,
        sep = SEPARATOR
    )
}

/// Parse one record line
///
/// Surrounding whitespace is trimmed from the line first; the fields
/// themselves are taken verbatim, including a status word this program does
/// not know. The error string describes what is wrong and is attached to a
/// line number by the caller.
pub fn decode(line: &str) -> Result<Book, String> {
    let fields: Vec<&str> = line.trim().split(SEPARATOR).collect();

    let [id, title, author, status] = fields.as_slice() else {
        return Err(format!(
            "expected {} comma-separated fields, found {}",
            FIELD_COUNT,
            fields.len()
        ));
    };

    Ok(Book::with_status(
        *id,
        *title,
        *author,
        BookStatus::from(status.to_string()),
    ))
}
