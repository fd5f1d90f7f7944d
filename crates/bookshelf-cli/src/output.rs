//! Output formatting for CLI
//!
//! Provides consistent output formatting across the one-shot commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;

use bookshelf_core::{Book, Books};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the catalog listing
    ///
    /// `None` is the empty-catalog signal from `Catalog::list_books`.
    pub fn print_books(&self, books: Option<Books<'_>>) -> Result<()> {
        match self.format {
            OutputFormat::Human => match books {
                None => println!("No books available in the library."),
                Some(books) => {
                    print!("{}", render_listing(books));
                }
            },
            OutputFormat::Json => {
                let books: Vec<&Book> = books.map(|books| books.collect()).unwrap_or_default();
                println!("{}", serde_json::to_string_pretty(&books)?);
            }
            OutputFormat::Quiet => {
                for book in books.into_iter().flatten() {
                    println!("{}", book.id);
                }
            }
        }
        Ok(())
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) -> Result<()> {
        match self.format {
            OutputFormat::Human => println!("{}", book),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(book)?),
            OutputFormat::Quiet => println!("{}", book.id),
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Render the human listing used by both `list` and the interactive shell
pub fn render_listing<'a>(books: impl Iterator<Item = &'a Book>) -> String {
    let mut text = String::from("\nLibrary Books:\n");
    for book in books {
        text.push_str("  ");
        text.push_str(&book.to_string());
        text.push('\n');
    }
    text
}
