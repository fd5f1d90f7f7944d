//! Interactive library menu
//!
//! Loads the catalog, then runs one catalog operation per menu selection
//! until the user exits, at which point the catalog is saved. Members only
//! exist for the length of a session.

use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info, warn};

use bookshelf_core::{Book, Catalog, CatalogError, LoadOutcome, Member};

use crate::commands::storage_failure;
use crate::output::render_listing;
use crate::prompt::read_line;

const MENU: &str = "
========= LIBRARY MENU =========
1. View Books
2. Add Book
3. Remove Book
4. Borrow Book
5. Return Book
6. Exit
================================
";

/// One entry of the numbered menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    View,
    Add,
    Remove,
    Borrow,
    Return,
    Exit,
}

impl MenuChoice {
    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(MenuChoice::View),
            2 => Some(MenuChoice::Add),
            3 => Some(MenuChoice::Remove),
            4 => Some(MenuChoice::Borrow),
            5 => Some(MenuChoice::Return),
            6 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Choice(MenuChoice),
    NotANumber,
    OutOfRange,
}

fn parse_selection(input: &str) -> Selection {
    match input.trim().parse::<i64>() {
        Ok(number) => MenuChoice::from_number(number).map_or(Selection::OutOfRange, Selection::Choice),
        // Still an integer, just too large to be a menu entry
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Selection::OutOfRange
        }
        Err(_) => Selection::NotANumber,
    }
}

/// Whether the menu loop keeps going
enum Flow {
    Continue,
    Stop,
}

/// The interactive session
pub struct Shell<'a, R, W> {
    catalog: &'a mut Catalog,
    data_file: PathBuf,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, data_file: impl Into<PathBuf>, input: R, out: W) -> Self {
        Self {
            catalog,
            data_file: data_file.into(),
            input,
            out,
        }
    }

    /// Load the data file and run the menu until exit or end of input
    ///
    /// A malformed data file aborts the session before the menu is shown.
    pub fn run(&mut self) -> Result<()> {
        self.load()?;

        loop {
            write!(self.out, "{}", MENU)?;
            let Some(line) = self.ask("Enter your choice (1–6): ")? else {
                self.end_of_input()?;
                return Ok(());
            };

            let flow = match parse_selection(&line) {
                Selection::NotANumber => {
                    writeln!(self.out, "Please enter a valid number (1-6).")?;
                    Flow::Continue
                }
                Selection::OutOfRange => {
                    writeln!(self.out, "Invalid choice. Please select between 1 and 6.")?;
                    Flow::Continue
                }
                Selection::Choice(choice) => self.dispatch(choice)?,
            };

            if let Flow::Stop = flow {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        match choice {
            MenuChoice::View => self.view_books(),
            MenuChoice::Add => self.add_book(),
            MenuChoice::Remove => self.remove_book(),
            MenuChoice::Borrow => self.borrow_book(),
            MenuChoice::Return => self.return_book(),
            MenuChoice::Exit => {
                self.save()?;
                writeln!(self.out, "Goodbye! Have a great day at the library.")?;
                Ok(Flow::Stop)
            }
        }
    }

    fn view_books(&mut self) -> Result<Flow> {
        match self.catalog.list_books() {
            None => writeln!(self.out, "No books available in the library.")?,
            Some(books) => write!(self.out, "{}", render_listing(books))?,
        }
        Ok(Flow::Continue)
    }

    fn add_book(&mut self) -> Result<Flow> {
        let Some(id) = self.ask("Enter book ID: ")? else {
            return self.end_of_input();
        };
        let Some(title) = self.ask("Enter book title: ")? else {
            return self.end_of_input();
        };
        let Some(author) = self.ask("Enter book author: ")? else {
            return self.end_of_input();
        };

        self.catalog.add_book(Book::new(id, title.clone(), author));
        writeln!(self.out, "Book '{}' added to the library.", title)?;
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> Result<Flow> {
        let Some(id) = self.ask("Enter book ID to remove: ")? else {
            return self.end_of_input();
        };

        let message = match self.catalog.remove_book(&id) {
            Ok(book) => format!("Book '{}' removed successfully.", book.title),
            Err(e) => describe(&e),
        };
        writeln!(self.out, "{}", message)?;
        Ok(Flow::Continue)
    }

    fn borrow_book(&mut self) -> Result<Flow> {
        let Some(name) = self.ask("Enter member name: ")? else {
            return self.end_of_input();
        };
        let Some(member_id) = self.ask("Enter member ID: ")? else {
            return self.end_of_input();
        };

        // Lookup-or-create: an unseen id registers a new member
        let member = match self.catalog.find_member_by_id(&member_id) {
            Ok(member) => member,
            Err(_) => self.catalog.add_member(Member::new(name, member_id)),
        };
        let holder = self
            .catalog
            .member(member)
            .map(|m| m.name.clone())
            .unwrap_or_default();

        let Some(book_id) = self.ask("Enter book ID to borrow: ")? else {
            return self.end_of_input();
        };

        let message = match self.catalog.borrow_book(&book_id, member) {
            Ok(book) => format!("{} borrowed '{}'.", holder, book.title),
            Err(e) => describe(&e),
        };
        writeln!(self.out, "{}", message)?;
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> Result<Flow> {
        let Some(member_id) = self.ask("Enter member ID: ")? else {
            return self.end_of_input();
        };

        let Ok(member) = self.catalog.find_member_by_id(&member_id) else {
            writeln!(self.out, "Member not found in records.")?;
            return Ok(Flow::Continue);
        };
        let holder = self
            .catalog
            .member(member)
            .map(|m| m.name.clone())
            .unwrap_or_default();

        let Some(book_id) = self.ask("Enter book ID to return: ")? else {
            return self.end_of_input();
        };

        let message = match self.catalog.return_book(&book_id, member) {
            Ok(book) => format!("{} returned '{}'.", holder, book.title),
            Err(e) => describe(&e),
        };
        writeln!(self.out, "{}", message)?;
        Ok(Flow::Continue)
    }

    fn load(&mut self) -> Result<()> {
        let outcome = self.catalog.load(&self.data_file).map_err(|e| {
            storage_failure(e, format!("Failed to load library data from {:?}", self.data_file))
        })?;

        match outcome {
            LoadOutcome::Loaded(count) => {
                info!(count, "Session started");
                writeln!(self.out, "Library data loaded successfully.")?;
            }
            LoadOutcome::NoData => {
                writeln!(self.out, "Data file not found. Starting with an empty library.")?;
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        match self.catalog.save(&self.data_file) {
            Ok(()) => writeln!(self.out, "Library data saved successfully.")?,
            Err(e) => {
                error!(
                    error = %e,
                    hint = e.recovery_suggestion().unwrap_or_default(),
                    "Failed to save library data"
                );
                writeln!(self.out, "Error: Unable to save library data.")?;
            }
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(read_line(&mut self.input, &mut self.out, prompt)?)
    }

    fn end_of_input(&mut self) -> Result<Flow> {
        warn!("Input closed, leaving without saving");
        writeln!(self.out)?;
        Ok(Flow::Stop)
    }
}

/// The shell's wording for a rejected catalog operation
fn describe(error: &CatalogError) -> String {
    match error {
        CatalogError::BookNotFound { .. } => "Book not found.".to_string(),
        CatalogError::MemberNotFound { .. } => "Member not found in records.".to_string(),
        CatalogError::AlreadyBorrowed { .. } => "This book is already borrowed.".to_string(),
        CatalogError::NotBorrowedByMember { .. } => {
            "This member did not borrow this book.".to_string()
        }
        CatalogError::Storage(e) => format!("Error: {}", e),
    }
}
