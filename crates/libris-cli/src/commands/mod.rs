//! Command implementations.
//!
//! Every command reads its fields through [`Fields`], calls the library, and
//! returns the text to show. Library rejections come back as
//! [`CliError::Library`](crate::error::CliError::Library).

pub mod books;
pub mod borrowers;
pub mod loans;

use crate::error::Result;
use crate::prompt::Fields;
use crate::session::Session;
use libris_domain::Clock;

/// A command the REPL, the menu and scripts can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Catalog a book (or more copies of one)
    AddBook,
    /// Change a book's details or stock
    UpdateBook,
    /// Drop a book from the catalog
    RemoveBook,
    /// Register a borrower
    AddBorrower,
    /// Change a borrower's contact details
    UpdateContact,
    /// Deregister a borrower
    RemoveBorrower,
    /// Lend a book
    Borrow,
    /// Take a book back
    Return,
    /// Search the catalog
    Search,
    /// List every book
    Books,
    /// List every borrower
    Borrowers,
    /// Show one borrower's loans
    Status,
    /// List overdue loans
    Overdue,
}

impl Action {
    /// All actions, in help order
    pub const ALL: [Action; 13] = [
        Action::AddBook,
        Action::UpdateBook,
        Action::RemoveBook,
        Action::AddBorrower,
        Action::UpdateContact,
        Action::RemoveBorrower,
        Action::Borrow,
        Action::Return,
        Action::Search,
        Action::Books,
        Action::Borrowers,
        Action::Status,
        Action::Overdue,
    ];

    /// Parse a command word
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "add-book" => Some(Action::AddBook),
            "update-book" => Some(Action::UpdateBook),
            "remove-book" => Some(Action::RemoveBook),
            "add-borrower" => Some(Action::AddBorrower),
            "update-contact" => Some(Action::UpdateContact),
            "remove-borrower" => Some(Action::RemoveBorrower),
            "borrow" => Some(Action::Borrow),
            "return" => Some(Action::Return),
            "search" | "find" => Some(Action::Search),
            "books" => Some(Action::Books),
            "borrowers" | "members" => Some(Action::Borrowers),
            "status" => Some(Action::Status),
            "overdue" => Some(Action::Overdue),
            _ => None,
        }
    }

    /// Command word
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddBook => "add-book",
            Action::UpdateBook => "update-book",
            Action::RemoveBook => "remove-book",
            Action::AddBorrower => "add-borrower",
            Action::UpdateContact => "update-contact",
            Action::RemoveBorrower => "remove-borrower",
            Action::Borrow => "borrow",
            Action::Return => "return",
            Action::Search => "search",
            Action::Books => "books",
            Action::Borrowers => "borrowers",
            Action::Status => "status",
            Action::Overdue => "overdue",
        }
    }

    /// Argument synopsis for help
    pub fn usage(&self) -> &'static str {
        match self {
            Action::AddBook => "[title|author|isbn|genre|qty]",
            Action::UpdateBook => "<isbn> [title|author|genre|qty]",
            Action::RemoveBook => "<isbn>",
            Action::AddBorrower => "[name|contact|id]",
            Action::UpdateContact => "<id> [contact]",
            Action::RemoveBorrower => "<id>",
            Action::Borrow => "<id> <isbn> [days]",
            Action::Return => "<id> <isbn>",
            Action::Search => "[field] [query]",
            Action::Books | Action::Borrowers | Action::Overdue => "",
            Action::Status => "<id>",
        }
    }

    /// One-line description for help
    pub fn summary(&self) -> &'static str {
        match self {
            Action::AddBook => "Add a book (merges copies into an existing ISBN)",
            Action::UpdateBook => "Update a book's details; blank fields are kept",
            Action::RemoveBook => "Remove a book from the catalog",
            Action::AddBorrower => "Register a borrower",
            Action::UpdateContact => "Change a borrower's contact details",
            Action::RemoveBorrower => "Remove a borrower with no loans",
            Action::Borrow => "Lend a book",
            Action::Return => "Return a book",
            Action::Search => "Search by title, author, genre or isbn",
            Action::Books => "List all books",
            Action::Borrowers => "List all borrowers",
            Action::Status => "List a borrower's loans",
            Action::Overdue => "List overdue loans",
        }
    }
}

/// Run `action` against the session.
pub fn execute<C: Clock>(action: Action, fields: &mut Fields<'_>, session: &mut Session<C>) -> Result<String> {
    match action {
        Action::AddBook => books::add_book(fields, session),
        Action::UpdateBook => books::update_book(fields, session),
        Action::RemoveBook => books::remove_book(fields, session),
        Action::Search => books::search(fields, session),
        Action::Books => books::list_books(session),
        Action::AddBorrower => borrowers::add_borrower(fields, session),
        Action::UpdateContact => borrowers::update_contact(fields, session),
        Action::RemoveBorrower => borrowers::remove_borrower(fields, session),
        Action::Borrowers => borrowers::list_borrowers(session),
        Action::Status => borrowers::status(fields, session),
        Action::Borrow => loans::borrow(fields, session),
        Action::Return => loans::return_book(fields, session),
        Action::Overdue => loans::overdue(session),
    }
}

/// Parse a count, falling back to `default` when blank or malformed.
///
/// Returns the value and, for malformed input, a note saying so.
fn count_or_default(raw: Option<String>, default: u32, what: &str) -> (u32, Option<String>) {
    match raw {
        None => (default, None),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => (value, None),
            Err(_) => (
                default,
                Some(format!("Invalid {} '{}'. Using {}.", what, raw, default)),
            ),
        },
    }
}
