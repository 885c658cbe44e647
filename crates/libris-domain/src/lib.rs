//! Libris Domain Layer
//!
//! This crate contains the catalog model and the lending rules for Libris.
//! It has no I/O of its own: the CLI (or any other front-end) owns a
//! [`Library`] instance and drives it through plain method calls.
//!
//! ## Key Concepts
//!
//! - **Book**: a catalog entry keyed by ISBN, with a stock quantity
//! - **Borrower**: a member keyed by membership ID, holding their loans
//! - **Loan**: an (ISBN, due date) pair recorded on the borrower only
//! - **Library**: the aggregate that owns both maps and runs every transaction
//! - **Clock**: where "now" comes from for due dates and overdue checks
//!
//! ## Example
//!
//! ```
//! use libris_domain::{Book, Borrower, BookField, Library};
//!
//! let mut library = Library::new();
//! library.add_book(Book::new("Dune", "Herbert", "111", "SciFi", 2));
//! library.add_borrower(Borrower::new("Alice", "a@x", "M1")).unwrap();
//!
//! library.borrow_book("M1", "111", 14).unwrap();
//! assert_eq!(library.book("111").unwrap().quantity(), 1);
//!
//! let hits = library.search_books(Some("DUNE"), BookField::Title);
//! assert_eq!(hits.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod borrower;
pub mod clock;
pub mod error;
pub mod library;

// Re-exports for convenience
pub use book::{Availability, Book, QuantityChange};
pub use borrower::{Borrower, Loan};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, LibraryError, Result};
pub use library::{BookAdded, BookField, BookUpdate, Library, OverdueLoan, DEFAULT_LOAN_DAYS};
