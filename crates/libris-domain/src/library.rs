//! Library aggregate - the catalog, the members, and every lending transaction
//!
//! The [`Library`] is the only owner of the book and borrower maps. Books and
//! borrowers mutate their own fields; the library decides which of them exist
//! and keeps the two sides of a loan in step.

use crate::book::{Book, QuantityChange};
use crate::borrower::{Borrower, Loan};
use crate::clock::{Clock, SystemClock};
use crate::error::{LibraryError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Loan period used when the caller has no preference
pub const DEFAULT_LOAN_DAYS: u32 = 14;

/// Book attribute used by [`Library::search_books`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookField {
    /// Substring match on the title
    #[default]
    Title,
    /// Substring match on the author
    Author,
    /// Substring match on the genre
    Genre,
    /// Exact match on the ISBN
    Isbn,
}

impl BookField {
    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::Isbn => "isbn",
        }
    }

    /// Parse a field name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "title" => Some(BookField::Title),
            "author" => Some(BookField::Author),
            "genre" => Some(BookField::Genre),
            "isbn" => Some(BookField::Isbn),
            _ => None,
        }
    }

    /// Whether `book` matches an already-lowercased query on this field
    fn matches(&self, book: &Book, query: &str) -> bool {
        match self {
            BookField::Title => book.title().to_lowercase().contains(query),
            BookField::Author => book.author().to_lowercase().contains(query),
            BookField::Genre => book.genre().to_lowercase().contains(query),
            BookField::Isbn => book.isbn().to_lowercase() == query,
        }
    }
}

impl FromStr for BookField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid search field: {}", s))
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field changes for [`Library::update_book_details`].
///
/// Empty strings count as "not given". The quantity is kept as raw text so
/// that unparsable input is reported by the book itself.
///
/// # Examples
///
/// ```
/// use libris_domain::BookUpdate;
///
/// let update = BookUpdate::default().title("Dune Messiah").quantity(3);
/// assert_eq!(update.quantity.as_deref(), Some("3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookUpdate {
    /// New title
    pub title: Option<String>,
    /// New author
    pub author: Option<String>,
    /// New genre
    pub genre: Option<String>,
    /// New quantity, unparsed
    pub quantity: Option<String>,
}

impl BookUpdate {
    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the genre
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Set the quantity from anything printable (`5`, `"5"`, `"five"`)
    pub fn quantity(mut self, quantity: impl ToString) -> Self {
        self.quantity = Some(quantity.to_string());
        self
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.genre.is_none() && self.quantity.is_none()
    }
}

/// Outcome of [`Library::add_book`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAdded {
    /// A new catalog entry was created
    Inserted,
    /// The ISBN was already cataloged; its stock grew to `quantity`
    Merged {
        /// Stock after the merge
        quantity: u32,
    },
}

impl fmt::Display for BookAdded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookAdded::Inserted => write!(f, "Book added"),
            BookAdded::Merged { quantity } => {
                write!(f, "Existing book found. Increased quantity to {}", quantity)
            }
        }
    }
}

/// One past-due loan, as reported by [`Library::list_overdue`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueLoan {
    /// Snapshot of the borrower holding the loan
    pub borrower: Borrower,
    /// ISBN on loan
    pub isbn: String,
    /// When it was due
    pub due_date: DateTime<Utc>,
    /// Whole days elapsed since the due date
    pub days_overdue: i64,
}

/// The library aggregate.
///
/// Books are keyed by ISBN and borrowers by membership ID. Both maps are
/// ordered by key, so every listing comes back in a stable order.
#[derive(Debug)]
pub struct Library<C: Clock = SystemClock> {
    books: BTreeMap<String, Book>,
    borrowers: BTreeMap<String, Borrower>,
    clock: C,
}

impl Library<SystemClock> {
    /// Create an empty library on wall-clock time
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Library<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Library<C> {
    /// Create an empty library reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            books: BTreeMap::new(),
            borrowers: BTreeMap::new(),
            clock,
        }
    }

    // ---- Books ----

    /// Catalog a book.
    ///
    /// If the ISBN is already present the new copies are added to the
    /// existing entry, whose title, author and genre are kept as they were.
    pub fn add_book(&mut self, book: Book) -> BookAdded {
        if let Some(existing) = self.books.get_mut(book.isbn()) {
            let quantity = existing.add_copies(book.quantity());
            info!("Merged {} copies into ISBN {} (now {})", book.quantity(), book.isbn(), quantity);
            return BookAdded::Merged { quantity };
        }

        info!("Cataloged ISBN {} ({})", book.isbn(), book.title());
        self.books.insert(book.isbn().to_string(), book);
        BookAdded::Inserted
    }

    /// Apply `update` to the book with this ISBN.
    ///
    /// Descriptive fields are applied first; if the quantity is then
    /// rejected the error is returned, but those fields stay changed.
    ///
    /// # Errors
    /// - [`LibraryError::BookNotFound`] if the ISBN is not cataloged
    /// - any error from [`Book::update_quantity_str`]
    pub fn update_book_details(&mut self, isbn: &str, update: BookUpdate) -> Result<Option<QuantityChange>> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;

        book.update_details(
            update.title.as_deref(),
            update.author.as_deref(),
            update.genre.as_deref(),
        );

        let change = match update.quantity.as_deref() {
            Some(raw) => Some(book.update_quantity_str(raw).inspect_err(|e| {
                warn!("Quantity update for ISBN {} rejected: {}", isbn, e);
            })?),
            None => None,
        };

        info!("Updated ISBN {}", isbn);
        Ok(change)
    }

    /// Remove a book from the catalog and return it.
    ///
    /// Outstanding loans for this ISBN are not checked and stay on their
    /// borrowers.
    ///
    /// # Errors
    /// [`LibraryError::BookNotFound`] if the ISBN is not cataloged.
    pub fn remove_book(&mut self, isbn: &str) -> Result<Book> {
        let book = self
            .books
            .remove(isbn)
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;
        info!("Removed ISBN {} from catalog", isbn);
        Ok(book)
    }

    /// Find books by `field`, ignoring case.
    ///
    /// An absent or empty query returns the whole catalog. ISBN queries must
    /// match exactly; the other fields match on substring.
    pub fn search_books(&self, query: Option<&str>, field: BookField) -> Vec<Book> {
        let query = match query {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return self.list_all_books(),
        };

        let hits: Vec<Book> = self
            .books
            .values()
            .filter(|book| field.matches(book, &query))
            .cloned()
            .collect();

        debug!("Search {}={:?} matched {} book(s)", field, query, hits.len());
        hits
    }

    /// Look up a book by ISBN
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Snapshot of every book, in ISBN order
    pub fn list_all_books(&self) -> Vec<Book> {
        self.books.values().cloned().collect()
    }

    /// Number of catalog entries
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    // ---- Borrowers ----

    /// Register a borrower.
    ///
    /// # Errors
    /// [`LibraryError::BorrowerExists`] if the membership ID is taken.
    pub fn add_borrower(&mut self, borrower: Borrower) -> Result<()> {
        let id = borrower.membership_id().to_string();
        if self.borrowers.contains_key(&id) {
            warn!("Rejected duplicate membership ID {}", id);
            return Err(LibraryError::BorrowerExists(id));
        }

        info!("Registered borrower {}", id);
        self.borrowers.insert(id, borrower);
        Ok(())
    }

    /// Replace a borrower's contact details.
    ///
    /// # Errors
    /// [`LibraryError::BorrowerNotFound`] if the membership ID is unknown.
    pub fn update_borrower_contact(&mut self, membership_id: &str, contact: &str) -> Result<()> {
        let borrower = self
            .borrowers
            .get_mut(membership_id)
            .ok_or_else(|| LibraryError::BorrowerNotFound(membership_id.to_string()))?;
        borrower.update_contact(contact);
        info!("Updated contact for borrower {}", membership_id);
        Ok(())
    }

    /// Remove a borrower and return them.
    ///
    /// # Errors
    /// - [`LibraryError::BorrowerNotFound`] if the membership ID is unknown
    /// - [`LibraryError::HasActiveLoans`] while they still hold any loan
    pub fn remove_borrower(&mut self, membership_id: &str) -> Result<Borrower> {
        let borrower = self
            .borrowers
            .get(membership_id)
            .ok_or_else(|| LibraryError::BorrowerNotFound(membership_id.to_string()))?;

        if borrower.has_active_loans() {
            warn!("Borrower {} still holds loans; not removed", membership_id);
            return Err(LibraryError::HasActiveLoans {
                membership_id: membership_id.to_string(),
                count: borrower.loans().len(),
            });
        }

        info!("Removed borrower {}", membership_id);
        self.borrowers
            .remove(membership_id)
            .ok_or_else(|| LibraryError::BorrowerNotFound(membership_id.to_string()))
    }

    /// Look up a borrower by membership ID
    pub fn borrower(&self, membership_id: &str) -> Option<&Borrower> {
        self.borrowers.get(membership_id)
    }

    /// Snapshot of every borrower, in membership ID order
    pub fn list_all_borrowers(&self) -> Vec<Borrower> {
        self.borrowers.values().cloned().collect()
    }

    /// Number of registered borrowers
    pub fn borrower_count(&self) -> usize {
        self.borrowers.len()
    }

    /// Copy of a borrower's current loans.
    ///
    /// # Errors
    /// [`LibraryError::BorrowerNotFound`] if the membership ID is unknown.
    pub fn borrower_status(&self, membership_id: &str) -> Result<Vec<Loan>> {
        self.borrowers
            .get(membership_id)
            .map(Borrower::list_borrowed)
            .ok_or_else(|| LibraryError::BorrowerNotFound(membership_id.to_string()))
    }

    // ---- Borrow / Return ----

    /// Lend one copy of `isbn` to a borrower for `borrow_days` days.
    ///
    /// On success the book's stock drops by one, the borrower gains a loan,
    /// and the due date is returned. On failure nothing changes.
    ///
    /// # Errors
    /// - [`LibraryError::BorrowerNotFound`] (checked first)
    /// - [`LibraryError::BookNotFound`]
    /// - [`LibraryError::OutOfStock`] if no copy is on the shelf
    /// - [`LibraryError::LoanPeriodTooLong`] if the due date is unrepresentable
    pub fn borrow_book(&mut self, membership_id: &str, isbn: &str, borrow_days: u32) -> Result<DateTime<Utc>> {
        let borrower = self
            .borrowers
            .get_mut(membership_id)
            .ok_or_else(|| LibraryError::BorrowerNotFound(membership_id.to_string()))?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;

        if !book.is_available() {
            warn!("Borrow of ISBN {} by {} refused: out of stock", isbn, membership_id);
            return Err(LibraryError::OutOfStock {
                title: book.title().to_string(),
            });
        }

        let due_date = Duration::try_days(i64::from(borrow_days))
            .and_then(|period| self.clock.now().checked_add_signed(period))
            .ok_or(LibraryError::LoanPeriodTooLong(borrow_days))?;

        let remaining = book.borrow_copy()?;
        borrower.add_borrowed(isbn, due_date);

        info!(
            "Lent ISBN {} to {} until {} ({} left)",
            isbn, membership_id, due_date, remaining
        );
        Ok(due_date)
    }

    /// Take back one copy of `isbn` from a borrower.
    ///
    /// The loan record is removed before the stock is raised, so a return
    /// that fails leaves the quantity untouched.
    ///
    /// # Errors
    /// - [`LibraryError::BorrowerNotFound`] (checked first)
    /// - [`LibraryError::NotInCatalog`] if the ISBN is no longer cataloged
    /// - [`LibraryError::NotBorrowed`] if the borrower holds no such loan
    pub fn return_book(&mut self, membership_id: &str, isbn: &str) -> Result<Loan> {
        let borrower = self
            .borrowers
            .get_mut(membership_id)
            .ok_or_else(|| LibraryError::BorrowerNotFound(membership_id.to_string()))?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::NotInCatalog(isbn.to_string()))?;

        let loan = borrower.remove_borrowed(isbn).map_err(|_| {
            warn!("Return of ISBN {} by {} refused: no such loan", isbn, membership_id);
            LibraryError::NotBorrowed {
                membership_id: membership_id.to_string(),
                isbn: isbn.to_string(),
            }
        })?;
        let quantity = book.return_copy();

        info!("ISBN {} returned by {} ({} on shelf)", isbn, membership_id, quantity);
        Ok(loan)
    }

    // ---- Overdue and status ----

    /// Every loan whose due date is strictly before now.
    ///
    /// Days overdue are whole days, rounded down, so a loan that slipped
    /// past its due date an hour ago is reported with 0.
    pub fn list_overdue(&self) -> Vec<OverdueLoan> {
        let now = self.clock.now();

        let overdue: Vec<OverdueLoan> = self
            .borrowers
            .values()
            .flat_map(|borrower| {
                borrower
                    .loans()
                    .iter()
                    .filter(move |loan| loan.is_overdue_at(now))
                    .map(move |loan| OverdueLoan {
                        borrower: borrower.clone(),
                        isbn: loan.isbn.clone(),
                        due_date: loan.due_date,
                        days_overdue: (now - loan.due_date).num_days(),
                    })
            })
            .collect();

        debug!("{} overdue loan(s) at {}", overdue.len(), now);
        overdue
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn library_with(quantity: u32) -> Library<ManualClock> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let mut library = Library::with_clock(clock);
        library.add_book(Book::new("Dune", "Herbert", "111", "SciFi", quantity));
        library.add_borrower(Borrower::new("Alice", "a@x", "M1")).unwrap();
        library
    }

    proptest! {
        /// Property: borrow followed by return restores the stock and clears the loan
        #[test]
        fn test_borrow_return_restores_state(quantity in 1u32..1000, days in 0u32..3650) {
            let mut library = library_with(quantity);

            library.borrow_book("M1", "111", days).unwrap();
            prop_assert_eq!(library.book("111").unwrap().quantity(), quantity - 1);

            library.return_book("M1", "111").unwrap();
            prop_assert_eq!(library.book("111").unwrap().quantity(), quantity);
            prop_assert!(library.borrower_status("M1").unwrap().is_empty());
        }

        /// Property: re-cataloging an ISBN sums the quantities
        #[test]
        fn test_merge_adds_quantities(first in 0u32..100_000, second in 0u32..100_000) {
            let mut library = library_with(first);
            let outcome = library.add_book(Book::new("Other", "Other", "111", "Other", second));

            prop_assert_eq!(outcome, BookAdded::Merged { quantity: first + second });
            prop_assert_eq!(library.book("111").unwrap().title(), "Dune");
        }

        /// Property: successful borrows never exceed the initial stock
        #[test]
        fn test_borrows_bounded_by_stock(quantity in 0u32..20, attempts in 0usize..40) {
            let mut library = library_with(quantity);
            let succeeded = (0..attempts)
                .filter(|_| library.borrow_book("M1", "111", 14).is_ok())
                .count();

            prop_assert_eq!(succeeded, attempts.min(quantity as usize));
            prop_assert_eq!(library.borrower_status("M1").unwrap().len(), succeeded);
        }
    }
}
