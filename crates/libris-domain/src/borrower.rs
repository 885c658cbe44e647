//! Borrower module - members and the loans they hold

use crate::error::{LibraryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single loan: which ISBN, and when it is due back.
///
/// Loans live only on the borrower. The book side tracks nothing but its
/// quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// ISBN of the borrowed book
    pub isbn: String,

    /// When the copy is due back
    pub due_date: DateTime<Utc>,
}

impl Loan {
    /// Create a new loan record
    pub fn new(isbn: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            isbn: isbn.into(),
            due_date,
        }
    }

    /// Whether the loan is past due at `now` (strictly)
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

/// A library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    name: String,
    contact: String,
    membership_id: String,
    borrowed_books: Vec<Loan>,
}

impl Borrower {
    /// Create a new borrower with no loans
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        membership_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            membership_id: membership_id.into(),
            borrowed_books: Vec::new(),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact details
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Membership ID (borrower key)
    pub fn membership_id(&self) -> &str {
        &self.membership_id
    }

    /// Current loans, oldest first
    pub fn loans(&self) -> &[Loan] {
        &self.borrowed_books
    }

    /// Whether any loan is outstanding
    pub fn has_active_loans(&self) -> bool {
        !self.borrowed_books.is_empty()
    }

    /// Replace the contact details
    pub fn update_contact(&mut self, contact: impl Into<String>) {
        self.contact = contact.into();
    }

    /// Record a loan.
    ///
    /// An existing loan for the same ISBN is not consolidated; the borrower
    /// simply holds two records.
    pub fn add_borrowed(&mut self, isbn: impl Into<String>, due_date: DateTime<Utc>) {
        self.borrowed_books.push(Loan::new(isbn, due_date));
    }

    /// Remove the first loan for `isbn` and return it.
    ///
    /// # Errors
    /// [`LibraryError::LoanNotFound`] if the borrower holds no such loan.
    pub fn remove_borrowed(&mut self, isbn: &str) -> Result<Loan> {
        let idx = self
            .borrowed_books
            .iter()
            .position(|loan| loan.isbn == isbn)
            .ok_or_else(|| LibraryError::LoanNotFound(isbn.to_string()))?;
        Ok(self.borrowed_books.remove(idx))
    }

    /// Independent copy of the current loans
    pub fn list_borrowed(&self) -> Vec<Loan> {
        self.borrowed_books.clone()
    }
}

impl fmt::Display for Borrower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ID: {}, Contact: {})",
            self.name, self.membership_id, self.contact
        )
    }
}
