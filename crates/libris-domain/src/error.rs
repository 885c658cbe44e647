//! Error types for catalog and lending operations

use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Errors that can occur while operating on the library.
///
/// None of these are fatal: each describes a rejected request and leaves the
/// library exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// No book with this ISBN in the catalog
    #[error("Book not found.")]
    BookNotFound(String),

    /// Return of an ISBN the catalog does not hold
    #[error("Book not found in library records.")]
    NotInCatalog(String),

    /// No borrower with this membership ID
    #[error("Borrower not found.")]
    BorrowerNotFound(String),

    /// The borrower holds no loan for this ISBN
    #[error("Book not found in borrower's records.")]
    LoanNotFound(String),

    /// Membership ID already registered
    #[error("Borrower with this membership ID already exists.")]
    BorrowerExists(String),

    /// No copies left to lend
    #[error("Book is out of stock.")]
    OutOfStock {
        /// Title of the exhausted book
        title: String,
    },

    /// Quantity update below zero
    #[error("Quantity cannot be negative.")]
    NegativeQuantity(i64),

    /// Quantity that is not an integer (or does not fit the stock counter)
    #[error("Invalid quantity value.")]
    InvalidQuantity(String),

    /// Loan period that pushes the due date past the representable range
    #[error("Loan period of {0} days is too long.")]
    LoanPeriodTooLong(u32),

    /// Return attempted without a matching loan
    #[error("This borrower did not borrow that book.")]
    NotBorrowed {
        /// Borrower attempting the return
        membership_id: String,
        /// ISBN being returned
        isbn: String,
    },

    /// Borrower removal blocked by outstanding loans
    #[error("Borrower has borrowed books; cannot remove.")]
    HasActiveLoans {
        /// Borrower being removed
        membership_id: String,
        /// Number of outstanding loans
        count: usize,
    },
}

/// Coarse classification of [`LibraryError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A book, borrower or loan key is absent
    NotFound,
    /// A unique key is already taken
    AlreadyExists,
    /// Borrow attempted with zero stock
    OutOfStock,
    /// Quantity below zero
    NegativeQuantity,
    /// Quantity or loan period that could not be interpreted
    InvalidValue,
    /// Return without a matching loan
    NotBorrowed,
    /// Removal blocked by outstanding loans
    HasActiveLoans,
}

impl LibraryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::BookNotFound(_)
            | LibraryError::NotInCatalog(_)
            | LibraryError::BorrowerNotFound(_)
            | LibraryError::LoanNotFound(_) => ErrorKind::NotFound,
            LibraryError::BorrowerExists(_) => ErrorKind::AlreadyExists,
            LibraryError::OutOfStock { .. } => ErrorKind::OutOfStock,
            LibraryError::NegativeQuantity(_) => ErrorKind::NegativeQuantity,
            LibraryError::InvalidQuantity(_) | LibraryError::LoanPeriodTooLong(_) => {
                ErrorKind::InvalidValue
            }
            LibraryError::NotBorrowed { .. } => ErrorKind::NotBorrowed,
            LibraryError::HasActiveLoans { .. } => ErrorKind::HasActiveLoans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds() {
        assert_eq!(LibraryError::BookNotFound("1".into()).kind(), ErrorKind::NotFound);
        assert_eq!(LibraryError::BorrowerNotFound("M1".into()).kind(), ErrorKind::NotFound);
        assert_eq!(LibraryError::LoanNotFound("1".into()).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_messages() {
        let cases = [
            (LibraryError::BookNotFound("999".into()), "Book not found."),
            (LibraryError::NotInCatalog("999".into()), "Book not found in library records."),
            (LibraryError::BorrowerNotFound("M9".into()), "Borrower not found."),
            (LibraryError::LoanNotFound("111".into()), "Book not found in borrower's records."),
            (
                LibraryError::BorrowerExists("M1".into()),
                "Borrower with this membership ID already exists.",
            ),
            (LibraryError::OutOfStock { title: "Dune".into() }, "Book is out of stock."),
            (LibraryError::NegativeQuantity(-1), "Quantity cannot be negative."),
            (LibraryError::InvalidQuantity("two".into()), "Invalid quantity value."),
            (LibraryError::LoanPeriodTooLong(u32::MAX), "Loan period of 4294967295 days is too long."),
            (
                LibraryError::NotBorrowed {
                    membership_id: "M1".into(),
                    isbn: "111".into(),
                },
                "This borrower did not borrow that book.",
            ),
            (
                LibraryError::HasActiveLoans {
                    membership_id: "M1".into(),
                    count: 2,
                },
                "Borrower has borrowed books; cannot remove.",
            ),
        ];

        for (err, message) in cases {
            assert_eq!(err.to_string(), message, "{:?}", err);
        }
    }
}
