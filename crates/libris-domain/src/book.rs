//! Book module - catalog entries and their stock counts

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog entry.
///
/// The ISBN is fixed at construction; everything else can change. Stock is
/// an unsigned counter, so a book can never hold a negative quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
    genre: String,
    quantity: u32,
}

/// Live availability of a book, derived from its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// At least one copy on the shelf
    Available,
    /// No copies left
    OutOfStock,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "Available"),
            Availability::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// Outcome of a successful quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
    /// Quantity before the update
    pub old: u32,
    /// Quantity after the update
    pub new: u32,
}

impl fmt::Display for QuantityChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity updated from {} to {}", self.old, self.new)
    }
}

impl Book {
    /// Create a new book
    ///
    /// # Examples
    ///
    /// ```
    /// use libris_domain::Book;
    ///
    /// let book = Book::new("Dune", "Herbert", "111", "SciFi", 2);
    /// assert!(book.is_available());
    /// ```
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        genre: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            genre: genre.into(),
            quantity,
        }
    }

    /// Title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author
    pub fn author(&self) -> &str {
        &self.author
    }

    /// ISBN (catalog key)
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// Genre
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Copies currently on the shelf
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Set the quantity.
    ///
    /// # Errors
    /// - [`LibraryError::NegativeQuantity`] if `new_quantity < 0`
    /// - [`LibraryError::InvalidQuantity`] if it does not fit the stock counter
    pub fn update_quantity(&mut self, new_quantity: i64) -> Result<QuantityChange> {
        if new_quantity < 0 {
            return Err(LibraryError::NegativeQuantity(new_quantity));
        }
        let new = u32::try_from(new_quantity)
            .map_err(|_| LibraryError::InvalidQuantity(new_quantity.to_string()))?;

        let old = self.quantity;
        self.quantity = new;
        Ok(QuantityChange { old, new })
    }

    /// Parse `raw` as an integer and set the quantity.
    ///
    /// # Errors
    /// [`LibraryError::InvalidQuantity`] if `raw` is not an integer, plus
    /// everything [`Book::update_quantity`] rejects.
    pub fn update_quantity_str(&mut self, raw: &str) -> Result<QuantityChange> {
        let parsed: i64 = raw
            .trim()
            .parse()
            .map_err(|_| LibraryError::InvalidQuantity(raw.to_string()))?;
        self.update_quantity(parsed)
    }

    /// Whether at least one copy can be lent out
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Availability status for display
    pub fn availability(&self) -> Availability {
        if self.is_available() {
            Availability::Available
        } else {
            Availability::OutOfStock
        }
    }

    /// Take one copy off the shelf, returning the remaining quantity.
    ///
    /// # Errors
    /// [`LibraryError::OutOfStock`] when no copies are left.
    pub fn borrow_copy(&mut self) -> Result<u32> {
        if !self.is_available() {
            return Err(LibraryError::OutOfStock {
                title: self.title.clone(),
            });
        }
        self.quantity -= 1;
        Ok(self.quantity)
    }

    /// Put one copy back on the shelf, returning the new quantity.
    ///
    /// There is no ceiling: the book does not know how many copies the
    /// library owns, so an unmatched return still raises the count.
    pub fn return_copy(&mut self) -> u32 {
        self.quantity = self.quantity.saturating_add(1);
        self.quantity
    }

    /// Add `extra` copies (used when the same ISBN is cataloged again).
    pub(crate) fn add_copies(&mut self, extra: u32) -> u32 {
        self.quantity = self.quantity.saturating_add(extra);
        self.quantity
    }

    /// Overwrite the descriptive fields that are given and non-empty.
    pub fn update_details(&mut self, title: Option<&str>, author: Option<&str>, genre: Option<&str>) {
        if let Some(title) = title.filter(|s| !s.is_empty()) {
            self.title = title.to_string();
        }
        if let Some(author) = author.filter(|s| !s.is_empty()) {
            self.author = author.to_string();
        }
        if let Some(genre) = genre.filter(|s| !s.is_empty()) {
            self.genre = genre.to_string();
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} | ISBN: {} | {} | Qty: {} ({})",
            self.title,
            self.author,
            self.isbn,
            self.genre,
            self.quantity,
            self.availability()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune(quantity: u32) -> Book {
        Book::new("Dune", "Herbert", "111", "SciFi", quantity)
    }

    #[test]
    fn test_update_quantity() {
        let mut book = dune(2);
        let change = book.update_quantity(5).unwrap();
        assert_eq!(change, QuantityChange { old: 2, new: 5 });
        assert_eq!(change.to_string(), "Quantity updated from 2 to 5");
        assert_eq!(book.quantity(), 5);

        // Zero is a valid stock level
        book.update_quantity(0).unwrap();
        assert!(!book.is_available());
    }

    #[test]
    fn test_update_quantity_negative() {
        let mut book = dune(2);
        let result = book.update_quantity(-1);
        assert_eq!(result, Err(LibraryError::NegativeQuantity(-1)));
        assert_eq!(book.quantity(), 2);
    }

    #[test]
    fn test_update_quantity_overflow() {
        let mut book = dune(2);
        let result = book.update_quantity(i64::from(u32::MAX) + 1);
        assert!(matches!(result, Err(LibraryError::InvalidQuantity(_))));
        assert_eq!(book.quantity(), 2);
    }

    #[test]
    fn test_update_quantity_str() {
        let mut book = dune(2);
        assert_eq!(book.update_quantity_str(" 7 ").unwrap().new, 7);

        let result = book.update_quantity_str("seven");
        assert_eq!(result, Err(LibraryError::InvalidQuantity("seven".into())));

        let result = book.update_quantity_str("-3");
        assert_eq!(result, Err(LibraryError::NegativeQuantity(-3)));
        assert_eq!(book.quantity(), 7);
    }

    #[test]
    fn test_borrow_until_out_of_stock() {
        let mut book = dune(1);
        assert_eq!(book.borrow_copy().unwrap(), 0);

        let result = book.borrow_copy();
        assert!(matches!(result, Err(LibraryError::OutOfStock { ref title }) if title == "Dune"));
        assert_eq!(book.quantity(), 0);
    }

    #[test]
    fn test_return_copy_has_no_ceiling() {
        let mut book = dune(1);
        assert_eq!(book.return_copy(), 2);
        assert_eq!(book.return_copy(), 3);
    }

    #[test]
    fn test_update_details_skips_empty_fields() {
        let mut book = dune(1);
        book.update_details(Some("Dune Messiah"), Some(""), None);

        assert_eq!(book.title(), "Dune Messiah");
        assert_eq!(book.author(), "Herbert");
        assert_eq!(book.genre(), "SciFi");
        assert_eq!(book.isbn(), "111");
    }

    #[test]
    fn test_display_tracks_availability() {
        let mut book = dune(1);
        assert_eq!(
            book.to_string(),
            "Dune by Herbert | ISBN: 111 | SciFi | Qty: 1 (Available)"
        );

        book.borrow_copy().unwrap();
        assert!(book.to_string().ends_with("Qty: 0 (Out of Stock)"));
    }
}
