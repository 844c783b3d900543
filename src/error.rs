//! Typed errors shared by the persistence, validation, and import layers.
//!
//! Validation failures carry the offending field so the CSV importer can
//! report per-row, per-field problems instead of aborting the whole run.

use std::fmt;

use thiserror::Error;

use crate::validation::{MAX_PRICE, MAX_TEXT_LEN, MIN_PRICE};

/// The four user-supplied columns of a book record. Used to tag validation
/// failures with the field they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Year,
    Price,
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Year => "publication year",
            BookField::Price => "price",
        };
        write!(f, "{name}")
    }
}

/// A single field failing its constraint. Every variant knows which field it
/// describes so import reports can name the column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(BookField),

    #[error("{0} must be at most {MAX_TEXT_LEN} characters")]
    TooLong(BookField),

    #[error("{0} must contain at least one letter or digit")]
    NoContent(BookField),

    #[error("{field} is not a valid number: {raw:?}")]
    NotANumber { field: BookField, raw: String },

    #[error("publication year must be between {min} and {max}, got {value}")]
    YearOutOfRange { value: i32, min: i32, max: i32 },

    #[error("price must be between {MIN_PRICE:.2} and {MAX_PRICE:.2}, got {value}")]
    PriceOutOfRange { value: f64 },
}

impl ValidationError {
    /// The field this failure belongs to.
    pub fn field(&self) -> BookField {
        match self {
            ValidationError::Blank(field)
            | ValidationError::TooLong(field)
            | ValidationError::NoContent(field)
            | ValidationError::NotANumber { field, .. } => *field,
            ValidationError::YearOutOfRange { .. } => BookField::Year,
            ValidationError::PriceOutOfRange { .. } => BookField::Price,
        }
    }
}

/// The main error type for store, backup, and import/export operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field failed validation; no write happened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation targeted an id that is not in the store.
    #[error("no book with id {id}")]
    NotFound { id: i64 },

    /// The (title, author, year) triple is already on the shelf.
    #[error("\"{title}\" by {author} ({year}) is already in the store")]
    Duplicate {
        title: String,
        author: String,
        year: i32,
    },

    /// Filesystem failure on backup, export, or report output.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite failure outside the mapped constraint cases.
    #[error("database failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// CSV reader/writer failure on the document itself.
    #[error("CSV failure: {0}")]
    Csv(#[from] csv::Error),

    /// The import source lacks one or more required header columns.
    #[error("CSV header is missing required columns: {0}")]
    MissingColumns(String),

    /// The default data directory could not be resolved.
    #[error("could not locate the user home directory")]
    NoHomeDir,
}

impl StoreError {
    /// Check whether this is a "not found" failure, so callers can show a
    /// friendly message instead of treating it as fatal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result alias used across the crate's core modules.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_know_their_field() {
        assert_eq!(
            ValidationError::Blank(BookField::Title).field(),
            BookField::Title
        );
        assert_eq!(
            ValidationError::YearOutOfRange {
                value: 99,
                min: 1400,
                max: 2027
            }
            .field(),
            BookField::Year
        );
        assert_eq!(
            ValidationError::PriceOutOfRange { value: -1.0 }.field(),
            BookField::Price
        );
    }

    #[test]
    fn not_found_display_names_the_id() {
        let err = StoreError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "no book with id 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn duplicate_display_names_the_book() {
        let err = StoreError::Duplicate {
            title: "Dom Casmurro".into(),
            author: "Machado de Assis".into(),
            year: 1899,
        };
        assert!(err.to_string().contains("Dom Casmurro"));
        assert!(!err.is_not_found());
    }
}
