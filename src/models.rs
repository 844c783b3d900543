//! Domain models that mirror the SQLite schema and get passed between the
//! store, the import/export pipeline, and the presentation layers. The intent
//! is that these types stay light-weight data holders so other layers can
//! focus on persistence and rendering logic.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
/// One row of the `livros` table.
pub struct Book {
    /// Primary key assigned by the database on insert. Immutable afterwards;
    /// update/remove flows bubble it back to the persistence layer.
    pub id: i64,
    /// Title as entered, already trimmed by validation.
    pub title: String,
    /// Author as entered, already trimmed by validation.
    pub author: String,
    /// Publication year. Kept as an integer so ordering and range checks are
    /// numeric.
    pub year: i32,
    /// Price in the local currency, rounded to two decimals before it ever
    /// reaches the store.
    pub price: f64,
}

impl fmt::Display for Book {
    /// Compose a `Title - Author (Year)` line used by search results and
    /// confirmation prompts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.title, self.author, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Aggregate snapshot of the whole inventory, computed by the store and
/// consumed by the report renderer.
pub struct LibrarySummary {
    /// Number of books currently on the shelf.
    pub total_books: usize,
    /// Sum of all prices.
    pub total_value: f64,
    /// Average price, `0.0` when the store is empty.
    pub average_price: f64,
}
