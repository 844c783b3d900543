//! CRUD and search operations over the `livros` table. Every function here
//! encapsulates one query so the rest of the codebase can stay focused on
//! parsing and presentation.
//!
//! Mutation ordering is deliberate: validate first, then snapshot the store
//! file, then write. The snapshot is taken even when the write itself comes
//! back empty-handed (unknown id, duplicate row) — that is documented
//! behavior, pinned by tests, not an oversight.

use std::path::PathBuf;

use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::backup::BackupManager;
use crate::db::connection::open_database;
use crate::error::{BookField, StoreError, StoreResult};
use crate::models::{Book, LibrarySummary};
use crate::paths::LibraryPaths;
use crate::validation::{validate_price, validate_text, validate_year};

/// Owns the live connection and the backup manager guarding it.
pub struct BookStore {
    conn: Connection,
    backups: BackupManager,
}

impl BookStore {
    /// Open (or create) the store under the given layout, wiring up the
    /// backup manager with the requested retention count.
    pub fn open(paths: &LibraryPaths, retention: usize) -> StoreResult<Self> {
        let conn = open_database(&paths.db_path())?;
        let backups = BackupManager::new(paths, retention);
        Ok(Self { conn, backups })
    }

    /// Validate all four fields, snapshot the store, and insert. The fresh
    /// row is echoed back so callers need not re-query.
    pub fn add(&self, title: &str, author: &str, year: i32, price: f64) -> StoreResult<Book> {
        let title = validate_text(BookField::Title, title)?;
        let author = validate_text(BookField::Author, author)?;
        let year = validate_year(year)?;
        let price = validate_price(price)?;

        self.backups.snapshot_and_prune()?;

        self.conn
            .execute(
                "INSERT INTO livros (titulo, autor, ano_publicacao, preco)
                 VALUES (?1, ?2, ?3, ?4)",
                params![title, author, year, price],
            )
            .map_err(|err| map_duplicate(err, &title, &author, year))?;

        Ok(Book {
            id: self.conn.last_insert_rowid(),
            title,
            author,
            year,
            price,
        })
    }

    /// Retrieve every book ordered by id ascending. The query doubles as the
    /// single source of truth for how listings and exports are ordered.
    pub fn list(&self) -> StoreResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, titulo, autor, ano_publicacao, preco
             FROM livros ORDER BY id",
        )?;
        let books = stmt
            .query_map([], row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Validate the new price, snapshot the store, and update in place.
    /// Surfaces `NotFound` when zero rows were touched.
    pub fn update_price(&self, id: i64, new_price: f64) -> StoreResult<Book> {
        let price = validate_price(new_price)?;

        self.backups.snapshot_and_prune()?;

        let updated = self.conn.execute(
            "UPDATE livros SET preco = ?1 WHERE id = ?2",
            params![price, id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound { id });
        }

        self.fetch(id)
    }

    /// Snapshot the store and delete the row, surfacing `NotFound` when the
    /// id is absent. The snapshot taken by a failed attempt is retained.
    pub fn remove(&self, id: i64) -> StoreResult<()> {
        self.backups.snapshot_and_prune()?;

        let deleted = self
            .conn
            .execute("DELETE FROM livros WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    /// Case-insensitive substring match on the author column. An empty result
    /// is a normal outcome, not an error.
    pub fn find_by_author(&self, term: &str) -> StoreResult<Vec<Book>> {
        let like = format!("%{}%", term.trim());
        let mut stmt = self.conn.prepare(
            "SELECT id, titulo, autor, ano_publicacao, preco
             FROM livros WHERE autor LIKE ?1 ORDER BY id",
        )?;
        let books = stmt
            .query_map([like], row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Aggregate totals for the report layer. `COALESCE` keeps the empty
    /// store case at zero instead of NULL.
    pub fn summary(&self) -> StoreResult<LibrarySummary> {
        let summary = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(preco), 0.0), COALESCE(AVG(preco), 0.0)
             FROM livros",
            [],
            |row| {
                Ok(LibrarySummary {
                    total_books: row.get::<_, i64>(0)? as usize,
                    total_value: row.get(1)?,
                    average_price: row.get(2)?,
                })
            },
        )?;
        Ok(summary)
    }

    /// Manual backup trigger for the menu. Returns the new snapshot path, or
    /// `None` when the store file does not exist yet.
    pub fn backup_now(&self) -> StoreResult<Option<PathBuf>> {
        self.backups.snapshot_and_prune()
    }

    /// Read access to the backup manager for listing snapshots.
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    fn fetch(&self, id: i64) -> StoreResult<Book> {
        let mut stmt = self.conn.prepare(
            "SELECT id, titulo, autor, ano_publicacao, preco
             FROM livros WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map([id], row_to_book)?;
        match rows.next() {
            Some(book) => Ok(book?),
            None => Err(StoreError::NotFound { id }),
        }
    }
}

fn row_to_book(row: &rusqlite::Row<'_>) -> Result<Book, SqlError> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
        price: row.get(4)?,
    })
}

/// Coerce the uniqueness-index violation into a descriptive error. Anything
/// else passes through as a plain SQLite failure.
fn map_duplicate(err: SqlError, title: &str, author: &str, year: i32) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::Duplicate {
            title: title.to_string(),
            author: author.to_string(),
            year,
        }
    } else {
        StoreError::Sqlite(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use tempfile::TempDir;

    fn test_store() -> (BookStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(tmp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let store = BookStore::open(&paths, 5).unwrap();
        (store, tmp)
    }

    #[test]
    fn add_then_list_round_trips_the_fields() {
        let (store, _tmp) = test_store();

        let added = store
            .add("Dom Casmurro", "Machado de Assis", 1899, 49.9)
            .unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed, vec![added.clone()]);
        assert_eq!(listed[0].title, "Dom Casmurro");
        assert_eq!(listed[0].author, "Machado de Assis");
        assert_eq!(listed[0].year, 1899);
        assert_eq!(listed[0].price, 49.9);
        assert!(added.id > 0);
    }

    #[test]
    fn ids_are_unique_and_ascending() {
        let (store, _tmp) = test_store();

        let a = store.add("A", "X", 2000, 10.0).unwrap();
        let b = store.add("B", "Y", 2001, 20.0).unwrap();

        assert_ne!(a.id, b.id);
        let listed = store.list().unwrap();
        assert_eq!(listed[0].id, a.id);
        assert_eq!(listed[1].id, b.id);
    }

    #[test]
    fn invalid_fields_never_reach_the_table() {
        let (store, _tmp) = test_store();

        assert!(matches!(
            store.add("   ", "Author", 2000, 10.0),
            Err(StoreError::Validation(ValidationError::Blank(
                BookField::Title
            )))
        ));
        assert!(matches!(
            store.add("Title", "Author", 1200, 10.0),
            Err(StoreError::Validation(ValidationError::YearOutOfRange { .. }))
        ));
        assert!(matches!(
            store.add("Title", "Author", 2000, -1.0),
            Err(StoreError::Validation(ValidationError::PriceOutOfRange { .. }))
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn duplicate_triple_is_rejected_with_a_typed_error() {
        let (store, _tmp) = test_store();

        store.add("Dom Casmurro", "Machado de Assis", 1899, 49.9).unwrap();
        let err = store
            .add("Dom Casmurro", "Machado de Assis", 1899, 59.9)
            .unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { year: 1899, .. }));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn update_price_rewrites_the_row() {
        let (store, _tmp) = test_store();

        let book = store.add("Title", "Author", 2000, 10.0).unwrap();
        let updated = store.update_price(book.id, 25.5).unwrap();

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.price, 25.5);
        assert_eq!(store.list().unwrap()[0].price, 25.5);
    }

    #[test]
    fn update_price_on_missing_id_is_not_found() {
        let (store, _tmp) = test_store();
        assert!(store.update_price(999, 10.0).unwrap_err().is_not_found());
    }

    #[test]
    fn remove_deletes_the_row() {
        let (store, _tmp) = test_store();

        let book = store.add("Title", "Author", 2000, 10.0).unwrap();
        store.remove(book.id).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn remove_missing_id_still_takes_snapshot() {
        // Backup-first is unconditional: a failed remove leaves exactly one
        // new snapshot behind. Current behavior, kept on purpose.
        let (store, _tmp) = test_store();
        store.add("Title", "Author", 2000, 10.0).unwrap();
        let before = store.backups().list_snapshots().unwrap().len();

        assert!(store.remove(999).unwrap_err().is_not_found());

        let after = store.backups().list_snapshots().unwrap().len();
        assert_eq!(after, before + 1);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn seven_mutations_leave_five_snapshots() {
        let (store, _tmp) = test_store();

        for i in 0..6 {
            store
                .add(&format!("Title {i}"), "Author", 2000 + i, 10.0)
                .unwrap();
        }
        store.update_price(1, 11.0).unwrap();

        assert_eq!(store.backups().list_snapshots().unwrap().len(), 5);
    }

    #[test]
    fn find_by_author_matches_case_insensitive_substring() {
        let (store, _tmp) = test_store();

        store
            .add("Dom Casmurro", "Machado de Assis", 1899, 49.9)
            .unwrap();
        store.add("Vidas Secas", "Graciliano Ramos", 1938, 39.9).unwrap();

        let hits = store.find_by_author("assis").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].author, "Machado de Assis");

        assert!(store.find_by_author("tolkien").unwrap().is_empty());
    }

    #[test]
    fn summary_aggregates_count_total_and_average() {
        let (store, _tmp) = test_store();

        assert_eq!(store.summary().unwrap(), LibrarySummary::default());

        store.add("A", "X", 2000, 10.0).unwrap();
        store.add("B", "Y", 2001, 30.0).unwrap();

        let summary = store.summary().unwrap();
        assert_eq!(summary.total_books, 2);
        assert_eq!(summary.total_value, 40.0);
        assert_eq!(summary.average_price, 20.0);
    }

    #[test]
    fn manual_backup_returns_the_snapshot_path() {
        let (store, _tmp) = test_store();
        let path = store.backup_now().unwrap().expect("store file exists");
        assert!(path.exists());
    }
}
