//! CSV interchange for the book inventory.
//!
//! Export writes the fixed `titulo,autor,ano_publicacao,preco` header and one
//! row per book, never emitting ids. Import resolves columns by header name
//! (reordered and extra columns are fine, a handful of English aliases are
//! accepted), validates every field of every row, and reports per-line
//! failures instead of aborting: only a problem with the document itself is
//! fatal.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::db::BookStore;
use crate::error::{BookField, StoreError, StoreResult, ValidationError};
use crate::models::Book;
use crate::validation::{parse_price, parse_year, validate_text};

/// Canonical header, in export order.
pub const CSV_HEADER: [&str; 4] = ["titulo", "autor", "ano_publicacao", "preco"];

/// Accepted header spellings per column, canonical name first.
const TITLE_ALIASES: &[&str] = &["titulo", "title"];
const AUTHOR_ALIASES: &[&str] = &["autor", "author"];
const YEAR_ALIASES: &[&str] = &["ano_publicacao", "ano", "year"];
const PRICE_ALIASES: &[&str] = &["preco", "price"];

/// One row the importer refused, with every field failure it found.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source document; the header is line 1.
    pub line: usize,
    pub errors: Vec<ValidationError>,
}

/// Outcome of a bulk import. The run always completes; this is the full
/// accounting of what happened to each row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Rows validated and persisted.
    pub imported: usize,
    /// Rows that matched a (title, author, year) triple already stored.
    pub duplicates: usize,
    /// Rows refused for field-level reasons.
    pub skipped: Vec<SkippedRow>,
}

/// Serialize the record set to `path`. Prices are written with two decimals
/// so a round-trip re-imports the same values.
pub fn export_books(books: &[Book], path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for book in books {
        writer.write_record([
            book.title.clone(),
            book.author.clone(),
            book.year.to_string(),
            format!("{:.2}", book.price),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read `path` and feed every valid row through [`BookStore::add`].
///
/// Row-level failures (blank fields, unparsable numbers, short rows,
/// duplicates) are recorded and the run continues. Failures reading the
/// document itself, or a database/backup failure while persisting, abort.
pub fn import_books(store: &BookStore, path: &Path) -> StoreResult<ImportReport> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let columns = resolve_columns(reader.headers()?)?;
    let mut report = ImportReport::default();

    for (index, record) in reader.records().enumerate() {
        // Header is line 1, so the first data record is line 2.
        let line = index + 2;
        let record = record?;

        match parse_row(&columns, &record) {
            Ok((title, author, year, price)) => {
                match store.add(&title, &author, year, price) {
                    Ok(_) => report.imported += 1,
                    Err(StoreError::Duplicate { .. }) => report.duplicates += 1,
                    Err(StoreError::Validation(err)) => {
                        report.skipped.push(SkippedRow {
                            line,
                            errors: vec![err],
                        });
                    }
                    Err(fatal) => return Err(fatal),
                }
            }
            Err(errors) => report.skipped.push(SkippedRow { line, errors }),
        }
    }

    Ok(report)
}

/// Positions of the four required columns in the source header.
struct ColumnIndexes {
    title: usize,
    author: usize,
    year: usize,
    price: usize,
}

/// Match required columns by name, case-insensitively. An `id` column (or any
/// other extra) is simply never looked at.
fn resolve_columns(headers: &StringRecord) -> StoreResult<ColumnIndexes> {
    let find = |aliases: &[&str]| {
        headers
            .iter()
            .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
    };

    let mut missing = Vec::new();
    let mut require = |aliases: &[&str], name: &'static str| match find(aliases) {
        Some(index) => Some(index),
        None => {
            missing.push(name);
            None
        }
    };

    let title = require(TITLE_ALIASES, CSV_HEADER[0]);
    let author = require(AUTHOR_ALIASES, CSV_HEADER[1]);
    let year = require(YEAR_ALIASES, CSV_HEADER[2]);
    let price = require(PRICE_ALIASES, CSV_HEADER[3]);

    if let (Some(title), Some(author), Some(year), Some(price)) = (title, author, year, price) {
        Ok(ColumnIndexes {
            title,
            author,
            year,
            price,
        })
    } else {
        Err(StoreError::MissingColumns(missing.join(", ")))
    }
}

/// Extract and validate one row, collecting every field failure so the
/// report can name all of them, not just the first.
fn parse_row(
    columns: &ColumnIndexes,
    record: &StringRecord,
) -> Result<(String, String, i32, f64), Vec<ValidationError>> {
    // A short row leaves some cells absent; an empty string fails the same
    // blank-field check a present-but-empty cell would.
    let cell = |index: usize| record.get(index).unwrap_or("");

    let mut errors = Vec::new();

    let title = validate_text(BookField::Title, cell(columns.title))
        .map_err(|e| errors.push(e))
        .ok();
    let author = validate_text(BookField::Author, cell(columns.author))
        .map_err(|e| errors.push(e))
        .ok();
    let year = parse_year(cell(columns.year))
        .map_err(|e| errors.push(e))
        .ok();
    let price = parse_price(cell(columns.price))
        .map_err(|e| errors.push(e))
        .ok();

    match (title, author, year, price) {
        (Some(t), Some(a), Some(y), Some(p)) => Ok((t, a, y, p)),
        _ => Err(errors),
    }
}
