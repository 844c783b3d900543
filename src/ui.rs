//! Menu-driven terminal front end. Everything here is presentation glue:
//! prompts re-ask until a validator accepts, store results are rendered as
//! tables or friendly messages, and expected failures (unknown id, bad CSV
//! rows) never crash the loop.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::{Input, Select};

use crate::csv_io::{self, ImportReport};
use crate::db::BookStore;
use crate::error::{BookField, StoreError};
use crate::models::Book;
use crate::paths::LibraryPaths;
use crate::validation::{parse_price, parse_year, validate_text};

const MENU_ITEMS: &[&str] = &[
    "Add a new book",
    "List all books",
    "Update a book's price",
    "Remove a book",
    "Search books by author",
    "Export inventory to CSV",
    "Import books from CSV",
    "Back up the database",
    "Generate HTML report",
    "Quit",
];

/// Drive the main menu until the user quits. Only unexpected failures (I/O,
/// database) escape as errors; everything else is reported inline.
pub fn run_menu(store: &BookStore, paths: &LibraryPaths) -> Result<()> {
    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Bookstore inventory")
            .items(MENU_ITEMS)
            .default(0)
            .interact()?;

        match choice {
            0 => add_book(store)?,
            1 => list_books(store)?,
            2 => update_price(store)?,
            3 => remove_book(store)?,
            4 => search_by_author(store)?,
            5 => export_csv(store, paths)?,
            6 => import_csv(store)?,
            7 => backup_now(store)?,
            8 => generate_report(store, paths)?,
            _ => {
                println!("Bye!");
                return Ok(());
            }
        }
    }
}

fn add_book(store: &BookStore) -> Result<()> {
    let title = prompt_text(BookField::Title, "Title")?;
    let author = prompt_text(BookField::Author, "Author")?;
    let year = prompt_year("Publication year")?;
    let price = prompt_price("Price (e.g. 39.90)")?;

    match store.add(&title, &author, year, price) {
        Ok(book) => println!("Added: {book} (id {})", book.id),
        Err(err @ StoreError::Duplicate { .. }) => println!("Not added: {err}"),
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

fn list_books(store: &BookStore) -> Result<()> {
    let books = store.list()?;
    if books.is_empty() {
        println!("The store is empty.");
    } else {
        print_books(&books);
    }
    Ok(())
}

fn update_price(store: &BookStore) -> Result<()> {
    let id = prompt_id("Book id")?;
    let price = prompt_price("New price")?;

    match store.update_price(id, price) {
        Ok(book) => println!("Updated: {book} now costs {:.2}", book.price),
        Err(err) if err.is_not_found() => println!("{err}"),
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

fn remove_book(store: &BookStore) -> Result<()> {
    let id = prompt_id("Book id")?;

    match store.remove(id) {
        Ok(()) => println!("Book removed."),
        Err(err) if err.is_not_found() => println!("{err}"),
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

fn search_by_author(store: &BookStore) -> Result<()> {
    let term = prompt_text(BookField::Author, "Author (search term)")?;
    let books = store.find_by_author(&term)?;
    if books.is_empty() {
        println!("No books found for that author.");
    } else {
        print_books(&books);
    }
    Ok(())
}

fn export_csv(store: &BookStore, paths: &LibraryPaths) -> Result<()> {
    let books = store.list()?;
    let target = paths.export_file();
    csv_io::export_books(&books, &target)?;
    println!("Exported {} book(s) to {}", books.len(), target.display());
    Ok(())
}

fn import_csv(store: &BookStore) -> Result<()> {
    let raw: String = Input::new()
        .with_prompt("Path to the CSV file")
        .interact_text()?;
    let path = PathBuf::from(raw.trim());

    match csv_io::import_books(store, &path) {
        Ok(report) => print_import_report(&report),
        // A bad document is the user's problem to fix, not a crash.
        Err(err @ (StoreError::Csv(_) | StoreError::MissingColumns(_))) => {
            println!("Import failed: {err}");
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

fn print_import_report(report: &ImportReport) {
    println!(
        "Import finished: {} imported, {} duplicate(s), {} skipped.",
        report.imported,
        report.duplicates,
        report.skipped.len()
    );
    for row in &report.skipped {
        let reasons: Vec<String> = row.errors.iter().map(|e| e.to_string()).collect();
        println!("  line {}: {}", row.line, reasons.join("; "));
    }
}

fn backup_now(store: &BookStore) -> Result<()> {
    match store.backup_now()? {
        Some(path) => println!("Backup created: {}", path.display()),
        None => println!("Nothing to back up yet."),
    }

    let snapshots = store.backups().list_snapshots()?;
    if !snapshots.is_empty() {
        println!("Recent backups:");
        for snapshot in &snapshots {
            if let Some(name) = snapshot.file_name() {
                println!("  - {}", name.to_string_lossy());
            }
        }
    }
    Ok(())
}

fn generate_report(store: &BookStore, paths: &LibraryPaths) -> Result<()> {
    let books = store.list()?;
    let summary = store.summary()?;
    let written = crate::report::generate_html_report(&books, &summary, &paths.report_file())?;
    println!("Report written to {}", written.display());
    Ok(())
}

/// Ask for a text field until it passes validation.
fn prompt_text(field: BookField, prompt: &str) -> Result<String> {
    loop {
        let raw: String = Input::new().with_prompt(prompt).interact_text()?;
        match validate_text(field, &raw) {
            Ok(value) => return Ok(value),
            Err(err) => println!("{err}"),
        }
    }
}

fn prompt_year(prompt: &str) -> Result<i32> {
    loop {
        let raw: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse_year(&raw) {
            Ok(year) => return Ok(year),
            Err(err) => println!("{err}"),
        }
    }
}

fn prompt_price(prompt: &str) -> Result<f64> {
    loop {
        let raw: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse_price(&raw) {
            Ok(price) => return Ok(price),
            Err(err) => println!("{err}"),
        }
    }
}

fn prompt_id(prompt: &str) -> Result<i64> {
    loop {
        let raw: String = Input::new().with_prompt(prompt).interact_text()?;
        match raw.trim().parse::<i64>() {
            Ok(id) => return Ok(id),
            Err(_) => println!("Please enter a whole number."),
        }
    }
}

fn print_books(books: &[Book]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(["ID", "Title", "Author", "Year", "Price"]);
    for book in books {
        table.add_row([
            book.id.to_string(),
            book.title.clone(),
            book.author.clone(),
            book.year.to_string(),
            format!("R$ {:.2}", book.price),
        ]);
    }
    println!("{table}");
}
