//! Opening the SQLite store and creating its schema lazily on first use.

use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreResult;

/// Ensure the database file exists, run lazy schema creation, and return a
/// live connection. The uniqueness index on (titulo, autor, ano_publicacao)
/// is what turns accidental re-inserts into a typed duplicate error instead
/// of silent copies.
pub fn open_database(db_path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS livros (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo TEXT NOT NULL,
            autor TEXT NOT NULL,
            ano_publicacao INTEGER NOT NULL,
            preco REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_livro_unique
         ON livros (titulo, autor, ano_publicacao)",
        [],
    )?;

    Ok(conn)
}
