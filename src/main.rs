//! Binary entry point that glues the SQLite-backed inventory to the menu
//! loop: resolve the directory layout, bring up the database and its backup
//! manager, then hand control to the interactive menu until the user exits.
use livraria::{ui, BookStore, LibraryPaths, DEFAULT_RETENTION};

/// Initialize persistence and run the menu loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable home directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let paths = LibraryPaths::new()?;
    paths.ensure_directories()?;

    let store = BookStore::open(&paths, DEFAULT_RETENTION)?;
    ui::run_menu(&store, &paths)
}
