//! Directory layout for the application. All components receive a
//! [`LibraryPaths`] value instead of reaching for globals, so tests can point
//! an entire store at a temporary directory.

use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::{StoreError, StoreResult};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".livraria";
/// Environment variable overriding the base directory (handy for tests and
/// portable installs).
const BASE_DIR_ENV: &str = "LIVRARIA_DATA_DIR";
/// SQLite file name stored inside the `data/` directory.
const DB_FILE_NAME: &str = "livraria.db";
/// Fixed CSV export target inside the `exports/` directory.
const EXPORT_FILE_NAME: &str = "livros_exportados.csv";
/// Fixed HTML report target inside the `exports/` directory.
const REPORT_FILE_NAME: &str = "relatorio_livros.html";

/// Resolved filesystem layout: one base directory holding `data/`,
/// `backups/`, and `exports/`.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    base_dir: PathBuf,
}

impl LibraryPaths {
    /// Resolve the default layout: the `LIVRARIA_DATA_DIR` environment
    /// variable when set, otherwise a hidden folder in the user's home.
    pub fn new() -> StoreResult<Self> {
        if let Ok(custom) = std::env::var(BASE_DIR_ENV) {
            return Ok(Self {
                base_dir: PathBuf::from(custom),
            });
        }
        let base_dirs = BaseDirs::new().ok_or(StoreError::NoHomeDir)?;
        Ok(Self {
            base_dir: base_dirs.home_dir().join(DATA_DIR_NAME),
        })
    }

    /// Build a layout rooted at an explicit directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Absolute path of the live SQLite store.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join(DB_FILE_NAME)
    }

    /// Fixed target for CSV exports.
    pub fn export_file(&self) -> PathBuf {
        self.exports_dir().join(EXPORT_FILE_NAME)
    }

    /// Fixed target for the HTML report.
    pub fn report_file(&self) -> PathBuf {
        self.exports_dir().join(REPORT_FILE_NAME)
    }

    /// Create the `data/`, `backups/`, and `exports/` directories if absent.
    /// Called once on startup; individual operations assume the layout
    /// exists afterwards.
    pub fn ensure_directories(&self) -> StoreResult<()> {
        for dir in [self.data_dir(), self.backup_dir(), self.exports_dir()] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_hangs_off_the_base_dir() {
        let tmp = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(tmp.path().to_path_buf());

        assert_eq!(paths.base_dir(), tmp.path());
        assert_eq!(paths.db_path(), tmp.path().join("data").join("livraria.db"));
        assert_eq!(
            paths.export_file(),
            tmp.path().join("exports").join("livros_exportados.csv")
        );
        assert_eq!(
            paths.report_file(),
            tmp.path().join("exports").join("relatorio_livros.html")
        );
    }

    #[test]
    fn ensure_directories_creates_the_tree() {
        let tmp = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(tmp.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().is_dir());
        assert!(paths.backup_dir().is_dir());
        assert!(paths.exports_dir().is_dir());
    }
}
