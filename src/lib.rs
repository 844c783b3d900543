//! Core library surface for the bookstore inventory manager.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the SQLite-backed record store, the backup manager guarding it,
//! the validators shared by every input path, and the CSV/report layers.
pub mod backup;
pub mod csv_io;
pub mod db;
pub mod error;
pub mod models;
pub mod paths;
pub mod report;
pub mod ui;
pub mod validation;

/// The persistence layer entry points used by `main.rs`.
pub use db::BookStore;

/// The directory context object every component is constructed with.
pub use paths::LibraryPaths;

/// Backup plumbing, re-exported for callers that want to trigger or inspect
/// snapshots without going through the store.
pub use backup::{BackupManager, DEFAULT_RETENTION};

/// The two primary domain types that other layers manipulate.
pub use models::{Book, LibrarySummary};

/// The typed failure surface of the core.
pub use error::{StoreError, StoreResult, ValidationError};
