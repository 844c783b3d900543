//! Persistence module split across logical submodules.

mod books;
mod connection;

pub use books::BookStore;
pub use connection::open_database;
