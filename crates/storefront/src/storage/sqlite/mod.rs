//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the `Repository`
//! contract using `rusqlite` for synchronous operations and `tokio-rusqlite`
//! for async wrapping. One table per record type; see [`SqliteRecord`].

mod conversions;
mod error;
mod repository;
mod schema;

pub use conversions::SqliteRecord;
pub use repository::{SqliteDatabase, SqliteRepository};
