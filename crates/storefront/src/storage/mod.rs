//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `Repository`
//! contract defined in `storefront_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always compiled. It is used by the tests and can
//! be selected at runtime with `STORAGE_BACKEND=inmemory`.
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p storefront
//! ```
//!
//! Build with the in-memory backend only:
//! ```bash
//! cargo build -p storefront --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDatabase, SqliteRecord, SqliteRepository};
