//! In-memory storage backend.
//!
//! Records live in a `Vec` in insertion order. Nothing is persisted.

mod repository;

pub use repository::InMemoryRepository;
