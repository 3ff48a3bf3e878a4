//! Storefront application shell.
//!
//! Storage backends, configuration, repository assembly and the use cases
//! built on the repository contracts from `storefront_core`.

pub mod config;
pub mod seed;
pub mod state;
pub mod storage;
pub mod usecases;
