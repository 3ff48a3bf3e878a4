//! Pure core for storefront - no I/O, no async runtime, no side effects.
//!
//! This crate provides:
//! - The [`storage::Record`] trait and the generic [`storage::Repository`] contract
//! - The search pipeline (filter, sort, paginate) shared by every backend
//! - Entity models for products, users and user tokens
//!
//! Backends live in the `storefront` crate and only translate the
//! contract to their own storage primitives.

pub mod products;
pub mod serde;
pub mod storage;
pub mod users;
