//! Application use cases.
//!
//! Each use case is constructed with the repositories it needs and exposes a
//! single `execute` method.

use thiserror::Error;

use storefront_core::storage::{repository_error_to_status_code, RepositoryError};

pub mod products;
pub mod users;

pub use products::{
    CreateProduct, DeleteProduct, GetProduct, SearchProducts, UpdateProduct, UpdateProductInput,
};
pub use users::{CreateUser, SearchUsers, UpdateAvatar, UpdateAvatarInput};

/// Errors returned by use cases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    /// The input was rejected before reaching storage.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UseCaseError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            UseCaseError::InvalidInput(_) => 400,
            UseCaseError::Repository(err) => repository_error_to_status_code(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, UseCaseError>;

/// Fails with `InvalidInput` naming `field` when `value` is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UseCaseError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}
