//! HTTP status codes for repository failures.

use super::RepositoryError;

/// Status code an HTTP layer should answer with for `error`.
///
/// Missing records are 404 and unique-field or identifier collisions are 409.
/// Storage that cannot be reached is 503. Any other storage failure is 500.
///
/// ```
/// use storefront_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::Conflict {
///     entity_type: "Product",
///     field: "name",
///     value: "Keyboard".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 409);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Conflict { .. } | RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) | RepositoryError::InvalidData(_) => 500,
    }
}
