use thiserror::Error;

use super::Record;

/// Errors that can occur during repository operations.
///
/// The repository contract itself only raises `NotFound` (from identifier
/// and unique-field lookups) and `Conflict` (from `conflicting_field`).
/// The remaining variants originate at the persistence boundary:
/// `InvalidData` covers both a record rejected by [`Record::validate`] and a
/// stored row that cannot be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found using {field}: {value}")]
    NotFound {
        entity_type: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{entity_type} {field} '{value}' already used by another record")]
    Conflict {
        entity_type: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// A lookup of `E` by identifier found nothing.
    pub fn id_not_found<E: Record>(id: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity_type: E::ENTITY_TYPE,
            field: "id",
            value: id.into(),
        }
    }

    /// A lookup of `E` by its unique field found nothing.
    pub fn unique_not_found<E: Record>(value: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity_type: E::ENTITY_TYPE,
            field: E::UNIQUE_FIELD,
            value: value.into(),
        }
    }

    /// The unique field value of `E` is already taken.
    pub fn conflict<E: Record>(value: impl Into<String>) -> Self {
        RepositoryError::Conflict {
            entity_type: E::ENTITY_TYPE,
            field: E::UNIQUE_FIELD,
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict { .. })
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
