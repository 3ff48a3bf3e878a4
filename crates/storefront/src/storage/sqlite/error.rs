//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError` from `storefront_core::storage`.
//! Specific errors are mapped to semantic variants (e.g., PRIMARY KEY constraint to AlreadyExists).

use storefront_core::storage::{Record, RepositoryError};

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `RepositoryError::AlreadyExists`
/// - No rows → `RepositoryError::NotFound` on the `id` field
/// - Undecodable column values → `RepositoryError::InvalidData`
/// - Connection errors → `RepositoryError::ConnectionFailed`
/// - All other errors → `RepositoryError::QueryFailed`
fn map_rusqlite_error<E: Record>(err: &rusqlite::Error, id: Option<&str>) -> RepositoryError {
    let id = id.unwrap_or("unknown");
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::AlreadyExists {
                entity_type: E::ENTITY_TYPE,
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => RepositoryError::id_not_found::<E>(id),

        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::InvalidColumnType(..) => RepositoryError::InvalidData(format!(
            "Cannot decode stored {}: {err}",
            E::ENTITY_TYPE
        )),

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// This is the main entry point for error mapping in async code.
/// It extracts the inner `rusqlite::Error` if present, otherwise
/// maps to a generic `QueryFailed` error.
pub fn map_tokio_rusqlite_error<E: Record>(err: tokio_rusqlite::Error) -> RepositoryError {
    map_error::<E>(err, None)
}

/// Maps a tokio_rusqlite error with a known ID to a RepositoryError.
///
/// Use this variant when the record ID is known at the call site.
pub fn map_tokio_rusqlite_error_with_id<E: Record>(
    err: tokio_rusqlite::Error,
    id: &str,
) -> RepositoryError {
    map_error::<E>(err, Some(id))
}

fn map_error<E: Record>(err: tokio_rusqlite::Error, id: Option<&str>) -> RepositoryError {
    let mapped = match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error::<E>(rusqlite_err, id)
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    };
    if !mapped.is_not_found() {
        tracing::warn!(entity = E::ENTITY_TYPE, error = %err, "SQLite operation failed");
    }
    mapped
}
