use async_trait::async_trait;

use super::{Record, RepositoryError, Result, SearchParams, SearchResult};

/// Uniform repository contract for a record type.
///
/// Implementations differ only in where records live; for identical data
/// and parameters every implementation returns identical results, so use
/// cases can hold an `Arc<dyn Repository<E>>` without knowing the backend.
#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    /// Builds a new record with a fresh identifier and timestamps.
    /// Does not persist it.
    fn create(&self, props: E::CreateProps) -> E {
        E::create(props)
    }

    /// Stores an already constructed record and returns it.
    async fn insert(&self, record: E) -> Result<E>;

    /// Gets a record by its identifier.
    async fn find_by_id(&self, id: &str) -> Result<E>;

    /// Gets every record whose identifier is listed, in store order.
    /// Unknown identifiers are skipped.
    async fn find_all_by_ids(&self, ids: &[String]) -> Result<Vec<E>>;

    /// Replaces an existing record. The stored `created_at` is kept.
    async fn update(&self, record: E) -> Result<E>;

    /// Removes a record by its identifier.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Gets the record whose unique field equals `value` exactly.
    async fn find_by_unique_field(&self, value: &str) -> Result<E>;

    /// Fails with `Conflict` if a record already uses `value` in its unique field.
    async fn conflicting_field(&self, value: &str) -> Result<()> {
        match self.find_by_unique_field(value).await {
            Ok(_) => Err(RepositoryError::conflict::<E>(value)),
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Runs the filter, sort and paginate pipeline.
    async fn search(&self, params: SearchParams) -> Result<SearchResult<E>>;
}
