use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{RepositoryError, SearchSchema};

/// An entity instance owned by a repository.
///
/// The identifier is assigned once by [`Record::create`] and never changes.
/// `created_at` is immutable after creation; backends restore the stored
/// value when a caller tries to overwrite it through `update`.
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity name used in error messages and logs.
    const ENTITY_TYPE: &'static str;

    /// Name of the field looked up by `find_by_unique_field` and `conflicting_field`.
    const UNIQUE_FIELD: &'static str;

    /// Input fields accepted by [`Record::create`].
    type CreateProps: Send;

    /// Builds a new record with a fresh identifier and timestamps.
    fn create(props: Self::CreateProps) -> Self;

    fn id(&self) -> &str;

    /// Value of [`Record::UNIQUE_FIELD`] for this record.
    fn unique_value(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    fn set_created_at(&mut self, created_at: DateTime<Utc>);

    /// Rejects values no backend can store faithfully.
    ///
    /// Every backend calls this before `insert` and `update` write anything,
    /// and fails with [`RepositoryError::InvalidData`].
    fn validate(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    /// The filter field, sortable fields and default ordering for this entity.
    fn search_schema() -> SearchSchema<Self>;
}

/// Generates a new record identifier (UUID v4, hyphenated).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time, used for `created_at` and `updated_at`.
///
/// Backends keep full nanosecond precision, so any timestamp a caller sets
/// reads back unchanged.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now()
}
