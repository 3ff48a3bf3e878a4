//! Repository assembly.
//!
//! Builds the set of repository trait objects the use cases are constructed
//! with. The backend is chosen at runtime from [`Config`].

use std::sync::Arc;

use storefront_core::products::Product;
use storefront_core::storage::Repository;
use storefront_core::users::{User, UserToken};

use crate::config::{Config, StorageBackend};
use crate::storage::InMemoryRepository;

#[cfg(feature = "sqlite")]
use crate::storage::SqliteDatabase;

/// One repository per record type, all on the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn Repository<Product>>,
    pub users: Arc<dyn Repository<User>>,
    pub user_tokens: Arc<dyn Repository<UserToken>>,
}

impl Repositories {
    /// Repositories backed by process memory.
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryRepository::<Product>::new()),
            users: Arc::new(InMemoryRepository::<User>::new()),
            user_tokens: Arc::new(InMemoryRepository::<UserToken>::new()),
        }
    }

    /// Repositories backed by tables in `db`.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(db: &SqliteDatabase) -> Self {
        Self {
            products: Arc::new(db.products()),
            users: Arc::new(db.users()),
            user_tokens: Arc::new(db.user_tokens()),
        }
    }

    /// Assembles the repositories for the configured backend.
    pub async fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(backend = %config.storage_backend, "Assembling repositories");
        match config.storage_backend {
            StorageBackend::InMemory => Ok(Self::in_memory()),
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite => {
                let db = SqliteDatabase::open(&config.sqlite_path).await?;
                Ok(Self::sqlite(&db))
            }
            #[cfg(not(feature = "sqlite"))]
            StorageBackend::Sqlite => {
                anyhow::bail!("storefront was built without the 'sqlite' feature")
            }
        }
    }
}
