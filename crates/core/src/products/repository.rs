use async_trait::async_trait;

use crate::storage::{Repository, Result};

use super::Product;

/// Product-specific lookups on top of the generic repository contract.
///
/// Implemented for every `Repository<Product>`, including trait objects.
#[async_trait]
pub trait ProductsRepository: Repository<Product> {
    /// Gets the product with exactly this name.
    async fn find_by_name(&self, name: &str) -> Result<Product> {
        self.find_by_unique_field(name).await
    }

    /// Fails with `Conflict` if another product already uses this name.
    async fn conflicting_name(&self, name: &str) -> Result<()> {
        self.conflicting_field(name).await
    }
}

impl<T: Repository<Product> + ?Sized> ProductsRepository for T {}
