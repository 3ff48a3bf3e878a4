//! In-memory repository implementation.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use storefront_core::storage::{
    Record, Repository, RepositoryError, Result, SearchParams, SearchResult, SearchSchema,
};

/// In-memory storage backend for one record type.
///
/// Records are kept in insertion order in a `Vec` wrapped in `Arc<RwLock<_>>`.
/// The lock is never held across an `.await`, so operations complete without
/// suspending. Clones share the same storage.
pub struct InMemoryRepository<E: Record> {
    records: Arc<RwLock<Vec<E>>>,
    schema: Arc<SearchSchema<E>>,
}

impl<E: Record> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl<E: Record> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Record> InMemoryRepository<E> {
    /// Creates an empty repository searched through the record's own schema.
    pub fn new() -> Self {
        Self::with_schema(E::search_schema())
    }

    /// Creates an empty repository searched through `schema`.
    pub fn with_schema(schema: SearchSchema<E>) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            schema: Arc::new(schema),
        }
    }

    /// Seeds the repository with `records`, kept in the given order.
    pub fn with_records(self, records: Vec<E>) -> Self {
        *self.records.write() = records;
        self
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copies of every stored record, in store order.
    pub fn snapshot(&self) -> Vec<E> {
        self.records.read().clone()
    }
}

#[async_trait]
impl<E: Record> Repository<E> for InMemoryRepository<E> {
    async fn insert(&self, record: E) -> Result<E> {
        record.validate()?;
        let mut records = self.records.write();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: E::ENTITY_TYPE,
                id: record.id().to_string(),
            });
        }
        records.push(record.clone());
        tracing::debug!(entity = E::ENTITY_TYPE, id = %record.id(), "Record inserted");
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<E> {
        let records = self.records.read();
        records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::id_not_found::<E>(id))
    }

    async fn find_all_by_ids(&self, ids: &[String]) -> Result<Vec<E>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| wanted.contains(r.id()))
            .cloned()
            .collect())
    }

    async fn update(&self, mut record: E) -> Result<E> {
        record.validate()?;
        let mut records = self.records.write();
        let Some(stored) = records.iter_mut().find(|r| r.id() == record.id()) else {
            tracing::warn!(entity = E::ENTITY_TYPE, id = %record.id(), "Update of unknown record");
            return Err(RepositoryError::id_not_found::<E>(record.id()));
        };
        record.set_created_at(stored.created_at());
        *stored = record.clone();
        tracing::debug!(entity = E::ENTITY_TYPE, id = %record.id(), "Record updated");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write();
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            tracing::warn!(entity = E::ENTITY_TYPE, id = %id, "Delete of unknown record");
            return Err(RepositoryError::id_not_found::<E>(id));
        };
        records.remove(index);
        tracing::debug!(entity = E::ENTITY_TYPE, id = %id, "Record deleted");
        Ok(())
    }

    async fn find_by_unique_field(&self, value: &str) -> Result<E> {
        let records = self.records.read();
        records
            .iter()
            .find(|r| r.unique_value() == value)
            .cloned()
            .ok_or_else(|| RepositoryError::unique_not_found::<E>(value))
    }

    async fn search(&self, params: SearchParams) -> Result<SearchResult<E>> {
        let snapshot = self.snapshot();
        let result = self.schema.search(snapshot, &params);
        tracing::trace!(
            entity = E::ENTITY_TYPE,
            total = result.total,
            page = result.current_page,
            "Search completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use storefront_core::products::{CreateProductProps, Product, ProductsRepository};
    use storefront_core::storage::{timestamp_now, SortDirection};
    use storefront_core::users::{User, UserToken, UserTokensRepository, UsersRepository};

    use super::*;

    fn named(names: &[&str]) -> Vec<Product> {
        names.iter().map(|n| Product::new(*n, 1.0, 1)).collect()
    }

    fn names(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.name.as_str()).collect()
    }

    fn product_name(product: &Product) -> &str {
        &product.name
    }

    fn compare_name(a: &Product, b: &Product) -> std::cmp::Ordering {
        a.name.cmp(&b.name)
    }

    /// Products searched in store order, without a default sort.
    fn unsorted_repo(items: Vec<Product>) -> InMemoryRepository<Product> {
        let schema = SearchSchema::new("name", product_name).sortable("name", compare_name);
        InMemoryRepository::with_schema(schema).with_records(items)
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let repo = InMemoryRepository::<Product>::new();
        let product = repo.create(CreateProductProps {
            name: "Keyboard".to_string(),
            price: 49.9,
            quantity: 3,
        });

        let inserted = repo.insert(product.clone()).await.unwrap();
        let found = repo.find_by_id(&product.id).await.unwrap();

        assert_eq!(inserted, product);
        assert_eq!(found, product);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_create_does_not_store() {
        let repo = InMemoryRepository::<Product>::new();

        let _ = repo.create(CreateProductProps {
            name: "Mouse".to_string(),
            price: 10.0,
            quantity: 1,
        });

        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let repo = InMemoryRepository::<Product>::new();
        let product = Product::new("Mouse", 10.0, 1);
        repo.insert(product.clone()).await.unwrap();

        let result = repo.insert(product).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Product",
                ..
            })
        ));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_does_not_enforce_unique_field() {
        let repo = InMemoryRepository::<Product>::new();

        repo.insert(Product::new("Mouse", 10.0, 1)).await.unwrap();
        repo.insert(Product::new("Mouse", 12.0, 2)).await.unwrap();

        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = InMemoryRepository::<Product>::new();

        let result = repo.find_by_id("fake-id").await;

        match result {
            Err(RepositoryError::NotFound {
                entity_type,
                field,
                value,
            }) => {
                assert_eq!(entity_type, "Product");
                assert_eq!(field, "id");
                assert_eq!(value, "fake-id");
            }
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_created_at() {
        let created = timestamp_now() - Duration::days(1);
        let product = Product::new("Mouse", 10.0, 1).with_created_at(created);
        let repo = InMemoryRepository::new().with_records(vec![product.clone()]);

        let mut changed = product.clone();
        changed.price = 15.0;
        changed.created_at = timestamp_now();
        changed.touch();
        let updated = repo.update(changed.clone()).await.unwrap();

        assert_eq!(updated.price, 15.0);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, changed.updated_at);
        assert_eq!(repo.find_by_id(&product.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_keeps_store_position() {
        let items = named(&["a", "b", "c"]);
        let repo = unsorted_repo(items.clone());

        let mut b = items[1].clone();
        b.name = "z".to_string();
        repo.update(b).await.unwrap();

        assert_eq!(names(&repo.snapshot()), vec!["a", "z", "c"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let repo = InMemoryRepository::new().with_records(named(&["a"]));

        let result = repo.update(Product::new("ghost", 1.0, 1)).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert_eq!(names(&repo.snapshot()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let items = named(&["a", "b"]);
        let repo = InMemoryRepository::new().with_records(items.clone());

        repo.delete(&items[0].id).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert!(repo.find_by_id(&items[0].id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_store_unchanged() {
        let repo = InMemoryRepository::new().with_records(named(&["a", "b", "c"]));

        let result = repo.delete("fake-id").await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn test_find_all_by_ids_keeps_store_order_and_skips_unknown() {
        let items = named(&["a", "b", "c"]);
        let repo = InMemoryRepository::new().with_records(items.clone());

        let found = repo
            .find_all_by_ids(&[
                items[2].id.clone(),
                "fake-id".to_string(),
                items[0].id.clone(),
            ])
            .await
            .unwrap();

        assert_eq!(names(&found), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_find_by_unique_field_is_exact() {
        let repo = InMemoryRepository::new().with_records(named(&["Mouse"]));

        assert_eq!(repo.find_by_name("Mouse").await.unwrap().name, "Mouse");

        let result = repo.find_by_name("mouse").await;
        match result {
            Err(RepositoryError::NotFound { field, value, .. }) => {
                assert_eq!(field, "name");
                assert_eq!(value, "mouse");
            }
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_conflicting_name() {
        let repo = InMemoryRepository::new().with_records(named(&["Mouse"]));

        assert!(repo.conflicting_name("Keyboard").await.is_ok());
        assert!(matches!(
            repo.conflicting_name("Mouse").await,
            Err(RepositoryError::Conflict {
                entity_type: "Product",
                field: "name",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_conflicting_email() {
        let repo = InMemoryRepository::new()
            .with_records(vec![User::new("Ada", "ada@example.com", "hash")]);

        assert!(repo.conflicting_email("grace@example.com").await.is_ok());
        assert!(repo
            .conflicting_email("ada@example.com")
            .await
            .unwrap_err()
            .is_conflict());
    }

    #[tokio::test]
    async fn test_generate_token_for_existing_user() {
        let user = User::new("Ada", "ada@example.com", "hash");
        let users = InMemoryRepository::new().with_records(vec![user.clone()]);
        let tokens = InMemoryRepository::<UserToken>::new();

        let token = tokens.generate(&users, &user.id).await.unwrap();

        assert_eq!(token.user_id, user.id);
        assert_eq!(tokens.find_by_token(&token.token).await.unwrap(), token);
    }

    #[tokio::test]
    async fn test_generate_token_for_unknown_user_fails() {
        let users = InMemoryRepository::<User>::new();
        let tokens = InMemoryRepository::<UserToken>::new();

        let result = tokens.generate(&users, "fake-id").await;

        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "User",
                ..
            })
        ));
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn test_search_default_page_size() {
        let items: Vec<_> = (0..16).map(|i| Product::new(format!("p{i}"), 1.0, 1)).collect();
        let repo = InMemoryRepository::new().with_records(items);

        let result = repo.search(SearchParams::new()).await.unwrap();

        assert_eq!(result.items.len(), 15);
        assert_eq!(result.total, 16);
        assert_eq!(result.current_page, 1);
        assert_eq!(result.per_page, 15);
        assert_eq!(result.last_page(), 2);
    }

    #[tokio::test]
    async fn test_search_filter_is_case_insensitive() {
        let repo = unsorted_repo(named(&["test", "a", "TEST", "TeSt"]));

        let result = repo
            .search(SearchParams::new().with_filter("test"))
            .await
            .unwrap();

        assert_eq!(names(&result.items), vec!["test", "TEST", "TeSt"]);
        assert_eq!(result.total, 3);
        assert_eq!(result.filter.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_search_sorts_by_name() {
        let repo = unsorted_repo(named(&["b", "a", "c"]));

        let asc = repo
            .search(SearchParams::new().with_sort("name", SortDirection::Asc))
            .await
            .unwrap();
        let desc = repo
            .search(SearchParams::new().with_sort("name", SortDirection::Desc))
            .await
            .unwrap();

        assert_eq!(names(&asc.items), vec!["a", "b", "c"]);
        assert_eq!(names(&desc.items), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_search_page_past_the_end() {
        let repo = unsorted_repo(named(&["a1", "a2", "a3", "a4", "a5", "b"]));

        let result = repo
            .search(
                SearchParams::new()
                    .with_page(4)
                    .with_per_page(2)
                    .with_filter("a"),
            )
            .await
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total, 5);
        assert_eq!(result.current_page, 4);
    }

    #[tokio::test]
    async fn test_search_without_sort_keeps_store_order() {
        let repo = unsorted_repo(named(&["b", "a", "c"]));

        let result = repo
            .search(SearchParams::new().with_sort_field("price"))
            .await
            .unwrap();

        assert_eq!(names(&result.items), vec!["b", "a", "c"]);
        assert_eq!(result.sort, None);
        assert_eq!(result.sort_dir, None);
    }

    #[tokio::test]
    async fn test_search_does_not_mutate_store() {
        let repo = unsorted_repo(named(&["b", "a", "c"]));

        repo.search(SearchParams::new().with_sort("name", SortDirection::Asc))
            .await
            .unwrap();

        assert_eq!(names(&repo.snapshot()), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryRepository::<Product>::new();
        let other = repo.clone();

        repo.insert(Product::new("Mouse", 1.0, 1)).await.unwrap();

        assert_eq!(other.len(), 1);
    }
}
