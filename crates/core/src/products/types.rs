use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{
    generate_id, timestamp_now, Record, RepositoryError, SearchSchema, SortDirection,
};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Display name. Unique across products.
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input fields for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductProps {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl Product {
    /// Creates a new product with a fresh ID and timestamps.
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        let now = timestamp_now();
        Self {
            id: generate_id(),
            name: name.into(),
            price,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this product (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets a specific creation time for this product (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Marks the product as modified now.
    pub fn touch(&mut self) {
        self.updated_at = timestamp_now();
    }
}

fn filter_name(product: &Product) -> &str {
    &product.name
}

fn compare_name(a: &Product, b: &Product) -> Ordering {
    a.name.cmp(&b.name)
}

fn compare_created_at(a: &Product, b: &Product) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

impl Record for Product {
    const ENTITY_TYPE: &'static str = "Product";
    const UNIQUE_FIELD: &'static str = "name";

    type CreateProps = CreateProductProps;

    fn create(props: CreateProductProps) -> Self {
        Product::new(props.name, props.price, props.quantity)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_value(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    /// SQLite stores NaN as NULL, so non-finite prices never reach a backend.
    fn validate(&self) -> Result<(), RepositoryError> {
        if self.price.is_finite() {
            Ok(())
        } else {
            Err(RepositoryError::InvalidData(format!(
                "Product {} has a non-finite price: {}",
                self.id, self.price
            )))
        }
    }

    fn search_schema() -> SearchSchema<Self> {
        SearchSchema::new("name", filter_name)
            .sortable("name", compare_name)
            .sortable("created_at", compare_created_at)
            .with_default_sort("created_at", SortDirection::Desc)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::storage::SearchParams;

    #[test]
    fn test_create_assigns_identity_and_timestamps() {
        let product = Product::create(CreateProductProps {
            name: "Curso nodejs".to_string(),
            price: 10.5,
            quantity: 3,
        });

        assert!(!product.id.is_empty());
        assert_eq!(product.name, "Curso nodejs");
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.unique_value(), "Curso nodejs");
    }

    #[test]
    fn test_search_schema() {
        let schema = Product::search_schema();

        assert_eq!(schema.filter_field(), "name");
        assert_eq!(schema.sortable_fields(), vec!["name", "created_at"]);
        assert!(schema.sort_field("price").is_none());
    }

    #[test]
    fn test_default_search_is_newest_first() {
        let base = timestamp_now();
        let items: Vec<_> = (0..3)
            .map(|i| Product::new(format!("p{i}"), 1.0, 1).with_created_at(base + Duration::seconds(i)))
            .collect();

        let result = Product::search_schema().search(items.clone(), &SearchParams::new());

        let expected: Vec<_> = items.into_iter().rev().collect();
        assert_eq!(result.items, expected);
        assert_eq!(result.sort.as_deref(), Some("created_at"));
        assert_eq!(result.sort_dir, Some(SortDirection::Desc));
    }

    #[test]
    fn test_search_sorts_by_name_with_filter() {
        let items = vec![
            Product::new("a", 1.0, 1),
            Product::new("AA", 1.0, 1),
            Product::new("Aa", 1.0, 1),
            Product::new("b", 1.0, 1),
            Product::new("c", 1.0, 1),
        ];

        let asc = Product::search_schema().search(
            items.clone(),
            &SearchParams::new()
                .with_per_page(2)
                .with_sort("name", SortDirection::Asc)
                .with_filter("a"),
        );
        assert_eq!(asc.items, vec![items[1].clone(), items[2].clone()]);
        assert_eq!(asc.total, 3);
        assert_eq!(asc.last_page(), 2);

        let desc = Product::search_schema().search(
            items.clone(),
            &SearchParams::new()
                .with_per_page(2)
                .with_sort("name", SortDirection::Desc)
                .with_filter("a"),
        );
        assert_eq!(desc.items, vec![items[0].clone(), items[2].clone()]);
    }

    #[test]
    fn test_validate_rejects_non_finite_price() {
        assert!(Product::new("p", 0.0, 1).validate().is_ok());

        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = Product::new("p", price, 1).validate();
            assert!(
                matches!(result, Err(RepositoryError::InvalidData(_))),
                "price {price} accepted"
            );
        }
    }

    #[test]
    fn test_touch_updates_only_updated_at() {
        let earlier = timestamp_now() - Duration::hours(1);
        let mut product = Product::new("p", 1.0, 1).with_created_at(earlier);

        product.touch();

        assert_eq!(product.created_at, earlier);
        assert!(product.updated_at > earlier);
    }
}
