use std::sync::Arc;

use serde::{Deserialize, Serialize};

use storefront_core::products::{CreateProductProps, Product, ProductsRepository};
use storefront_core::storage::{PaginationOutput, Repository, SearchParams};

use super::{require, Result, UseCaseError};

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(UseCaseError::InvalidInput(
            "price must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(UseCaseError::InvalidInput(
            "quantity must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Creates a product with a name no other product uses.
pub struct CreateProduct {
    products: Arc<dyn Repository<Product>>,
}

impl CreateProduct {
    pub fn new(products: Arc<dyn Repository<Product>>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, input: CreateProductProps) -> Result<Product> {
        require("name", &input.name)?;
        validate_price(input.price)?;
        validate_quantity(input.quantity)?;

        self.products.conflicting_name(&input.name).await?;

        let product = self.products.create(input);
        let product = self.products.insert(product).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }
}

pub struct GetProduct {
    products: Arc<dyn Repository<Product>>,
}

impl GetProduct {
    pub fn new(products: Arc<dyn Repository<Product>>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, id: &str) -> Result<Product> {
        Ok(self.products.find_by_id(id).await?)
    }
}

/// Fields to change on a product. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductInput {
    pub id: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

/// Partially updates a product.
///
/// A new name is checked for conflicts only when it differs from the current one.
pub struct UpdateProduct {
    products: Arc<dyn Repository<Product>>,
}

impl UpdateProduct {
    pub fn new(products: Arc<dyn Repository<Product>>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, input: UpdateProductInput) -> Result<Product> {
        let mut product = self.products.find_by_id(&input.id).await?;

        if let Some(name) = input.name {
            require("name", &name)?;
            if name != product.name {
                self.products.conflicting_name(&name).await?;
            }
            product.name = name;
        }
        if let Some(price) = input.price {
            validate_price(price)?;
            product.price = price;
        }
        if let Some(quantity) = input.quantity {
            validate_quantity(quantity)?;
            product.quantity = quantity;
        }
        product.touch();

        let product = self.products.update(product).await?;
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }
}

pub struct DeleteProduct {
    products: Arc<dyn Repository<Product>>,
}

impl DeleteProduct {
    pub fn new(products: Arc<dyn Repository<Product>>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, id: &str) -> Result<()> {
        self.products.delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

/// Searches products and shapes the page for output.
pub struct SearchProducts {
    products: Arc<dyn Repository<Product>>,
}

impl SearchProducts {
    pub fn new(products: Arc<dyn Repository<Product>>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, params: SearchParams) -> Result<PaginationOutput<Product>> {
        let result = self.products.search(params).await?;
        Ok(result.into_pagination())
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::storage::{RepositoryError, SortDirection};

    use super::*;
    use crate::storage::InMemoryRepository;

    fn repo() -> Arc<dyn Repository<Product>> {
        Arc::new(InMemoryRepository::<Product>::new())
    }

    fn props(name: &str) -> CreateProductProps {
        CreateProductProps {
            name: name.to_string(),
            price: 10.0,
            quantity: 5,
        }
    }

    #[tokio::test]
    async fn test_create_product() {
        let products = repo();

        let product = CreateProduct::new(products.clone())
            .execute(props("Keyboard"))
            .await
            .unwrap();

        assert_eq!(product.name, "Keyboard");
        assert_eq!(products.find_by_id(&product.id).await.unwrap(), product);
    }

    #[tokio::test]
    async fn test_create_product_with_taken_name_fails() {
        let products = repo();
        let create = CreateProduct::new(products.clone());
        create.execute(props("Keyboard")).await.unwrap();

        let result = create.execute(props("Keyboard")).await;

        assert!(matches!(
            result,
            Err(UseCaseError::Repository(RepositoryError::Conflict { .. }))
        ));
        assert_eq!(
            products.search(SearchParams::new()).await.unwrap().total,
            1
        );
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_input() {
        let create = CreateProduct::new(repo());

        let blank = create.execute(props("  ")).await;
        let free = create
            .execute(CreateProductProps {
                price: 0.0,
                ..props("Keyboard")
            })
            .await;
        let none_left = create
            .execute(CreateProductProps {
                quantity: 0,
                ..props("Keyboard")
            })
            .await;

        assert!(matches!(blank, Err(UseCaseError::InvalidInput(_))));
        assert!(matches!(free, Err(UseCaseError::InvalidInput(_))));
        assert!(matches!(none_left, Err(UseCaseError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let result = GetProduct::new(repo()).execute("fake-id").await;

        assert_eq!(result.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_update_product_changes_only_given_fields() {
        let products = repo();
        let product = CreateProduct::new(products.clone())
            .execute(props("Keyboard"))
            .await
            .unwrap();

        let updated = UpdateProduct::new(products.clone())
            .execute(UpdateProductInput {
                id: product.id.clone(),
                price: Some(12.5),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Keyboard");
        assert_eq!(updated.price, 12.5);
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.created_at, product.created_at);
        assert!(updated.updated_at >= product.updated_at);
    }

    #[tokio::test]
    async fn test_update_product_keeping_its_own_name_is_not_a_conflict() {
        let products = repo();
        let product = CreateProduct::new(products.clone())
            .execute(props("Keyboard"))
            .await
            .unwrap();

        let result = UpdateProduct::new(products)
            .execute(UpdateProductInput {
                id: product.id,
                name: Some("Keyboard".to_string()),
                quantity: Some(9),
                ..Default::default()
            })
            .await;

        assert_eq!(result.unwrap().quantity, 9);
    }

    #[tokio::test]
    async fn test_update_product_to_taken_name_fails() {
        let products = repo();
        let create = CreateProduct::new(products.clone());
        create.execute(props("Keyboard")).await.unwrap();
        let mouse = create.execute(props("Mouse")).await.unwrap();

        let result = UpdateProduct::new(products.clone())
            .execute(UpdateProductInput {
                id: mouse.id.clone(),
                name: Some("Keyboard".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(result.unwrap_err().status_code(), 409);
        assert_eq!(products.find_by_id(&mouse.id).await.unwrap().name, "Mouse");
    }

    #[tokio::test]
    async fn test_delete_product() {
        let products = repo();
        let product = CreateProduct::new(products.clone())
            .execute(props("Keyboard"))
            .await
            .unwrap();
        let delete = DeleteProduct::new(products.clone());

        delete.execute(&product.id).await.unwrap();

        assert!(products.find_by_id(&product.id).await.is_err());
        assert!(matches!(
            delete.execute(&product.id).await,
            Err(UseCaseError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_search_products_pagination_output() {
        let products = repo();
        let create = CreateProduct::new(products.clone());
        for name in ["a", "b", "c", "d", "e"] {
            create.execute(props(name)).await.unwrap();
        }

        let output = SearchProducts::new(products)
            .execute(
                SearchParams::new()
                    .with_per_page(2)
                    .with_page(2)
                    .with_sort("name", SortDirection::Asc),
            )
            .await
            .unwrap();

        let names: Vec<_> = output.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "d"]);
        assert_eq!(output.total, 5);
        assert_eq!(output.current_page, 2);
        assert_eq!(output.per_page, 2);
        assert_eq!(output.last_page, 3);
    }
}
