mod repository;
mod types;

pub use repository::ProductsRepository;
pub use types::{CreateProductProps, Product};
