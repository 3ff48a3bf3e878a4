//! Demo data for local development.

use rand::prelude::*;
use serde::Serialize;

use storefront_core::products::CreateProductProps;
use storefront_core::storage::RepositoryError;
use storefront_core::users::CreateUserProps;

use crate::state::Repositories;
use crate::usecases::{CreateProduct, CreateUser, UseCaseError};

const ADJECTIVES: &[&str] = &[
    "Compact", "Wireless", "Ergonomic", "Vintage", "Premium", "Portable", "Silent", "Rugged",
];

const ITEMS: &[&str] = &[
    "Keyboard", "Mouse", "Monitor", "Headset", "Webcam", "Desk Lamp", "Microphone", "Speaker",
];

const FIRST_NAMES: &[&str] = &["Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Radia"];

const LAST_NAMES: &[&str] = &["Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth"];

/// Password stored for demo users. Not a valid hash, so nobody can log in as them.
const DEMO_PASSWORD: &str = "!";

/// How many records a seeding run stored and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub products_created: usize,
    pub users_created: usize,
    /// Records whose unique field was already taken.
    pub skipped: usize,
}

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

/// Generates `count` products with distinct names.
pub fn demo_products(count: usize, rng: &mut impl Rng) -> Vec<CreateProductProps> {
    (1..=count)
        .map(|i| {
            let name = format!("{} {} #{i}", pick(rng, ADJECTIVES), pick(rng, ITEMS));
            // Whole cents, between 1.00 and 500.00
            let cents: u32 = rng.random_range(100..=50_000);
            CreateProductProps {
                name,
                price: f64::from(cents) / 100.0,
                quantity: rng.random_range(1..=100),
            }
        })
        .collect()
}

/// Generates `count` users with distinct emails.
pub fn demo_users(count: usize, rng: &mut impl Rng) -> Vec<CreateUserProps> {
    (1..=count)
        .map(|i| {
            let first = pick(rng, FIRST_NAMES);
            let last = pick(rng, LAST_NAMES);
            CreateUserProps {
                name: format!("{first} {last}"),
                email: format!(
                    "{}.{}{i}@example.com",
                    first.to_ascii_lowercase(),
                    last.to_ascii_lowercase()
                ),
                password: DEMO_PASSWORD.to_string(),
            }
        })
        .collect()
}

fn is_conflict(err: &UseCaseError) -> bool {
    matches!(err, UseCaseError::Repository(RepositoryError::Conflict { .. }))
}

/// Stores generated products and users through the create use cases.
///
/// Records whose name or email is already taken are skipped, so seeding the
/// same store twice is safe.
pub async fn seed(
    repos: &Repositories,
    products: usize,
    users: usize,
    rng: &mut impl Rng,
) -> Result<SeedSummary, UseCaseError> {
    let mut summary = SeedSummary::default();

    let create_product = CreateProduct::new(repos.products.clone());
    for props in demo_products(products, rng) {
        match create_product.execute(props).await {
            Ok(_) => summary.products_created += 1,
            Err(err) if is_conflict(&err) => summary.skipped += 1,
            Err(err) => return Err(err),
        }
    }

    let create_user = CreateUser::new(repos.users.clone());
    for props in demo_users(users, rng) {
        match create_user.execute(props).await {
            Ok(_) => summary.users_created += 1,
            Err(err) if is_conflict(&err) => summary.skipped += 1,
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        products = summary.products_created,
        users = summary.users_created,
        skipped = summary.skipped,
        "Seeding finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use storefront_core::storage::SearchParams;

    use super::*;

    #[test]
    fn test_demo_products_have_unique_names_and_valid_values() {
        let mut rng = StdRng::seed_from_u64(7);

        let products = demo_products(50, &mut rng);

        let names: HashSet<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), 50);
        assert!(products.iter().all(|p| p.price >= 1.0 && p.price <= 500.0));
        assert!(products.iter().all(|p| p.quantity >= 1));
    }

    #[test]
    fn test_demo_users_have_unique_emails() {
        let mut rng = StdRng::seed_from_u64(7);

        let users = demo_users(30, &mut rng);

        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), 30);
    }

    #[tokio::test]
    async fn test_seed_twice_skips_taken_records() {
        let repos = Repositories::in_memory();

        let first = seed(&repos, 20, 5, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();
        let second = seed(&repos, 20, 5, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(first.products_created, 20);
        assert_eq!(first.users_created, 5);
        assert_eq!(first.skipped, 0);
        assert_eq!(second.skipped, 25);
        let total = repos.products.search(SearchParams::new()).await.unwrap().total;
        assert_eq!(total, 20);
    }
}
