use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::config::{Config, StorageBackend};
use storefront::seed::seed;
use storefront::state::Repositories;
use storefront::usecases::{SearchProducts, SearchUsers};
use storefront_core::storage::{SearchParams, SortDirection};

/// Storefront - maintenance tasks for the product and user stores
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Storage backend to use: sqlite or inmemory [default: $STORAGE_BACKEND or sqlite]
    #[arg(long)]
    backend: Option<StorageBackend>,

    /// Path to the SQLite database file (":memory:" for a throwaway database)
    /// [default: $SQLITE_PATH or storefront.db]
    #[arg(long)]
    sqlite_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create missing tables and indexes
    Migrate,

    /// Insert demo products and users
    Seed {
        /// Number of products to generate
        #[arg(long, default_value_t = 50)]
        products: usize,

        /// Number of users to generate
        #[arg(long, default_value_t = 10)]
        users: usize,

        /// Seed for the random generator, for reproducible data
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Search a store and print the page as JSON
    Search {
        /// Store to search
        #[arg(value_enum)]
        target: Target,

        #[arg(long)]
        page: Option<u64>,

        #[arg(long)]
        per_page: Option<u64>,

        /// Field to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction: asc or desc
        #[arg(long)]
        sort_dir: Option<SortDirection>,

        /// Case-insensitive substring to match
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Target {
    Products,
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Flags win over the environment.
    let config = Config::from_env().with_overrides(cli.backend, cli.sqlite_path);

    if config.storage_backend == StorageBackend::InMemory {
        tracing::warn!("In-memory backend selected; nothing will be persisted");
    }

    // Opening the configured backend creates any missing tables.
    let repos = Repositories::from_config(&config).await?;

    match cli.command {
        Command::Migrate => {
            tracing::info!(backend = %config.storage_backend, "Schema is up to date");
        }
        Command::Seed {
            products,
            users,
            rng_seed,
        } => {
            let mut rng = match rng_seed {
                Some(value) => StdRng::seed_from_u64(value),
                None => StdRng::from_os_rng(),
            };
            let summary = seed(&repos, products, users, &mut rng).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Search {
            target,
            page,
            per_page,
            sort,
            sort_dir,
            filter,
        } => {
            let params = SearchParams {
                page,
                per_page,
                sort,
                sort_dir,
                filter,
            };
            let output = match target {
                Target::Products => serde_json::to_string_pretty(
                    &SearchProducts::new(repos.products).execute(params).await?,
                )?,
                Target::Users => serde_json::to_string_pretty(
                    &SearchUsers::new(repos.users).execute(params).await?,
                )?,
            };
            println!("{output}");
        }
    }

    Ok(())
}
