use std::{env, fmt, str::FromStr};

use thiserror::Error;

/// Which storage backend the repositories are assembled on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Records kept in process memory, lost on exit.
    InMemory,
    /// Records persisted to a SQLite database file.
    #[default]
    Sqlite,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown storage backend: {0} (expected 'sqlite' or 'inmemory')")]
pub struct ParseStorageBackendError(String);

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::InMemory => "inmemory",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ParseStorageBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inmemory" | "memory" => Ok(StorageBackend::InMemory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            _ => Err(ParseStorageBackendError(s.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage backend (default: sqlite)
    pub storage_backend: StorageBackend,
    /// Path to SQLite database file (default: "storefront.db")
    pub sqlite_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_BACKEND` - `sqlite` or `inmemory` (default: sqlite)
    /// - `SQLITE_PATH` - SQLite database path (default: "storefront.db").
    ///   `:memory:` opens an in-memory database.
    pub fn from_env() -> Self {
        Self {
            storage_backend: match env::var("STORAGE_BACKEND") {
                Ok(value) => value.parse().unwrap_or_else(|err| {
                    tracing::warn!(%err, "Falling back to the default storage backend");
                    StorageBackend::default()
                }),
                Err(_) => StorageBackend::default(),
            },
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "storefront.db".to_string()),
        }
    }

    /// Replaces the values given explicitly, e.g. on the command line.
    pub fn with_overrides(
        mut self,
        storage_backend: Option<StorageBackend>,
        sqlite_path: Option<String>,
    ) -> Self {
        if let Some(backend) = storage_backend {
            self.storage_backend = backend;
        }
        if let Some(path) = sqlite_path {
            self.sqlite_path = path;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
