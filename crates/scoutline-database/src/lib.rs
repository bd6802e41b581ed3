//! Profile, order and settings storage for Scoutline

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod filter;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use filter::{OrderFilter, OrderSort, Page, ProfileFilter, ProfileSort, SortDirection};
pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use repository::Repository;

use scoutline_core::config::DatabaseBackend;
use scoutline_core::{Config, Error, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
use std::time::Duration;

/// Database connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection cannot be established.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
            .idle_timeout(Duration::from_secs(config.database.idle_timeout))
            .connect(&config.database.url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to run.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Migration failed: {e}")))?;

        Ok(())
    }

    /// Health check
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Health check failed: {e}")))?;

        Ok(())
    }
}

/// Open the repository selected by `database.backend`
///
/// PostgreSQL is connected and migrated before it is returned.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or migrated.
pub async fn connect(config: &Config) -> Result<Arc<dyn Repository>> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            info!("Using in-memory repository");
            Ok(Arc::new(MemoryRepository::new()))
        }
        DatabaseBackend::Postgres => {
            let db = Database::new(config).await?;
            db.migrate().await?;
            info!("Connected to PostgreSQL and applied migrations");
            Ok(Arc::new(PgRepository::new(db)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_new_invalid_url() {
        let mut config = Config::default();
        config.database.url = "invalid://url".to_string();

        let result = Database::new(&config).await;
        assert!(matches!(result, Err(Error::Database(msg)) if !msg.is_empty()));
    }

    #[tokio::test]
    async fn test_database_health_check_fail() {
        let pool = PgPool::connect_lazy("postgresql://invalid:5432/nonexistent").unwrap();
        let db = Database::from_pool(pool);

        let result = db.health_check().await;
        assert!(matches!(result, Err(Error::Database(msg)) if msg.contains("Health check failed")));
    }

    #[tokio::test]
    async fn test_database_migrate_fail() {
        let pool = PgPool::connect_lazy("postgresql://invalid:5432/nonexistent").unwrap();
        let db = Database::from_pool(pool);

        let result = db.migrate().await;
        assert!(matches!(result, Err(Error::Database(msg)) if msg.contains("Migration failed")));
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let config = Config::default();
        let repo = connect(&config).await.unwrap();

        assert_eq!(repo.backend_name(), "memory");
        assert!(repo.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_connect_postgres_unreachable() {
        let mut config = Config::default();
        config.database.backend = DatabaseBackend::Postgres;
        config.database.url = "postgresql://invalid:5432/nonexistent".to_string();
        config.database.connect_timeout = 1;

        assert!(connect(&config).await.is_err());
    }
}
