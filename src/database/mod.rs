//! Database access layer with domain-specific DAOs
//!
//! Each record set (customers, orders with their items, products) has its own
//! DAO. The manager is passed around as `Arc<dyn DatabaseManager>` so that
//! routines and handlers can run against any connection, including an
//! in-memory SQLite database in tests.

use crate::config::Config;
use crate::health::HealthChecker;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;
pub mod seed;

pub use dao::{
    CustomerOrderCount, CustomersDao, OrderDetails, OrderQuery, OrdersDao, ProductsDao,
};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Record not found")]
    NotFound,
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get customers DAO
    fn customers(&self) -> CustomersDao;

    /// Get orders DAO (orders and their items)
    fn orders(&self) -> OrdersDao;

    /// Get products DAO
    fn products(&self) -> ProductsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &Config) -> Result<Self, DatabaseError> {
        ensure_sqlite_directory(&config.database.url)?;

        let mut options = ConnectOptions::new(config.database.url.clone());
        if let Some(size) = config.database.pool_size() {
            options.max_connections(size);
        }
        options.sqlx_logging(false);

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Self { connection })
    }
}

/// SQLite creates the file on `mode=rwc` but not its directory
fn ensure_sqlite_directory(url: &str) -> DatabaseResult<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }

    match std::path::Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                DatabaseError::Database(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            }),
        _ => Ok(()),
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn customers(&self) -> CustomersDao {
        CustomersDao::new(self.connection.clone())
    }

    fn orders(&self) -> OrdersDao {
        OrdersDao::new(self.connection.clone())
    }

    fn products(&self) -> ProductsDao {
        ProductsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.health_check().await.map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_sqlite_directory_creates_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("lab.db");
        let url = format!("sqlite://{}?mode=rwc", nested.display());

        ensure_sqlite_directory(&url).unwrap();
        assert!(dir.path().join("data").is_dir());
    }

    #[test]
    fn test_ensure_sqlite_directory_ignores_other_urls() {
        assert!(ensure_sqlite_directory("sqlite::memory:").is_ok());
        assert!(ensure_sqlite_directory("postgres://localhost/lab").is_ok());
    }

    #[tokio::test]
    async fn test_database_health_checker() {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        let database = DatabaseManagerImpl::new_from_config(&config).await.unwrap();

        assert_eq!(database.name(), "database");
        assert!(database.check().await.is_ok());
    }
}
