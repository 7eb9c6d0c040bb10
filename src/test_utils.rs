use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl, seed::seed_demo_data},
    server::Server,
};
use std::sync::Arc;

/// Test server builder backed by an in-memory SQLite database
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the server with migrations applied
    pub async fn build(self) -> Server {
        let mut config = self.config;
        config.database.url = "sqlite::memory:".to_string();
        config.logging.log_request = false;

        let server = Server::new(config)
            .await
            .expect("Failed to create test server");
        server
            .database
            .migrate()
            .await
            .expect("Failed to run test migrations");
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A migrated, empty in-memory database
pub async fn test_database() -> Arc<dyn DatabaseManager> {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();

    let database = DatabaseManagerImpl::new_from_config(&config)
        .await
        .expect("Failed to connect to test database");
    database
        .migrate()
        .await
        .expect("Failed to run test migrations");
    Arc::new(database)
}

/// Load the demo dataset into a test database
pub async fn seed_sample_data(database: &Arc<dyn DatabaseManager>) {
    seed_demo_data(database.as_ref(), false)
        .await
        .expect("Failed to seed sample data");
}
