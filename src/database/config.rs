//! `database:` section of the configuration file

use serde::{Deserialize, Serialize};

const DEFAULT_URL: &str = "sqlite://./data/lab.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings for the analytics store
///
/// Every field may be omitted; `LAB_DATABASE__URL` and friends override the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sea-orm connection URL, SQLite file or `sqlite::memory:`
    pub url: String,
    /// Pool size for file-backed databases
    pub max_connections: u32,
    /// Apply pending migrations before `serve` binds its listener
    pub migration_on_startup: bool,
}

impl DatabaseConfig {
    /// In-memory SQLite is private to one connection
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// Pool size to request, `None` keeps the driver default
    pub fn pool_size(&self) -> Option<u32> {
        (!self.is_in_memory()).then_some(self.max_connections)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            migration_on_startup: true,
        }
    }
}
