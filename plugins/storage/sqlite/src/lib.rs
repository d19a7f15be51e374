mod config;
mod storage;

use std::path::Path;

use bagforge_api::error::PluginError;
use bagforge_api::storage::{StorageBackend, StoragePlugin};

pub use config::SqliteConfig;
pub use storage::SqliteStorage;

// ════════════════════════════════════════════════════════════════
//  Plugin entry point
// ════════════════════════════════════════════════════════════════

/// rosbag2 `sqlite3` storage: one `.db3` file per bag.
#[derive(Debug, Clone, Default)]
pub struct SqlitePlugin {
    config: SqliteConfig,
}

impl SqlitePlugin {
    pub fn new(config: SqliteConfig) -> Self {
        Self { config }
    }
}

impl StoragePlugin for SqlitePlugin {
    fn identifier(&self) -> &'static str {
        "sqlite3"
    }

    fn extension(&self) -> &'static str {
        "db3"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn StorageBackend>, PluginError> {
        let storage = SqliteStorage::create(path, self.config.batch_size)?;
        Ok(Box::new(storage))
    }
}
