mod config;
mod storage;

use std::path::Path;

use bagforge_api::error::PluginError;
use bagforge_api::storage::{StorageBackend, StoragePlugin};

pub use config::{McapCompression, McapConfig};
pub use storage::McapStorage;

// ════════════════════════════════════════════════════════════════
//  Plugin entry point
// ════════════════════════════════════════════════════════════════

/// rosbag2 `mcap` storage: one chunked `.mcap` file per bag, `ros2` profile.
#[derive(Debug, Clone, Default)]
pub struct McapPlugin {
    config: McapConfig,
}

impl McapPlugin {
    pub fn new(config: McapConfig) -> Self {
        Self { config }
    }
}

impl StoragePlugin for McapPlugin {
    fn identifier(&self) -> &'static str {
        "mcap"
    }

    fn extension(&self) -> &'static str {
        "mcap"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn StorageBackend>, PluginError> {
        let storage = McapStorage::create(path, &self.config)?;
        Ok(Box::new(storage))
    }
}
