use std::path::Path;

use crate::error::PluginError;
use crate::record::{BagRecord, Connection};

/// Storage plugin factory. Knows its on-disk layout and opens backends.
///
/// The engine doesn't enumerate or know concrete implementations.
/// For the engine, storage is just this trait.
pub trait StoragePlugin: Send + Sync {
    /// rosbag2 storage identifier recorded in metadata (`sqlite3`, `mcap`).
    fn identifier(&self) -> &'static str;

    /// Storage file extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Create the storage file at `path`. Fails if it cannot be created.
    fn open(&self, path: &Path) -> Result<Box<dyn StorageBackend>, PluginError>;
}

/// One open storage file.
///
/// Calls arrive in strict program order from a single owner:
/// `add_connection*`, then `write*`, then `close`.
pub trait StorageBackend: Send {
    /// Register a connection. `offered_qos_profiles` is the flat YAML text.
    ///
    /// Fails with `DuplicateConnection` if `connection.id` is already known.
    fn add_connection(
        &mut self,
        connection: &Connection,
        offered_qos_profiles: &str,
    ) -> Result<(), PluginError>;

    /// Append a record. Fails with `UnknownConnection` on an unregistered id.
    fn write(&mut self, record: BagRecord) -> Result<(), PluginError>;

    /// Flush buffered state and embed the serialized metadata.
    ///
    /// Safe to call more than once; later calls are no-ops.
    fn close(&mut self, version: u32, metadata_yaml: &str) -> Result<(), PluginError>;
}
