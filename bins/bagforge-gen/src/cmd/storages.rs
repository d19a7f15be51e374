use std::sync::Arc;

use bagforge_api::format::MessageEncoder;
use bagforge_api::storage::StoragePlugin;
use bagforge_engine::GenConfig;
use bagforge_format_cdr::{CdrConfig, CdrEncoder};
use bagforge_storage_mcap::{McapConfig, McapPlugin};
use bagforge_storage_sqlite::{SqliteConfig, SqlitePlugin};
use serde::de::DeserializeOwned;

use super::error::GenError;

/// Every storage this binary ships, configured from the `[sqlite]` and
/// `[mcap]` tables.
pub fn load_storages(config: &GenConfig) -> Result<Vec<Arc<dyn StoragePlugin>>, GenError> {
    let sqlite: SqliteConfig = plugin_config("sqlite", config.sqlite.as_ref())?;
    let mcap: McapConfig = plugin_config("mcap", config.mcap.as_ref())?;
    Ok(vec![Arc::new(SqlitePlugin::new(sqlite)), Arc::new(McapPlugin::new(mcap))])
}

/// The CDR encoder, configured from the `[cdr]` table.
pub fn load_encoder(config: &GenConfig) -> Result<Arc<dyn MessageEncoder>, GenError> {
    let cdr: CdrConfig = plugin_config("cdr", config.cdr.as_ref())?;
    Ok(Arc::new(CdrEncoder::new(&cdr)))
}

fn plugin_config<T: DeserializeOwned + Default>(
    name: &str,
    value: Option<&toml::Value>,
) -> Result<T, GenError> {
    match value {
        Some(v) => v
            .clone()
            .try_into()
            .map_err(|e| GenError::Config(format!("[{name}]: {e}"))),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use bagforge_api::value::{Message, Value};

    use super::*;

    #[test]
    fn plugin_tables_are_applied() {
        let config = GenConfig::parse("[mcap]\ncompression = \"none\"\n[sqlite]\nbatch_size = 7\n").unwrap();
        let plugins = load_storages(&config).unwrap();
        let ids: Vec<_> = plugins.iter().map(|p| p.identifier()).collect();
        assert_eq!(ids, ["sqlite3", "mcap"]);
    }

    #[test]
    fn bad_plugin_table_is_a_config_error() {
        let config = GenConfig::parse("[mcap]\ncompression = \"brotli\"\n").unwrap();
        assert!(matches!(load_storages(&config), Err(GenError::Config(_))));

        let config = GenConfig::parse("[cdr]\nbyte_order = \"middle\"\n").unwrap();
        assert!(matches!(load_encoder(&config), Err(GenError::Config(_))));
    }

    #[test]
    fn cdr_table_selects_the_byte_order() {
        let registry = bagforge_engine::humble_registry().unwrap();
        let message = Message { type_name: "std_msgs/msg/Int32".into(), fields: vec![Value::Int32(1)] };

        let big = load_encoder(&GenConfig::parse("[cdr]\nbyte_order = \"big\"\n").unwrap()).unwrap();
        assert_eq!(big.encode(&message, &registry).unwrap(), [0, 0, 0, 0, 0, 0, 0, 1]);

        let little = load_encoder(&GenConfig::default()).unwrap();
        assert_eq!(little.encode(&message, &registry).unwrap(), [0, 1, 0, 0, 1, 0, 0, 0]);
    }
}
