use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use bagforge_api::error::PluginError;
use bagforge_api::record::{BagRecord, Connection};
use bagforge_api::storage::StorageBackend;

use super::config::McapConfig;

const PROFILE: &str = "ros2";
const SCHEMA_ENCODING: &str = "ros2msg";
/// Name of the metadata record that carries `metadata.yaml`.
const METADATA_RECORD: &str = "rosbag2";

fn mcap_err(ctx: &'static str) -> impl Fn(mcap::McapError) -> PluginError {
    move |e| PluginError::io(format!("mcap {ctx}: {e}"))
}

struct Channel {
    id: u16,
    sequence: u32,
}

// ════════════════════════════════════════════════════════════════
//  McapStorage
// ════════════════════════════════════════════════════════════════

/// Chunked MCAP backend. One schema record per message type, one channel
/// per connection, a `rosbag2` metadata record on close.
pub struct McapStorage {
    path: PathBuf,
    writer: Option<mcap::Writer<BufWriter<File>>>,
    schemas: HashMap<String, u16>,
    channels: HashMap<u32, Channel>,
}

impl McapStorage {
    /// Create the `.mcap` file and write its header. Fails if the file exists.
    pub fn create(path: &Path, config: &McapConfig) -> Result<Self, PluginError> {
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| PluginError::io(format!("{}: {e}", path.display())))?;

        let writer = mcap::WriteOptions::new()
            .profile(PROFILE)
            .compression(config.compression.to_mcap())
            .chunk_size(Some(config.chunk_size))
            .create(BufWriter::new(file))
            .map_err(mcap_err("write header"))?;

        tracing::debug!(path = %path.display(), compression = ?config.compression, "mcap storage created");
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(writer),
            schemas: HashMap::new(),
            channels: HashMap::new(),
        })
    }

    fn writer(&mut self) -> Result<&mut mcap::Writer<BufWriter<File>>, PluginError> {
        self.writer
            .as_mut()
            .ok_or_else(|| PluginError::io(format!("{} is closed", self.path.display())))
    }

    fn schema_id(&mut self, connection: &Connection) -> Result<u16, PluginError> {
        if let Some(id) = self.schemas.get(&connection.type_name) {
            return Ok(*id);
        }
        let id = self
            .writer()?
            .add_schema(
                &connection.type_name,
                SCHEMA_ENCODING,
                connection.message_definition.as_bytes(),
            )
            .map_err(mcap_err("add schema"))?;
        self.schemas.insert(connection.type_name.clone(), id);
        Ok(id)
    }
}

impl StorageBackend for McapStorage {
    fn add_connection(
        &mut self,
        connection: &Connection,
        offered_qos_profiles: &str,
    ) -> Result<(), PluginError> {
        if self.channels.contains_key(&connection.id) {
            return Err(PluginError::duplicate_connection(&connection.topic, &connection.type_name));
        }

        let schema_id = self.schema_id(connection)?;
        let metadata = BTreeMap::from([(
            "offered_qos_profiles".to_string(),
            offered_qos_profiles.to_string(),
        )]);
        let channel_id = self
            .writer()?
            .add_channel(
                schema_id,
                &connection.topic,
                &connection.serialization_format,
                &metadata,
            )
            .map_err(mcap_err("add channel"))?;

        self.channels.insert(connection.id, Channel { id: channel_id, sequence: 0 });
        Ok(())
    }

    fn write(&mut self, record: BagRecord) -> Result<(), PluginError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PluginError::io(format!("{} is closed", self.path.display())))?;
        let channel = self
            .channels
            .get_mut(&record.connection_id)
            .ok_or_else(|| PluginError::unknown_connection(record.connection_id))?;

        let header = mcap::records::MessageHeader {
            channel_id: channel.id,
            sequence: channel.sequence,
            log_time: record.timestamp,
            publish_time: record.timestamp,
        };
        writer
            .write_to_known_channel(&header, &record.data)
            .map_err(mcap_err("write message"))?;
        channel.sequence = channel.sequence.wrapping_add(1);
        Ok(())
    }

    fn close(&mut self, version: u32, metadata_yaml: &str) -> Result<(), PluginError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        let record = mcap::records::Metadata {
            name: METADATA_RECORD.to_string(),
            metadata: BTreeMap::from([
                ("serialized_metadata".to_string(), metadata_yaml.to_string()),
                ("ros_distro".to_string(), "rosbags".to_string()),
                ("metadata_version".to_string(), version.to_string()),
            ]),
        };
        let written = writer.write_metadata(&record).map_err(mcap_err("write metadata"));
        writer.finish().map_err(mcap_err("finish"))?;

        tracing::debug!(path = %self.path.display(), channels = self.channels.len(), "mcap storage closed");
        written
    }
}

#[cfg(test)]
mod tests {
    use bagforge_api::error::ErrorKind;

    use super::*;
    use crate::config::McapCompression;

    fn connection(id: u32, topic: &str, type_name: &str) -> Connection {
        Connection {
            id,
            topic: topic.into(),
            type_name: type_name.into(),
            serialization_format: "cdr".into(),
            offered_qos_profiles: vec![],
            type_description_hash: String::new(),
            message_definition: "bool data".into(),
        }
    }

    fn record(id: u32, ts: u64) -> BagRecord {
        BagRecord { connection_id: id, timestamp: ts, data: vec![0, 1, 0, 0, 1] }
    }

    #[test]
    fn messages_and_channels_are_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.mcap");
        let config = McapConfig { compression: McapCompression::None, ..Default::default() };
        let mut storage = McapStorage::create(&path, &config).unwrap();
        storage.add_connection(&connection(1, "/a", "std_msgs/msg/Bool"), "").unwrap();
        storage.add_connection(&connection(2, "/b", "std_msgs/msg/Bool"), "").unwrap();
        for ts in 1..=4 {
            storage.write(record(if ts % 2 == 0 { 2 } else { 1 }, ts)).unwrap();
        }
        storage.close(8, "meta: 1").unwrap();
        storage.close(8, "meta: 1").unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let messages: Vec<_> = mcap::MessageStream::new(&bytes)
            .unwrap()
            .map(|m| m.unwrap())
            .collect();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].channel.topic, "/a");
        assert_eq!(messages[1].channel.topic, "/b");
        assert_eq!(messages[1].log_time, 2);
        assert_eq!(messages[0].channel.message_encoding, "cdr");
        let schema = messages[0].channel.schema.as_ref().unwrap();
        assert_eq!(schema.name, "std_msgs/msg/Bool");
        assert_eq!(schema.encoding, "ros2msg");

        let summary = mcap::Summary::read(&bytes).unwrap().unwrap();
        assert_eq!(summary.stats.unwrap().message_count, 4);
        assert_eq!(summary.channels.len(), 2);
        assert_eq!(summary.schemas.len(), 1);
    }

    #[test]
    fn contract_violations_carry_their_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = McapStorage::create(&dir.path().join("bag.mcap"), &McapConfig::default()).unwrap();
        storage.add_connection(&connection(1, "/a", "std_msgs/msg/Bool"), "").unwrap();

        let err = storage.add_connection(&connection(1, "/a", "std_msgs/msg/Bool"), "").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateConnection);
        let err = storage.write(record(3, 1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownConnection);
        storage.close(8, "").unwrap();
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.mcap");
        std::fs::write(&path, b"keep").unwrap();
        let err = McapStorage::create(&path, &McapConfig::default()).err().unwrap();
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(std::fs::read(&path).unwrap(), b"keep");
    }
}
