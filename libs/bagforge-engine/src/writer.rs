use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bagforge_api::error::PluginError;
use bagforge_api::metadata::{
    BagFileInformation, BagMetadata, Duration, FileInformation, QosProfilesField, StartingTime,
    TopicMetadata, TopicWithMessageCount,
};
use bagforge_api::qos::{QosProfile, profiles_to_yaml};
use bagforge_api::record::{BagRecord, Connection};
use bagforge_api::storage::{StorageBackend, StoragePlugin};

use crate::error::EngineError;

pub const METADATA_FILE: &str = "metadata.yaml";

/// rosbag2 stores time points as signed 64-bit nanoseconds.
const MAX_TIMESTAMP: u64 = i64::MAX as u64;

/// Options fixed for the lifetime of one bag.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Metadata version written on close.
    pub version: u32,
    pub serialization_format: String,
    /// Offer the default publisher QoS on every topic instead of none.
    pub offer_default_qos: bool,
    pub custom_data: BTreeMap<String, String>,
    pub ros_distro: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            version: 8,
            serialization_format: "cdr".into(),
            offer_default_qos: false,
            custom_data: BTreeMap::new(),
            ros_distro: "rosbags".into(),
        }
    }
}

struct Topic {
    connection: Connection,
    count: u64,
}

// ═══════════════════════════════════════════════════════════════
//  BagWriter
// ═══════════════════════════════════════════════════════════════

/// One rosbag2 bag directory: a storage file plus `metadata.yaml`.
///
/// Enforces the connection and timestamp contract in front of the backend and
/// keeps the counters metadata is built from. Dropping an open writer closes it.
pub struct BagWriter {
    dir: PathBuf,
    storage_identifier: &'static str,
    file_name: String,
    backend: Box<dyn StorageBackend>,
    options: WriterOptions,
    topics: Vec<Topic>,
    first_timestamp: Option<u64>,
    last_timestamp: Option<u64>,
    message_count: u64,
    closed: bool,
}

impl BagWriter {
    /// Create `dir` and open the storage file `<dir name>.<ext>` inside it.
    ///
    /// Fails if `dir` already exists.
    pub fn create(
        dir: &Path,
        plugin: &dyn StoragePlugin,
        options: WriterOptions,
    ) -> Result<Self, EngineError> {
        if dir.exists() {
            return Err(PluginError::io(format!("{} already exists", dir.display())).into());
        }
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| EngineError::Config(format!("{} has no directory name", dir.display())))?;
        std::fs::create_dir_all(dir)?;

        let file_name = format!("{name}.{}", plugin.extension());
        let backend = plugin
            .open(&dir.join(&file_name))
            .map_err(|e| e.with_context(plugin.identifier()))?;

        tracing::info!(path = %dir.display(), storage = plugin.identifier(), version = options.version, "bag opened");
        Ok(Self {
            dir: dir.to_path_buf(),
            storage_identifier: plugin.identifier(),
            file_name,
            backend,
            options,
            topics: Vec::new(),
            first_timestamp: None,
            last_timestamp: None,
            message_count: 0,
            closed: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn storage_identifier(&self) -> &'static str {
        self.storage_identifier
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.topics.iter().map(|t| &t.connection)
    }

    /// Register `(topic, type_name)` and return its connection id, assigned from 1.
    pub fn add_connection(
        &mut self,
        topic: &str,
        type_name: &str,
        message_definition: &str,
    ) -> Result<u32, EngineError> {
        self.ensure_open()?;
        if self
            .topics
            .iter()
            .any(|t| t.connection.topic == topic && t.connection.type_name == type_name)
        {
            return Err(PluginError::duplicate_connection(topic, type_name).into());
        }

        let id = u32::try_from(self.topics.len() + 1)
            .map_err(|_| PluginError::io("connection id space exhausted"))?;
        let offered_qos_profiles = if self.options.offer_default_qos {
            vec![QosProfile::default_offer()]
        } else {
            Vec::new()
        };
        let connection = Connection {
            id,
            topic: topic.to_string(),
            type_name: type_name.to_string(),
            serialization_format: self.options.serialization_format.clone(),
            offered_qos_profiles,
            type_description_hash: String::new(),
            message_definition: message_definition.to_string(),
        };

        let qos_text = profiles_to_yaml(&connection.offered_qos_profiles)?;
        self.backend.add_connection(&connection, &qos_text)?;

        tracing::debug!(id, topic, type_name, "connection added");
        self.topics.push(Topic { connection, count: 0 });
        Ok(id)
    }

    /// Append one record. Timestamps must strictly increase across the bag and
    /// fit in `i64`.
    pub fn write(&mut self, connection_id: u32, timestamp: u64, data: Vec<u8>) -> Result<(), EngineError> {
        self.ensure_open()?;
        let index = usize::try_from(connection_id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .filter(|i| *i < self.topics.len())
            .ok_or_else(|| PluginError::unknown_connection(connection_id))?;
        if let Some(previous) = self.last_timestamp {
            if timestamp <= previous {
                return Err(PluginError::non_monotonic(timestamp, previous).into());
            }
        }
        if timestamp > MAX_TIMESTAMP {
            return Err(PluginError::format(format!("timestamp {timestamp} exceeds the int64 time range")).into());
        }

        self.backend.write(BagRecord { connection_id, timestamp, data })?;

        self.topics[index].count += 1;
        self.message_count += 1;
        self.first_timestamp.get_or_insert(timestamp);
        self.last_timestamp = Some(timestamp);
        Ok(())
    }

    /// Metadata as it stands now.
    pub fn metadata(&self) -> BagMetadata {
        let version = self.options.version;
        let start = self.first_timestamp.unwrap_or(0);
        let duration = self.last_timestamp.map_or(0, |last| last - start);

        let topics_with_message_count = self
            .topics
            .iter()
            .map(|t| TopicWithMessageCount {
                message_count: t.count,
                topic_metadata: TopicMetadata {
                    name: t.connection.topic.clone(),
                    type_name: t.connection.type_name.clone(),
                    serialization_format: t.connection.serialization_format.clone(),
                    offered_qos_profiles: QosProfilesField::List(t.connection.offered_qos_profiles.clone()),
                    type_description_hash: (version >= 7).then(|| t.connection.type_description_hash.clone()),
                },
            })
            .collect();

        let files = if version >= 5 {
            vec![FileInformation {
                path: self.file_name.clone(),
                starting_time: StartingTime { nanoseconds_since_epoch: start },
                duration: Duration { nanoseconds: duration },
                message_count: self.message_count,
            }]
        } else {
            Vec::new()
        };

        BagMetadata {
            rosbag2_bagfile_information: BagFileInformation {
                version,
                storage_identifier: self.storage_identifier.to_string(),
                relative_file_paths: vec![self.file_name.clone()],
                duration: Duration { nanoseconds: duration },
                starting_time: StartingTime { nanoseconds_since_epoch: start },
                message_count: self.message_count,
                compression_format: String::new(),
                compression_mode: String::new(),
                topics_with_message_count,
                files,
                custom_data: (version >= 6).then(|| self.options.custom_data.clone()),
                ros_distro: (version >= 8).then(|| self.options.ros_distro.clone()),
            },
        }
    }

    /// Close the backend and write `metadata.yaml`. Later calls return the
    /// same metadata without touching disk.
    pub fn close(&mut self) -> Result<BagMetadata, EngineError> {
        let metadata = self.metadata();
        if self.closed {
            return Ok(metadata);
        }
        self.closed = true;

        let yaml = metadata.to_yaml()?;
        let stored = self.backend.close(self.options.version, &yaml);
        std::fs::write(self.dir.join(METADATA_FILE), &yaml)?;
        stored.map_err(|e| e.with_context(self.storage_identifier))?;

        tracing::info!(
            path = %self.dir.display(),
            storage = self.storage_identifier,
            messages = self.message_count,
            topics = self.topics.len(),
            "bag closed"
        );
        Ok(metadata)
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.closed {
            return Err(PluginError::io(format!("{} is closed", self.dir.display())).into());
        }
        Ok(())
    }
}

impl Drop for BagWriter {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.close() {
            tracing::error!(path = %self.dir.display(), error = %e, "finalizing bag on drop failed");
        }
    }
}
