use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PluginError;
use crate::qos::QosProfile;

/// Root of `metadata.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagMetadata {
    pub rosbag2_bagfile_information: BagFileInformation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagFileInformation {
    pub version: u32,
    /// `sqlite3` or `mcap`.
    pub storage_identifier: String,
    pub relative_file_paths: Vec<String>,
    pub duration: Duration,
    pub starting_time: StartingTime,
    pub message_count: u64,
    #[serde(default)]
    pub compression_format: String,
    #[serde(default)]
    pub compression_mode: String,
    pub topics_with_message_count: Vec<TopicWithMessageCount>,
    /// Version 5+.
    #[serde(default)]
    pub files: Vec<FileInformation>,
    /// Version 6+.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<BTreeMap<String, String>>,
    /// Version 8+.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ros_distro: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicWithMessageCount {
    pub message_count: u64,
    pub topic_metadata: TopicMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub serialization_format: String,
    #[serde(default)]
    pub offered_qos_profiles: QosProfilesField,
    /// Version 7+.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_description_hash: Option<String>,
}

/// Sequence in newer versions, flat YAML text in older ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QosProfilesField {
    List(Vec<QosProfile>),
    Text(String),
}

impl Default for QosProfilesField {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    pub path: String,
    pub starting_time: StartingTime,
    pub duration: Duration,
    pub message_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Duration {
    pub nanoseconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartingTime {
    pub nanoseconds_since_epoch: u64,
}

impl BagMetadata {
    pub fn to_yaml(&self) -> Result<String, PluginError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, PluginError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn info(&self) -> &BagFileInformation {
        &self.rosbag2_bagfile_information
    }

    /// `(topic, type, count)` in metadata order.
    pub fn topic_counts(&self) -> Vec<(&str, &str, u64)> {
        self.info()
            .topics_with_message_count
            .iter()
            .map(|t| {
                (
                    t.topic_metadata.name.as_str(),
                    t.topic_metadata.type_name.as_str(),
                    t.message_count,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BagMetadata {
        BagMetadata {
            rosbag2_bagfile_information: BagFileInformation {
                version: 8,
                storage_identifier: "sqlite3".into(),
                relative_file_paths: vec!["bag.db3".into()],
                duration: Duration { nanoseconds: 100 },
                starting_time: StartingTime { nanoseconds_since_epoch: 5 },
                message_count: 2,
                compression_format: String::new(),
                compression_mode: String::new(),
                topics_with_message_count: vec![TopicWithMessageCount {
                    message_count: 2,
                    topic_metadata: TopicMetadata {
                        name: "/test/std_msgs/bool".into(),
                        type_name: "std_msgs/msg/Bool".into(),
                        serialization_format: "cdr".into(),
                        offered_qos_profiles: QosProfilesField::List(vec![]),
                        type_description_hash: Some(String::new()),
                    },
                }],
                files: vec![],
                custom_data: Some(BTreeMap::new()),
                ros_distro: Some("rosbags".into()),
            },
        }
    }

    #[test]
    fn yaml_uses_rosbag2_key_names() {
        let yaml = sample().to_yaml().unwrap();
        assert!(yaml.starts_with("rosbag2_bagfile_information:\n"));
        assert!(yaml.contains("type: std_msgs/msg/Bool"));
        assert!(yaml.contains("offered_qos_profiles: []"));
        assert!(yaml.contains("ros_distro: rosbags"));
    }

    #[test]
    fn older_text_qos_parses() {
        let mut meta = sample();
        let yaml = sample().to_yaml().unwrap().replace("offered_qos_profiles: []", "offered_qos_profiles: ''");
        meta.rosbag2_bagfile_information.topics_with_message_count[0]
            .topic_metadata
            .offered_qos_profiles = QosProfilesField::Text(String::new());
        assert_eq!(BagMetadata::from_yaml(&yaml).unwrap(), meta);
    }

    #[test]
    fn topic_counts_follow_metadata_order() {
        assert_eq!(sample().topic_counts(), vec![("/test/std_msgs/bool", "std_msgs/msg/Bool", 2)]);
    }
}
