//! Rewrites a bag's `metadata.yaml` to an older format version so older
//! rosbag2 readers accept it.

use std::path::Path;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::EngineError;

/// Result of one downgrade call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DowngradeOutcome {
    Rewritten { from: u32, to: u32 },
    /// Version already at or below the target; file left alone.
    AlreadyAtOrBelow { version: u32 },
    /// Document has no recognizable bag information; file left alone.
    Untouched,
}

/// Downgrade the metadata file at `path` in place.
///
/// The file is rewritten only when its version is above `target`, so a second
/// call with the same target leaves it byte-identical.
pub fn downgrade(path: &Path, target: u32) -> Result<DowngradeOutcome, EngineError> {
    if !path.is_file() {
        return Err(EngineError::MetadataNotFound { path: path.to_path_buf() });
    }
    let text = std::fs::read_to_string(path)?;
    let mut doc: Value = serde_yaml::from_str(&text)?;

    let outcome = downgrade_value(&mut doc, target)?;
    match outcome {
        DowngradeOutcome::Rewritten { from, to } => {
            std::fs::write(path, serde_yaml::to_string(&doc)?)?;
            tracing::info!(path = %path.display(), from, to, "metadata downgraded");
        }
        DowngradeOutcome::AlreadyAtOrBelow { version } => {
            tracing::debug!(path = %path.display(), version, target, "metadata already compatible");
        }
        DowngradeOutcome::Untouched => {
            tracing::warn!(path = %path.display(), "metadata has no bag information, left as is");
        }
    }
    Ok(outcome)
}

/// Downgrade a parsed metadata document.
///
/// Keys introduced after `target` are removed and every topic's
/// `offered_qos_profiles` is narrowed to the flat text form: an empty list
/// becomes `''`, a non-empty one its YAML text.
pub fn downgrade_value(doc: &mut Value, target: u32) -> Result<DowngradeOutcome, EngineError> {
    let Some(info) = doc
        .get_mut("rosbag2_bagfile_information")
        .and_then(Value::as_mapping_mut)
    else {
        return Ok(DowngradeOutcome::Untouched);
    };
    let Some(version) = info
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
    else {
        return Ok(DowngradeOutcome::Untouched);
    };
    if version <= target {
        return Ok(DowngradeOutcome::AlreadyAtOrBelow { version });
    }

    info.insert("version".into(), Value::from(target));
    if target < 8 {
        info.remove("ros_distro");
    }
    if target < 6 {
        info.remove("custom_data");
    }
    if target < 5 {
        info.remove("files");
    }

    if let Some(topics) = info
        .get_mut("topics_with_message_count")
        .and_then(Value::as_sequence_mut)
    {
        for topic in topics.iter_mut() {
            if let Some(meta) = topic.get_mut("topic_metadata").and_then(Value::as_mapping_mut) {
                downgrade_topic(meta, target)?;
            }
        }
    }

    Ok(DowngradeOutcome::Rewritten { from: version, to: target })
}

fn downgrade_topic(meta: &mut Mapping, target: u32) -> Result<(), EngineError> {
    if target < 7 {
        meta.remove("type_description_hash");
    }
    if let Some(qos) = meta.get_mut("offered_qos_profiles") {
        if let Value::Sequence(profiles) = qos {
            let text = if profiles.is_empty() {
                String::new()
            } else {
                serde_yaml::to_string(&*profiles)?.trim_end().to_string()
            };
            *qos = Value::String(text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const V8: &str = "\
rosbag2_bagfile_information:
  version: 8
  storage_identifier: sqlite3
  relative_file_paths:
  - bag.db3
  duration:
    nanoseconds: 100000000
  starting_time:
    nanoseconds_since_epoch: 1
  message_count: 2
  compression_format: ''
  compression_mode: ''
  topics_with_message_count:
  - message_count: 2
    topic_metadata:
      name: /test/std_msgs/bool
      type: std_msgs/msg/Bool
      serialization_format: cdr
      offered_qos_profiles: []
      type_description_hash: ''
  - message_count: 0
    topic_metadata:
      name: /qos
      type: std_msgs/msg/Empty
      serialization_format: cdr
      offered_qos_profiles:
      - history: keep_last
        depth: 10
  files:
  - path: bag.db3
    starting_time:
      nanoseconds_since_epoch: 1
    duration:
      nanoseconds: 100000000
    message_count: 2
  custom_data: {}
  ros_distro: rosbags
";

    fn info(doc: &Value) -> &Value {
        &doc["rosbag2_bagfile_information"]
    }

    #[test]
    fn v8_to_v5_drops_newer_keys_and_flattens_qos() {
        let mut doc: Value = serde_yaml::from_str(V8).unwrap();
        let outcome = downgrade_value(&mut doc, 5).unwrap();
        assert_eq!(outcome, DowngradeOutcome::Rewritten { from: 8, to: 5 });

        let info = info(&doc);
        assert_eq!(info["version"].as_u64(), Some(5));
        assert!(info.get("ros_distro").is_none());
        assert!(info.get("custom_data").is_none());
        assert!(info.get("files").is_some());

        let first = &info["topics_with_message_count"][0]["topic_metadata"];
        assert_eq!(first["offered_qos_profiles"].as_str(), Some(""));
        assert!(first.get("type_description_hash").is_none());

        let second = &info["topics_with_message_count"][1]["topic_metadata"];
        let text = second["offered_qos_profiles"].as_str().unwrap();
        assert!(text.starts_with("- history: keep_last"), "{text}");
    }

    #[test]
    fn downgrade_is_idempotent_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("metadata.yaml");
        std::fs::write(&path, V8).unwrap();

        assert_eq!(downgrade(&path, 5).unwrap(), DowngradeOutcome::Rewritten { from: 8, to: 5 });
        let once = std::fs::read(&path).unwrap();
        assert_eq!(downgrade(&path, 5).unwrap(), DowngradeOutcome::AlreadyAtOrBelow { version: 5 });
        assert_eq!(std::fs::read(&path).unwrap(), once);
    }

    #[test]
    fn intermediate_target_keeps_keys_it_knows() {
        let mut doc: Value = serde_yaml::from_str(V8).unwrap();
        downgrade_value(&mut doc, 7).unwrap();
        let info = info(&doc);
        assert!(info.get("ros_distro").is_none());
        assert!(info.get("custom_data").is_some());
        assert!(info["topics_with_message_count"][0]["topic_metadata"].get("type_description_hash").is_some());
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = downgrade(&tmp.path().join("metadata.yaml"), 5).unwrap_err();
        assert!(matches!(err, EngineError::MetadataNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn foreign_documents_are_left_alone() {
        let mut doc: Value = serde_yaml::from_str("other: 1").unwrap();
        assert_eq!(downgrade_value(&mut doc, 5).unwrap(), DowngradeOutcome::Untouched);
    }
}
