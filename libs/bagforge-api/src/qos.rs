use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// QoS profile offered by a recorded publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosProfile {
    pub history: QosHistory,
    /// Queue depth for `keep_last`.
    pub depth: u32,
    pub reliability: QosReliability,
    pub durability: QosDurability,
    pub deadline: QosTime,
    pub lifespan: QosTime,
    pub liveliness: QosLiveliness,
    pub liveliness_lease_duration: QosTime,
    pub avoid_ros_namespace_conventions: bool,
}

impl QosProfile {
    /// The profile a default ROS 2 publisher offers.
    pub fn default_offer() -> Self {
        Self {
            history: QosHistory::KeepLast,
            depth: 10,
            reliability: QosReliability::Reliable,
            durability: QosDurability::Volatile,
            deadline: QosTime::default(),
            lifespan: QosTime::default(),
            liveliness: QosLiveliness::Automatic,
            liveliness_lease_duration: QosTime::default(),
            avoid_ros_namespace_conventions: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosHistory {
    SystemDefault,
    KeepLast,
    KeepAll,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosReliability {
    SystemDefault,
    Reliable,
    BestEffort,
    Unknown,
    BestAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosDurability {
    SystemDefault,
    TransientLocal,
    Volatile,
    Unknown,
    BestAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosLiveliness {
    SystemDefault,
    Automatic,
    ManualByNode,
    ManualByTopic,
    Unknown,
    BestAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QosTime {
    pub sec: i32,
    pub nsec: u32,
}

/// Flat YAML text of a profile list, as stored in the `topics` table and in
/// MCAP channel metadata. An empty list is an empty string.
pub fn profiles_to_yaml(profiles: &[QosProfile]) -> Result<String, PluginError> {
    if profiles.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_yaml::to_string(profiles)?.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_list_is_empty_text() {
        assert_eq!(profiles_to_yaml(&[]).unwrap(), "");
    }

    #[test]
    fn default_offer_serializes_snake_case_policies() {
        let yaml = profiles_to_yaml(&[QosProfile::default_offer()]).unwrap();
        assert!(yaml.starts_with("- history: keep_last\n"));
        assert!(yaml.contains("reliability: reliable"));
        assert!(yaml.contains("durability: volatile"));
        assert!(!yaml.ends_with('\n'));

        let back: Vec<QosProfile> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, vec![QosProfile::default_offer()]);
    }
}
