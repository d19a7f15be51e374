use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::EngineError;

/// Root configuration, parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenConfig {
    /// Directory the bag directories are created in.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Bag directory name is `<bag_prefix>_<storage>`.
    #[serde(default = "default_bag_prefix")]
    pub bag_prefix: String,

    /// Storage identifiers, one artifact each.
    #[serde(default = "default_storages")]
    pub storages: Vec<String>,

    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Spacing between consecutive records.
    #[serde(default = "default_interval_ns")]
    pub interval_ns: u64,

    /// Metadata version the writer emits.
    #[serde(default = "default_native_version")]
    pub native_version: u32,

    /// Metadata version after the downgrade.
    #[serde(default = "default_target_version")]
    pub target_version: u32,

    /// Restrict the corpus to these types. `None` publishes every type.
    #[serde(default)]
    pub types: Option<Vec<String>>,

    #[serde(default)]
    pub unruled: UnruledPolicy,

    #[serde(default)]
    pub offer_default_qos: bool,

    #[serde(default)]
    pub custom_data: BTreeMap<String, String>,

    /// Passed through to the mcap storage plugin.
    #[serde(default)]
    pub mcap: Option<toml::Value>,

    /// Passed through to the sqlite3 storage plugin.
    #[serde(default)]
    pub sqlite: Option<toml::Value>,

    /// Passed through to the CDR encoder.
    #[serde(default)]
    pub cdr: Option<toml::Value>,

    #[serde(default)]
    pub verify: VerifyConfig,

    /// Write the artifacts concurrently.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// What to do with a type that has no literal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnruledPolicy {
    /// Fill from shape-category defaults and warn.
    #[default]
    Defaults,
    /// Leave the type out of the corpus and warn.
    Skip,
    /// Abort the run.
    Fail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Shell command template. `{bag}` is replaced by the quoted bag path.
    #[serde(default = "default_verify_command")]
    pub command: String,

    /// Prepended with `&&`, e.g. `. /opt/ros/humble/setup.sh`.
    #[serde(default)]
    pub setup: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_verify_command(),
            setup: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_bag_prefix() -> String {
    "test_bag".into()
}

fn default_storages() -> Vec<String> {
    vec!["sqlite3".into(), "mcap".into()]
}

fn default_repetitions() -> u32 {
    2
}

fn default_interval_ns() -> u64 {
    100_000_000
}

fn default_native_version() -> u32 {
    8
}

fn default_target_version() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_verify_command() -> String {
    "ros2 bag info {bag}".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            bag_prefix: default_bag_prefix(),
            storages: default_storages(),
            repetitions: default_repetitions(),
            interval_ns: default_interval_ns(),
            native_version: default_native_version(),
            target_version: default_target_version(),
            types: None,
            unruled: UnruledPolicy::default(),
            offer_default_qos: false,
            custom_data: BTreeMap::new(),
            mcap: None,
            sqlite: None,
            cdr: None,
            verify: VerifyConfig::default(),
            parallel: true,
        }
    }
}

impl GenConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.storages.is_empty() {
            return Err(EngineError::Config("storages must not be empty".into()));
        }
        if self.interval_ns == 0 {
            return Err(EngineError::Config("interval_ns must be positive".into()));
        }
        if self.target_version > self.native_version {
            return Err(EngineError::Config(format!(
                "target_version {} is newer than native_version {}",
                self.target_version, self.native_version
            )));
        }
        Ok(())
    }

    /// Bag directory for one storage.
    pub fn bag_dir(&self, storage: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{storage}", self.bag_prefix))
    }
}
