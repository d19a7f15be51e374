use std::path::PathBuf;

use bagforge_api::error::PluginError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("cannot synthesize {type_name}: {reason}")]
    Synthesis { type_name: String, reason: String },

    #[error("metadata not found: {}", path.display())]
    MetadataNotFound { path: PathBuf },

    #[error("verification of {} failed: {reason}", bag.display())]
    Verification { bag: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl EngineError {
    pub(crate) fn synthesis(type_name: &str, reason: impl Into<String>) -> Self {
        EngineError::Synthesis { type_name: type_name.to_string(), reason: reason.into() }
    }

    /// Add context to the error.
    ///
    /// For `Plugin` variant, context is added to the inner `PluginError`.
    /// For other variants, context is prepended to the message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Plugin(e) => EngineError::Plugin(e.with_context(ctx)),
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            EngineError::Synthesis { type_name, reason } => EngineError::Synthesis {
                type_name,
                reason: format!("{ctx}: {reason}"),
            },
            EngineError::Verification { bag, reason } => EngineError::Verification {
                bag,
                reason: format!("{ctx}: {reason}"),
            },
            other => other,
        }
    }

    /// Errors that skip one step of one artifact instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::MetadataNotFound { .. } | EngineError::Verification { .. })
    }
}

#[cfg(test)]
mod tests {
    use bagforge_api::error::ErrorKind;

    use super::*;

    #[test]
    fn context_reaches_inner_plugin_error() {
        let err: EngineError = PluginError::unknown_type("std_msgs/msg/Nope").into();
        match err.with_context("sqlite3") {
            EngineError::Plugin(e) => {
                assert_eq!(e.kind, ErrorKind::UnknownType);
                assert!(e.message.starts_with("sqlite3: "));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_skip_errors_are_recoverable() {
        assert!(EngineError::MetadataNotFound { path: "m.yaml".into() }.is_recoverable());
        assert!(EngineError::Verification { bag: "b".into(), reason: "exit 1".into() }.is_recoverable());
        assert!(!EngineError::synthesis("std_msgs/msg/Bool", "bad").is_recoverable());
        assert!(!EngineError::Plugin(PluginError::non_monotonic(1, 2)).is_recoverable());
    }
}
