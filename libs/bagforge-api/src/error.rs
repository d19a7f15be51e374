use std::fmt;

/// Error kind for plugin errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Format,
    Schema,
    /// Registry miss. Fatal for the whole run.
    UnknownType,
    /// Instance shape does not match its descriptor.
    Encoding,
    DuplicateConnection,
    UnknownConnection,
    NonMonotonicTimestamp,
}

/// Plugin error, returned by all registry, encoder and storage trait methods.
#[derive(Debug)]
pub struct PluginError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PluginError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Io, message: msg.into() }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Format, message: msg.into() }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Schema, message: msg.into() }
    }

    pub fn unknown_type(type_name: impl fmt::Display) -> Self {
        Self { kind: ErrorKind::UnknownType, message: format!("unknown type `{type_name}`") }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Encoding, message: msg.into() }
    }

    pub fn duplicate_connection(topic: &str, type_name: &str) -> Self {
        Self {
            kind: ErrorKind::DuplicateConnection,
            message: format!("connection {topic} ({type_name}) already registered"),
        }
    }

    pub fn unknown_connection(id: u32) -> Self {
        Self {
            kind: ErrorKind::UnknownConnection,
            message: format!("connection id {id} was never registered"),
        }
    }

    pub fn non_monotonic(timestamp: u64, previous: u64) -> Self {
        Self {
            kind: ErrorKind::NonMonotonicTimestamp,
            message: format!("timestamp {timestamp} is not after previous {previous}"),
        }
    }

    /// Add context to the error, preserving the original ErrorKind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PluginError {}

// ---------------------------------------------------------------------------
// From impls: standard error types → PluginError with correct ErrorKind
// ---------------------------------------------------------------------------

impl From<std::io::Error> for PluginError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<serde_yaml::Error> for PluginError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::format(e.to_string())
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(e: serde_json::Error) -> Self {
        Self::format(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for PluginError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::format(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let err = PluginError::unknown_connection(7).with_context("mcap");
        assert_eq!(err.kind, ErrorKind::UnknownConnection);
        assert_eq!(err.message, "mcap: connection id 7 was never registered");
    }

    #[test]
    fn io_errors_map_to_io_kind() {
        let err: PluginError = std::io::Error::other("disk full").into();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.to_string().starts_with("Io: "));
    }
}
