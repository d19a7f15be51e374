use crate::error::PluginError;
use crate::schema::Registry;
use crate::value::Message;

/// Message encoder: performs `Message → bytes` against the registered layout.
///
/// Side-effect free: output depends only on `(message, registry)`.
pub trait MessageEncoder: Send + Sync {
    /// Serialization format recorded per topic (`cdr`).
    fn format_name(&self) -> &'static str;

    /// Fails with `Encoding` when the instance shape does not match its
    /// descriptor, and with `UnknownType` on a registry miss.
    fn encode(&self, message: &Message, registry: &Registry) -> Result<Vec<u8>, PluginError>;
}
