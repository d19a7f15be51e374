use crate::qos::QosProfile;

/// Binds a topic and a registered type to a writer-assigned id.
///
/// Created once per `(topic, type)` before any write; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Assigned sequentially from 1 by the writer.
    pub id: u32,
    pub topic: String,
    pub type_name: String,
    /// Always `cdr` for this generator.
    pub serialization_format: String,
    pub offered_qos_profiles: Vec<QosProfile>,
    /// Empty when unknown.
    pub type_description_hash: String,
    /// `ros2msg` text of the type and its dependencies.
    pub message_definition: String,
}

/// One encoded record appended to a backend.
/// `data` is opaque bytes; backends never interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct BagRecord {
    pub connection_id: u32,
    /// Nanoseconds since the epoch. Strictly increasing per writer.
    pub timestamp: u64,
    pub data: Vec<u8>,
}
