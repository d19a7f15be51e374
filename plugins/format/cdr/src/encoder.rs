use bagforge_api::error::PluginError;
use bagforge_api::format::MessageEncoder;
use bagforge_api::schema::{Arity, FieldDescriptor, FieldKind, Primitive, Registry, TypeDescriptor};
use bagforge_api::value::{Message, Value};

use super::config::{ByteOrder, CdrConfig};
use super::writer::CdrWriter;

// ═══════════════════════════════════════════════════════════════
//  CdrEncoder
// ═══════════════════════════════════════════════════════════════

/// XCDR1 plain encoder for registered ROS 2 message types.
#[derive(Debug, Clone, Default)]
pub struct CdrEncoder {
    order: ByteOrder,
}

impl CdrEncoder {
    pub fn new(config: &CdrConfig) -> Self {
        Self { order: config.byte_order }
    }

    pub fn little_endian() -> Self {
        Self { order: ByteOrder::Little }
    }
}

impl MessageEncoder for CdrEncoder {
    fn format_name(&self) -> &'static str {
        "cdr"
    }

    fn encode(&self, message: &Message, registry: &Registry) -> Result<Vec<u8>, PluginError> {
        let desc = registry.lookup(&message.type_name)?;
        let mut w = CdrWriter::new(self.order);
        encode_message(&mut w, message, desc, registry).map_err(|e| {
            if e.kind == bagforge_api::error::ErrorKind::Encoding {
                e.with_context(format_args!("{}; instance: {message:?}", message.type_name))
            } else {
                e
            }
        })?;
        Ok(w.into_bytes())
    }
}

fn encode_message(
    w: &mut CdrWriter,
    message: &Message,
    desc: &TypeDescriptor,
    registry: &Registry,
) -> Result<(), PluginError> {
    if message.type_name != desc.name {
        return Err(PluginError::encoding(format!(
            "expected {} instance, got {}",
            desc.name, message.type_name
        )));
    }
    if message.fields.len() != desc.fields.len() {
        return Err(PluginError::encoding(format!(
            "{} has {} fields, instance carries {}",
            desc.name,
            desc.fields.len(),
            message.fields.len()
        )));
    }

    // Empty structs still occupy one byte on the wire.
    if desc.fields.is_empty() {
        w.put_u8(0);
        return Ok(());
    }

    for (field, value) in desc.fields.iter().zip(&message.fields) {
        encode_field(w, field, value, registry)
            .map_err(|e| e.with_context(format_args!("{}.{}", desc.name, field.name)))?;
    }
    Ok(())
}

fn encode_field(
    w: &mut CdrWriter,
    field: &FieldDescriptor,
    value: &Value,
    registry: &Registry,
) -> Result<(), PluginError> {
    if field.arity == Arity::Single {
        return encode_element(w, &field.kind, value, registry);
    }

    let items = value.as_array().ok_or_else(|| {
        PluginError::encoding(format!("expected array, got {}", value.shape()))
    })?;

    match field.arity {
        Arity::Array(n) if items.len() != n => {
            return Err(PluginError::encoding(format!(
                "fixed array expects {n} elements, got {}",
                items.len()
            )));
        }
        Arity::Array(_) => {}
        Arity::BoundedSequence(n) if items.len() > n => {
            return Err(PluginError::encoding(format!(
                "bounded sequence allows {n} elements, got {}",
                items.len()
            )));
        }
        Arity::Sequence | Arity::BoundedSequence(_) => {
            let count = u32::try_from(items.len())
                .map_err(|_| PluginError::encoding("sequence too long"))?;
            w.put_u32(count);
        }
        Arity::Single => {}
    }

    for (i, item) in items.iter().enumerate() {
        encode_element(w, &field.kind, item, registry).map_err(|e| e.with_context(format_args!("[{i}]")))?;
    }
    Ok(())
}

fn encode_element(
    w: &mut CdrWriter,
    kind: &FieldKind,
    value: &Value,
    registry: &Registry,
) -> Result<(), PluginError> {
    match kind {
        FieldKind::Nested(type_name) => {
            let nested = value.as_message().ok_or_else(|| {
                PluginError::encoding(format!("expected {type_name}, got {}", value.shape()))
            })?;
            let desc = registry.lookup(type_name)?;
            encode_message(w, nested, desc, registry)
        }
        FieldKind::Primitive(p) => encode_primitive(w, *p, value),
    }
}

fn encode_primitive(w: &mut CdrWriter, p: Primitive, value: &Value) -> Result<(), PluginError> {
    match (p, value) {
        (Primitive::Bool, Value::Bool(v)) => w.put_u8(u8::from(*v)),
        (Primitive::Byte, Value::Byte(v)) | (Primitive::Char, Value::Char(v)) | (Primitive::UInt8, Value::UInt8(v)) => {
            w.put_u8(*v)
        }
        (Primitive::Int8, Value::Int8(v)) => w.put_i8(*v),
        (Primitive::Int16, Value::Int16(v)) => w.put_i16(*v),
        (Primitive::UInt16, Value::UInt16(v)) => w.put_u16(*v),
        (Primitive::Int32, Value::Int32(v)) => w.put_i32(*v),
        (Primitive::UInt32, Value::UInt32(v)) => w.put_u32(*v),
        (Primitive::Int64, Value::Int64(v)) => w.put_i64(*v),
        (Primitive::UInt64, Value::UInt64(v)) => w.put_u64(*v),
        (Primitive::Float32, Value::Float32(v)) => w.put_f32(*v),
        (Primitive::Float64, Value::Float64(v)) => w.put_f64(*v),
        (Primitive::String, Value::String(s)) => w
            .put_string(s)
            .map_err(|_| PluginError::encoding("string too long"))?,
        (p, other) => {
            return Err(PluginError::encoding(format!("expected {p}, got {}", other.shape())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bagforge_api::error::ErrorKind;
    use bagforge_api::schema::CatalogEntry;

    use super::*;

    const ENTRIES: &[CatalogEntry] = &[
        CatalogEntry {
            name: "builtin_interfaces/msg/Time",
            topic: None,
            definition: "int32 sec\nuint32 nanosec\n",
        },
        CatalogEntry {
            name: "std_msgs/msg/Header",
            topic: Some("/test/std_msgs/header"),
            definition: "builtin_interfaces/Time stamp\nstring frame_id\n",
        },
        CatalogEntry {
            name: "std_msgs/msg/Empty",
            topic: Some("/test/std_msgs/empty"),
            definition: "",
        },
        CatalogEntry {
            name: "std_msgs/msg/UInt64",
            topic: Some("/test/std_msgs/uint64"),
            definition: "uint64 data\n",
        },
        CatalogEntry {
            name: "demo_msgs/msg/Mixed",
            topic: Some("/test/demo_msgs/mixed"),
            definition: "uint8 flag\nfloat64[2] pair\nint16[] seq\nstd_msgs/Empty nothing\n",
        },
    ];

    fn registry() -> Registry {
        Registry::from_catalog(ENTRIES).unwrap()
    }

    fn encode(message: Message) -> Result<Vec<u8>, PluginError> {
        CdrEncoder::little_endian().encode(&message, &registry())
    }

    #[test]
    fn header_layout_matches_reference_bytes() {
        let msg = Message::new(
            "std_msgs/msg/Header",
            vec![
                Value::Message(Message::new(
                    "builtin_interfaces/msg/Time",
                    vec![Value::Int32(1), Value::UInt32(2)],
                )),
                Value::String("map".into()),
            ],
        );
        assert_eq!(
            encode(msg).unwrap(),
            [0, 1, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, b'm', b'a', b'p', 0]
        );
    }

    #[test]
    fn empty_message_is_one_zero_byte() {
        let msg = Message::new("std_msgs/msg/Empty", vec![]);
        assert_eq!(encode(msg).unwrap(), [0, 1, 0, 0, 0]);
    }

    #[test]
    fn u64_max_is_preserved() {
        let msg = Message::new("std_msgs/msg/UInt64", vec![Value::UInt64(u64::MAX)]);
        let bytes = encode(msg).unwrap();
        assert_eq!(&bytes[4..], &[0xff; 8]);
    }

    #[test]
    fn fixed_arrays_have_no_count_and_sequences_do() {
        let msg = Message::new(
            "demo_msgs/msg/Mixed",
            vec![
                Value::UInt8(7),
                Value::Array(vec![Value::Float64(1.0), Value::Float64(2.0)]),
                Value::Array(vec![Value::Int16(-1), Value::Int16(3)]),
                Value::Message(Message::new("std_msgs/msg/Empty", vec![])),
            ],
        );
        let bytes = encode(msg).unwrap();
        let mut expected = vec![0, 1, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0];
        expected.extend_from_slice(&1.0f64.to_le_bytes());
        expected.extend_from_slice(&2.0f64.to_le_bytes());
        expected.extend_from_slice(&[2, 0, 0, 0, 0xff, 0xff, 3, 0, 0]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn fixed_array_length_mismatch_names_type_and_instance() {
        let msg = Message::new(
            "demo_msgs/msg/Mixed",
            vec![
                Value::UInt8(7),
                Value::Array(vec![Value::Float64(1.0)]),
                Value::Array(vec![]),
                Value::Message(Message::new("std_msgs/msg/Empty", vec![])),
            ],
        );
        let err = encode(msg).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Encoding);
        assert!(err.message.contains("demo_msgs/msg/Mixed.pair"), "{}", err.message);
        assert!(err.message.contains("instance: Message"), "{}", err.message);
    }

    #[test]
    fn primitive_width_mismatch_is_rejected() {
        let msg = Message::new("std_msgs/msg/UInt64", vec![Value::Int64(1)]);
        let err = encode(msg).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Encoding);
        assert!(err.message.contains("expected uint64, got int64"));
    }

    #[test]
    fn unknown_type_is_reported_as_such() {
        let err = encode(Message::new("std_msgs/msg/Missing", vec![])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
    }
}
