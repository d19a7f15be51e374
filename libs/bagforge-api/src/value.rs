use crate::schema::{Primitive, TypeDescriptor};

/// Canonical in-memory value of one field.
///
/// Scalars carry their declared width so the encoder never guesses;
/// `Array` covers fixed arrays and sequences alike, the descriptor decides.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Char(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),

    Message(Message),
    Array(Vec<Value>),
}

impl Value {
    /// Primitive this scalar value carries, `None` for messages and arrays.
    pub fn primitive(&self) -> Option<Primitive> {
        let p = match self {
            Value::Bool(_) => Primitive::Bool,
            Value::Byte(_) => Primitive::Byte,
            Value::Char(_) => Primitive::Char,
            Value::Int8(_) => Primitive::Int8,
            Value::UInt8(_) => Primitive::UInt8,
            Value::Int16(_) => Primitive::Int16,
            Value::UInt16(_) => Primitive::UInt16,
            Value::Int32(_) => Primitive::Int32,
            Value::UInt32(_) => Primitive::UInt32,
            Value::Int64(_) => Primitive::Int64,
            Value::UInt64(_) => Primitive::UInt64,
            Value::Float32(_) => Primitive::Float32,
            Value::Float64(_) => Primitive::Float64,
            Value::String(_) => Primitive::String,
            Value::Message(_) | Value::Array(_) => return None,
        };
        Some(p)
    }

    /// Short shape name for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Message(_) => "message",
            Value::Array(_) => "array",
            other => other.primitive().map(Primitive::name).unwrap_or("value"),
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Fully populated instance of a registered type.
///
/// Positional: `fields[i]` belongs to `TypeDescriptor.fields[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub type_name: String,
    pub fields: Vec<Value>,
}

impl Message {
    pub fn new(type_name: impl Into<String>, fields: Vec<Value>) -> Self {
        Self { type_name: type_name.into(), fields }
    }

    /// Field value by name, resolved through the descriptor.
    pub fn field<'a>(&'a self, desc: &TypeDescriptor, name: &str) -> Option<&'a Value> {
        desc.field_index(name).and_then(|i| self.fields.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_report_their_primitive() {
        assert_eq!(Value::UInt64(u64::MAX).primitive(), Some(Primitive::UInt64));
        assert_eq!(Value::Char(b'A').shape(), "char");
        assert_eq!(Value::Array(vec![]).primitive(), None);
        assert_eq!(Value::Message(Message::new("std_msgs/msg/Empty", vec![])).shape(), "message");
    }
}
