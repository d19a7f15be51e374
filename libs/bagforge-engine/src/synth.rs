use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bagforge_api::schema::{Arity, FieldDescriptor, FieldKind, Primitive, Registry, TypeDescriptor};
use bagforge_api::value::{Message, Value};

use crate::config::UnruledPolicy;
use crate::error::EngineError;
use crate::rules::{self, Literal, Override};

const TIME_TYPE: &str = "builtin_interfaces/msg/Time";
const NANOS_PER_SEC: u64 = 1_000_000_000;
/// Elements in a synthesized variable-length sequence.
const SEQUENCE_LEN: usize = 3;
const COVARIANCE_FILL: f64 = 0.01;

// ═══════════════════════════════════════════════════════════════
//  Clock
// ═══════════════════════════════════════════════════════════════

/// Source of "now" for header stamps and the base record timestamp.
pub trait Clock: Send + Sync {
    /// Nanoseconds since the Unix epoch.
    fn now_ns(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ns(&self) -> u64 {
        self.0
    }
}

// ═══════════════════════════════════════════════════════════════
//  Synthesizer
// ═══════════════════════════════════════════════════════════════

/// Builds one fully populated instance per registered type.
///
/// Field resolution order: overrides from the enclosing rule, the type's own
/// rule, the declared `.msg` default, then the shape-category default.
pub struct Synthesizer {
    registry: Arc<Registry>,
    clock: Arc<dyn Clock>,
    unruled: UnruledPolicy,
}

impl Synthesizer {
    pub fn new(registry: Arc<Registry>, clock: Arc<dyn Clock>, unruled: UnruledPolicy) -> Self {
        Self { registry, clock, unruled }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether `type_name` belongs in the corpus under the unruled-type policy.
    pub fn admit(&self, type_name: &str) -> Result<bool, EngineError> {
        self.registry.lookup(type_name)?;
        if rules::rule_for(type_name).is_some() {
            return Ok(true);
        }
        match self.unruled {
            UnruledPolicy::Defaults => {
                tracing::warn!(type_name, "no sample rule, filling from shape defaults");
                Ok(true)
            }
            UnruledPolicy::Skip => {
                tracing::warn!(type_name, "no sample rule, skipping type");
                Ok(false)
            }
            UnruledPolicy::Fail => Err(EngineError::synthesis(type_name, "no sample rule")),
        }
    }

    pub fn synthesize(&self, type_name: &str) -> Result<Message, EngineError> {
        let desc = self.registry.lookup(type_name)?;
        self.build(desc, &[], 0)
    }

    fn build(
        &self,
        desc: &TypeDescriptor,
        overrides: &[Override],
        ordinal: usize,
    ) -> Result<Message, EngineError> {
        let own = rules::rule_for(&desc.name).map(|r| r.fields).unwrap_or_default();

        let mut fields = Vec::with_capacity(desc.fields.len());
        for field in &desc.fields {
            let literal = rules::find(overrides, &field.name).or_else(|| rules::find(own, &field.name));
            let value = match literal {
                Some(lit) => self.from_literal(field, lit),
                None => self.from_shape(field, ordinal),
            }
            .map_err(|e| attribute(e, &desc.name, &field.name))?;
            fields.push(value);
        }
        Ok(Message::new(desc.name.clone(), fields))
    }

    fn nested(&self, name: &str) -> Result<&TypeDescriptor, EngineError> {
        Ok(self.registry.lookup(name)?)
    }

    // ── rule literals ──────────────────────────────────────────

    fn from_literal(&self, field: &FieldDescriptor, lit: Literal) -> Result<Value, EngineError> {
        match (&field.kind, field.arity) {
            (FieldKind::Nested(name), Arity::Single) => {
                let desc = self.nested(name)?;
                match lit {
                    Literal::Struct(overrides) => Ok(Value::Message(self.build(desc, overrides, 0)?)),
                    Literal::Now if desc.name == TIME_TYPE => Ok(Value::Message(self.now())),
                    other => Err(mismatch(other, name)),
                }
            }
            (FieldKind::Nested(name), arity) => {
                let Literal::Structs(blocks) = lit else {
                    return Err(mismatch(lit, name));
                };
                let desc = self.nested(name)?;
                let items = blocks
                    .iter()
                    .enumerate()
                    .map(|(i, block)| self.build(desc, block, i).map(Value::Message))
                    .collect::<Result<Vec<_>, _>>()?;
                check_len(arity, items.len())?;
                Ok(Value::Array(items))
            }
            (FieldKind::Primitive(p), Arity::Single) => scalar(*p, lit),
            (FieldKind::Primitive(p), arity) => {
                let items = match lit {
                    Literal::Ints(xs) => xs.iter().map(|x| coerce_int(*p, *x)).collect::<Result<Vec<_>, _>>()?,
                    Literal::Floats(xs) => xs.iter().map(|x| coerce_float(*p, *x)).collect::<Result<Vec<_>, _>>()?,
                    Literal::Strs(xs) => xs.iter().map(|x| scalar(*p, Literal::Str(*x))).collect::<Result<Vec<_>, _>>()?,
Literal::Fill(v) => match arity {
                        Arity::Array(n) => vec![coerce_float(*p, v)?; n],
                        _ => return Err(EngineError::synthesis("", "fill needs a fixed-length array")),
                    },
                    other => return Err(mismatch(other, &format!("{p}[]"))),
                };
                check_len(arity, items.len())?;
                Ok(Value::Array(items))
            }
        }
    }

    fn now(&self) -> Message {
        let ns = self.clock.now_ns();
        let sec = i32::try_from(ns / NANOS_PER_SEC).unwrap_or(i32::MAX);
        // always < 1e9
        let nanosec = (ns % NANOS_PER_SEC) as u32;
        Message::new(TIME_TYPE, vec![Value::Int32(sec), Value::UInt32(nanosec)])
    }

    // ── shape-category defaults ────────────────────────────────

    fn from_shape(&self, field: &FieldDescriptor, ordinal: usize) -> Result<Value, EngineError> {
        if let Some(text) = &field.default {
            if let FieldKind::Primitive(p) = field.kind {
                return declared_default(p, field.arity, text);
            }
        }

        match (&field.kind, field.arity) {
            (FieldKind::Nested(name), Arity::Single) => {
                Ok(Value::Message(self.build(self.nested(name)?, &[], ordinal)?))
            }
            (FieldKind::Nested(name), arity) => {
                let desc = self.nested(name)?;
                let items = (0..default_len(arity))
                    .map(|i| self.build(desc, &[], ordinal + i).map(Value::Message))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(items))
            }
            (FieldKind::Primitive(p), Arity::Single) => category_default(*p, ordinal, false),
            (FieldKind::Primitive(Primitive::Float64), Arity::Array(n @ (9 | 36))) => {
                Ok(Value::Array(vec![Value::Float64(COVARIANCE_FILL); n]))
            }
            (FieldKind::Primitive(p), arity) => {
                let len = match (p, arity) {
                    // two distinct booleans at most
                    (Primitive::Bool, Arity::Sequence | Arity::BoundedSequence(_)) => default_len(arity).min(2),
                    _ => default_len(arity),
                };
                let items = (0..len)
                    .map(|i| category_default(*p, ordinal + i, true))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(items))
            }
        }
    }
}

/// Pin a field-level error on the type being built. Errors raised while
/// building a nested type already carry that type.
fn attribute(e: EngineError, type_name: &str, field: &str) -> EngineError {
    match e {
        EngineError::Synthesis { type_name: t, reason } if t.is_empty() => {
            EngineError::synthesis(type_name, format!("field {field}: {reason}"))
        }
        other => other.with_context(format_args!("{type_name}.{field}")),
    }
}

fn default_len(arity: Arity) -> usize {
    match arity {
        Arity::Single => 1,
        Arity::Array(n) => n,
        Arity::Sequence => SEQUENCE_LEN,
        Arity::BoundedSequence(n) => n.min(SEQUENCE_LEN),
    }
}

fn category_default(p: Primitive, i: usize, in_collection: bool) -> Result<Value, EngineError> {
    let offset = i64::try_from(i).map_err(|_| EngineError::synthesis("", "element index overflow"))?;
    let base: i64 = match p {
        Primitive::Bool => return Ok(Value::Bool(i % 2 == 0)),
        Primitive::Float32 => return coerce_float(p, 1.5 + offset as f64),
        Primitive::Float64 => return coerce_float(p, 2.5 + offset as f64),
        Primitive::String => {
            let text = if in_collection || i > 0 { format!("sample_{i}") } else { "sample".to_string() };
            return Ok(Value::String(text));
        }
        Primitive::Byte => 42,
        Primitive::Char => 65,
        Primitive::Int8 => -8,
        Primitive::UInt8 => 8,
        Primitive::Int16 => -16,
        Primitive::UInt16 => 16,
        Primitive::Int32 => -32,
        Primitive::UInt32 => 32,
        Primitive::Int64 => -64,
        Primitive::UInt64 => 64,
    };
    coerce_int(p, base + offset)
}

/// Value from a `.msg` default such as `float64 w 1` or `int32[] xs [1, 2]`.
fn declared_default(p: Primitive, arity: Arity, text: &str) -> Result<Value, EngineError> {
    if arity == Arity::Single {
        return parse_scalar(p, text);
    }
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| EngineError::synthesis("", format!("malformed array default {text}")))?;
    let items = inner
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| parse_scalar(p, t))
        .collect::<Result<Vec<_>, _>>()?;
    check_len(arity, items.len())?;
    Ok(Value::Array(items))
}

fn parse_scalar(p: Primitive, text: &str) -> Result<Value, EngineError> {
    let bad = || EngineError::synthesis("", format!("cannot read {text:?} as {p}"));
    match p {
        Primitive::Bool => match text {
            "true" | "True" | "1" => Ok(Value::Bool(true)),
            "false" | "False" | "0" => Ok(Value::Bool(false)),
            _ => Err(bad()),
        },
        Primitive::String => Ok(Value::String(text.trim_matches(|c| c == '"' || c == '\'').to_string())),
        Primitive::Float32 | Primitive::Float64 => coerce_float(p, text.parse().map_err(|_| bad())?),
        Primitive::UInt64 => coerce_uint(p, text.parse().map_err(|_| bad())?),
        _ => coerce_int(p, text.parse().map_err(|_| bad())?),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Coercion
// ═══════════════════════════════════════════════════════════════

fn scalar(p: Primitive, lit: Literal) -> Result<Value, EngineError> {
    match (p, lit) {
        (Primitive::Bool, Literal::Bool(v)) => Ok(Value::Bool(v)),
        (Primitive::String, Literal::Str(s)) => Ok(Value::String(s.to_string())),
        (_, Literal::Int(v)) => coerce_int(p, v),
        (_, Literal::UInt(v)) => coerce_uint(p, v),
        (_, Literal::Float(v)) => coerce_float(p, v),
        (_, other) => Err(mismatch(other, p.name())),
    }
}

fn coerce_int(p: Primitive, v: i64) -> Result<Value, EngineError> {
    let range = |_| EngineError::synthesis("", format!("{v} out of range for {p}"));
    Ok(match p {
        Primitive::Byte => Value::Byte(u8::try_from(v).map_err(range)?),
        Primitive::Char => Value::Char(u8::try_from(v).map_err(range)?),
        Primitive::Int8 => Value::Int8(i8::try_from(v).map_err(range)?),
        Primitive::UInt8 => Value::UInt8(u8::try_from(v).map_err(range)?),
        Primitive::Int16 => Value::Int16(i16::try_from(v).map_err(range)?),
        Primitive::UInt16 => Value::UInt16(u16::try_from(v).map_err(range)?),
        Primitive::Int32 => Value::Int32(i32::try_from(v).map_err(range)?),
        Primitive::UInt32 => Value::UInt32(u32::try_from(v).map_err(range)?),
        Primitive::Int64 => Value::Int64(v),
        Primitive::UInt64 => Value::UInt64(u64::try_from(v).map_err(range)?),
        Primitive::Float32 | Primitive::Float64 => return coerce_float(p, v as f64),
        Primitive::Bool | Primitive::String => return Err(mismatch(Literal::Int(v), p.name())),
    })
}

fn coerce_uint(p: Primitive, v: u64) -> Result<Value, EngineError> {
    match p {
        Primitive::UInt64 => Ok(Value::UInt64(v)),
        _ => {
            let v = i64::try_from(v)
                .map_err(|_| EngineError::synthesis("", format!("{v} out of range for {p}")))?;
            coerce_int(p, v)
        }
    }
}

fn coerce_float(p: Primitive, v: f64) -> Result<Value, EngineError> {
    match p {
        Primitive::Float32 => Ok(Value::Float32(v as f32)),
        Primitive::Float64 => Ok(Value::Float64(v)),
        _ => Err(mismatch(Literal::Float(v), p.name())),
    }
}

fn check_len(arity: Arity, len: usize) -> Result<(), EngineError> {
    match arity {
        Arity::Array(n) if n != len => {
            Err(EngineError::synthesis("", format!("fixed array expects {n} elements, rule gives {len}")))
        }
        Arity::BoundedSequence(n) if len > n => {
            Err(EngineError::synthesis("", format!("bounded sequence allows {n} elements, rule gives {len}")))
        }
        _ => Ok(()),
    }
}

fn mismatch(lit: Literal, target: &str) -> EngineError {
    EngineError::synthesis("", format!("literal {lit:?} does not fit {target}"))
}

#[cfg(test)]
mod tests {
    use bagforge_api::schema::CatalogEntry;

    use super::*;
    use crate::catalog::humble_registry;

    const NOW: u64 = 1_700_000_000_123_456_789;

    fn synth(policy: UnruledPolicy) -> Synthesizer {
        Synthesizer::new(Arc::new(humble_registry().unwrap()), Arc::new(FixedClock(NOW)), policy)
    }

    fn field<'a>(synth: &Synthesizer, msg: &'a Message, name: &str) -> &'a Value {
        let desc = synth.registry().lookup(&msg.type_name).unwrap();
        msg.field(desc, name).unwrap()
    }

    fn xyz(synth: &Synthesizer, value: &Value) -> (f64, f64, f64) {
        let msg = value.as_message().unwrap();
        let get = |n| match field(synth, msg, n) {
            Value::Float64(v) => *v,
            other => panic!("{other:?}"),
        };
        (get("x"), get("y"), get("z"))
    }

    #[test]
    fn header_stamp_comes_from_clock() {
        let s = synth(UnruledPolicy::Fail);
        let header = s.synthesize("std_msgs/msg/Header").unwrap();
        let stamp = field(&s, &header, "stamp").as_message().unwrap();
        assert_eq!(stamp.fields, vec![Value::Int32(1_700_000_000), Value::UInt32(123_456_789)]);
        assert_eq!(field(&s, &header, "frame_id"), &Value::String("test_frame".into()));
    }

    #[test]
    fn parent_overrides_beat_nested_rules() {
        let s = synth(UnruledPolicy::Fail);
        let twist = s.synthesize("geometry_msgs/msg/Twist").unwrap();
        assert_eq!(xyz(&s, field(&s, &twist, "linear")), (1.0, 0.0, 0.0));
        let vector = s.synthesize("geometry_msgs/msg/Vector3").unwrap();
        assert_eq!(xyz(&s, &Value::Message(vector)), (0.1, 0.2, 0.3));

        let odom = s.synthesize("nav_msgs/msg/Odometry").unwrap();
        let twist = field(&s, field(&s, &odom, "twist").as_message().unwrap(), "twist");
        let twist = twist.as_message().unwrap();
        assert_eq!(xyz(&s, field(&s, twist, "linear")), (1.0, 0.0, 0.0));
        assert_eq!(xyz(&s, field(&s, twist, "angular")), (0.0, 0.0, 0.1));
    }

    #[test]
    fn covariance_and_sequences_have_declared_lengths() {
        let s = synth(UnruledPolicy::Fail);
        let pose = s.synthesize("geometry_msgs/msg/PoseWithCovariance").unwrap();
        assert_eq!(field(&s, &pose, "covariance"), &Value::Array(vec![Value::Float64(0.1); 36]));

        let image = s.synthesize("sensor_msgs/msg/Image").unwrap();
        assert_eq!(
            field(&s, &image, "data"),
            &Value::Array(vec![Value::UInt8(255), Value::UInt8(128), Value::UInt8(0)])
        );
        assert_eq!(field(&s, &image, "step"), &Value::UInt32(3));

        let grid = s.synthesize("nav_msgs/msg/OccupancyGrid").unwrap();
        let data = field(&s, &grid, "data").as_array().unwrap();
        let info = field(&s, &grid, "info").as_message().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(field(&s, info, "width"), &Value::UInt32(2));
        assert_eq!(field(&s, info, "height"), &Value::UInt32(2));
    }

    #[test]
    fn boundary_values_survive_coercion() {
        let s = synth(UnruledPolicy::Fail);
        let max = s.synthesize("std_msgs/msg/UInt64").unwrap();
        assert_eq!(max.fields, vec![Value::UInt64(u64::MAX)]);
        let min = s.synthesize("std_msgs/msg/Int64").unwrap();
        assert_eq!(min.fields, vec![Value::Int64(-10_000_000_000)]);
        let c = s.synthesize("std_msgs/msg/Char").unwrap();
        assert_eq!(c.fields, vec![Value::Char(b'A')]);
    }

    #[test]
    fn out_of_range_literal_names_type_and_field() {
        assert!(matches!(coerce_int(Primitive::UInt8, 256), Err(EngineError::Synthesis { .. })));
        assert!(matches!(coerce_int(Primitive::Int8, -129), Err(EngineError::Synthesis { .. })));
        assert!(coerce_uint(Primitive::UInt32, u64::MAX).is_err());
        assert_eq!(coerce_int(Primitive::Int8, -128).unwrap(), Value::Int8(-128));
    }

    const UNRULED: &[CatalogEntry] = &[
        CatalogEntry {
            name: "demo_msgs/msg/Gauge",
            topic: Some("/test/demo_msgs/gauge"),
            definition: "bool ok\nuint8 level\nint16[] history\nstring[] tags\nfloat64[9] cov\nfloat32 gain 2.0\nInner[2] parts\nbool[] flags\n",
        },
        CatalogEntry {
            name: "demo_msgs/msg/Inner",
            topic: None,
            definition: "int32 id\n",
        },
    ];

    #[test]
    fn unruled_types_follow_policy_and_shape_defaults() {
        let registry = Arc::new(Registry::from_catalog(UNRULED).unwrap());
        let make = |policy| Synthesizer::new(registry.clone(), Arc::new(FixedClock(NOW)), policy);

        assert!(make(UnruledPolicy::Defaults).admit("demo_msgs/msg/Gauge").unwrap());
        assert!(!make(UnruledPolicy::Skip).admit("demo_msgs/msg/Gauge").unwrap());
        let err = make(UnruledPolicy::Fail).admit("demo_msgs/msg/Gauge").unwrap_err();
        assert!(matches!(err, EngineError::Synthesis { ref type_name, .. } if type_name == "demo_msgs/msg/Gauge"));

        let gauge = make(UnruledPolicy::Defaults).synthesize("demo_msgs/msg/Gauge").unwrap();
        assert_eq!(gauge.fields[0], Value::Bool(true));
        assert_eq!(gauge.fields[1], Value::UInt8(8));
        assert_eq!(
            gauge.fields[2],
            Value::Array(vec![Value::Int16(-16), Value::Int16(-15), Value::Int16(-14)])
        );
        assert_eq!(
            gauge.fields[3],
            Value::Array(vec![
                Value::String("sample_0".into()),
                Value::String("sample_1".into()),
                Value::String("sample_2".into()),
            ])
        );
        assert_eq!(gauge.fields[4], Value::Array(vec![Value::Float64(0.01); 9]));
        assert_eq!(gauge.fields[5], Value::Float32(2.0));
        let parts = gauge.fields[6].as_array().unwrap();
        assert_eq!(parts[0].as_message().unwrap().fields, vec![Value::Int32(-32)]);
        assert_eq!(parts[1].as_message().unwrap().fields, vec![Value::Int32(-31)]);
        assert_eq!(gauge.fields[7], Value::Array(vec![Value::Bool(true), Value::Bool(false)]));
    }

    #[test]
    fn unknown_type_is_a_plugin_error() {
        let s = synth(UnruledPolicy::Defaults);
        assert!(matches!(s.synthesize("std_msgs/msg/Nope"), Err(EngineError::Plugin(_))));
        assert!(matches!(s.admit("std_msgs/msg/Nope"), Err(EngineError::Plugin(_))));
    }
}
