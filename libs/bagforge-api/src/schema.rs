use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::PluginError;

/// Fixed-width (or length-prefixed, for `string`) wire primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Byte,
    Char,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
}

impl Primitive {
    /// Parse a `.msg` primitive token. Bounded strings (`string<=N`) map to `String`.
    pub fn parse(token: &str) -> Option<Self> {
        let p = match token {
            "bool" => Self::Bool,
            "byte" => Self::Byte,
            "char" => Self::Char,
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" => Self::Int32,
            "uint32" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "string" => Self::String,
            t if t.starts_with("string<=") => Self::String,
            _ => return None,
        };
        Some(p)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
        }
    }

    /// Wire width in bytes. For `String` this is the width of its length prefix.
    pub fn size(self) -> usize {
        match self {
            Self::Bool | Self::Byte | Self::Char | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 | Self::String => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element kind of a field: a primitive or a reference to another registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(Primitive),
    /// Fully qualified type name (`pkg/msg/Type`).
    Nested(String),
}

/// Cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    /// `T[N]`: exactly N elements, no count on the wire.
    Array(usize),
    /// `T[]`
    Sequence,
    /// `T[<=N]`
    BoundedSequence(usize),
}

impl Arity {
    pub fn is_collection(self) -> bool {
        !matches!(self, Arity::Single)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub arity: Arity,
    /// Default value text from the definition (`float64 w 1`), unparsed.
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub primitive: Primitive,
    pub value: String,
}

/// Immutable description of one structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// `pkg/msg/Type`
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub constants: Vec<Constant>,
    /// Default topic path. `None` for nested-only support types.
    pub topic: Option<String>,
    /// Definition text in `.msg` syntax.
    pub definition: String,
}

impl TypeDescriptor {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Package part of the name (`geometry_msgs` for `geometry_msgs/msg/Pose`).
    pub fn package(&self) -> &str {
        self.name.split('/').next().unwrap_or_default()
    }
}

/// One static catalog row, as compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub topic: Option<&'static str>,
    pub definition: &'static str,
}

/// Registry of type shapes. Built once, never mutated, shared read-only.
#[derive(Debug, Clone)]
pub struct Registry {
    types: HashMap<String, TypeDescriptor>,
    /// Catalog order; published order follows it.
    order: Vec<String>,
}

const DEFINITION_SEPARATOR: &str =
    "================================================================================";

impl Registry {
    /// Parse every catalog entry and check that all nested references resolve.
    pub fn from_catalog(entries: &[CatalogEntry]) -> Result<Self, PluginError> {
        let mut types = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());

        for entry in entries {
            let desc = parse_definition(entry.name, entry.topic, entry.definition)
                .map_err(|e| e.with_context(entry.name))?;
            if types.insert(entry.name.to_string(), desc).is_some() {
                return Err(PluginError::schema(format!("type {} registered twice", entry.name)));
            }
            order.push(entry.name.to_string());
        }

        for name in &order {
            let desc = &types[name];
            for field in &desc.fields {
                if let FieldKind::Nested(target) = &field.kind {
                    if !types.contains_key(target) {
                        return Err(PluginError::schema(format!(
                            "{name}.{}: unresolved reference {target}",
                            field.name
                        )));
                    }
                }
            }
        }

        Ok(Self { types, order })
    }

    pub fn lookup(&self, name: &str) -> Result<&TypeDescriptor, PluginError> {
        self.types.get(name).ok_or_else(|| PluginError::unknown_type(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All registered types in catalog order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.order.iter().map(|n| &self.types[n])
    }

    /// `(type, topic)` for every type that has a topic, in catalog order.
    pub fn published(&self) -> Vec<(&str, &str)> {
        self.descriptors()
            .filter_map(|d| d.topic.as_deref().map(|t| (d.name.as_str(), t)))
            .collect()
    }

    /// Restrict the published set to `names`, keeping catalog order.
    ///
    /// Fails with `UnknownType` on a name the registry does not know, and
    /// with a schema error on a known type that has no topic.
    pub fn select(&self, names: &[String]) -> Result<Vec<(&str, &str)>, PluginError> {
        for name in names {
            let desc = self.lookup(name)?;
            if desc.topic.is_none() {
                return Err(PluginError::schema(format!("{name} is nested-only and has no topic")));
            }
        }
        Ok(self
            .published()
            .into_iter()
            .filter(|(name, _)| names.iter().any(|n| n.as_str() == *name))
            .collect())
    }

    /// Transitive nested types of `name`, in first-use order, without `name` itself.
    pub fn dependencies(&self, name: &str) -> Result<Vec<&str>, PluginError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_dependencies(name, &mut seen, &mut out)?;
        Ok(out)
    }

    fn collect_dependencies<'a>(
        &'a self,
        name: &str,
        seen: &mut HashSet<&'a str>,
        out: &mut Vec<&'a str>,
    ) -> Result<(), PluginError> {
        let desc = self.lookup(name)?;
        for field in &desc.fields {
            if let FieldKind::Nested(target) = &field.kind {
                let target = self.lookup(target)?.name.as_str();
                if seen.insert(target) {
                    out.push(target);
                    self.collect_dependencies(target, seen, out)?;
                }
            }
        }
        Ok(())
    }

    /// Full `ros2msg` text: root definition followed by every dependency under
    /// a separator line and a `MSG: pkg/Type` header.
    pub fn message_definition(&self, name: &str) -> Result<String, PluginError> {
        let root = self.lookup(name)?;
        let mut text = root.definition.trim_end().to_string();
        for dep in self.dependencies(name)? {
            let desc = self.lookup(dep)?;
            text.push('\n');
            text.push_str(DEFINITION_SEPARATOR);
            text.push_str("\nMSG: ");
            text.push_str(&short_name(dep));
            text.push('\n');
            text.push_str(desc.definition.trim_end());
        }
        Ok(text)
    }
}

/// `pkg/msg/Type` → `pkg/Type`.
pub fn short_name(name: &str) -> String {
    match name.split('/').collect::<Vec<_>>().as_slice() {
        [pkg, "msg", ty] => format!("{pkg}/{ty}"),
        _ => name.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════
//  .msg parsing
// ═══════════════════════════════════════════════════════════════

fn parse_definition(
    name: &str,
    topic: Option<&str>,
    text: &str,
) -> Result<TypeDescriptor, PluginError> {
    let package = match name.split('/').collect::<Vec<_>>().as_slice() {
        [pkg, "msg", ty] if !pkg.is_empty() && !ty.is_empty() => pkg.to_string(),
        _ => return Err(PluginError::schema(format!("malformed type name {name}"))),
    };

    let mut fields = Vec::new();
    let mut constants = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let (type_token, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| PluginError::schema(format!("line {}: missing field name", lineno + 1)))?;
        let rest = rest.trim();

        if let Some((cname, value)) = rest.split_once('=') {
            let primitive = Primitive::parse(type_token).ok_or_else(|| {
                PluginError::schema(format!("line {}: constant of non-primitive type {type_token}", lineno + 1))
            })?;
            constants.push(Constant {
                name: cname.trim().to_string(),
                primitive,
                value: value.trim().to_string(),
            });
            continue;
        }

        let mut parts = rest.splitn(2, char::is_whitespace);
        let field_name = parts.next().unwrap_or_default().to_string();
        let default = parts.next().map(|d| d.trim().to_string()).filter(|d| !d.is_empty());

        let (base, arity) = split_arity(type_token)
            .map_err(|e| e.with_context(format!("line {}", lineno + 1)))?;
        let kind = match Primitive::parse(base) {
            Some(p) => FieldKind::Primitive(p),
            None => FieldKind::Nested(qualify(base, &package)?),
        };

        fields.push(FieldDescriptor { name: field_name, kind, arity, default });
    }

    Ok(TypeDescriptor {
        name: name.to_string(),
        fields,
        constants,
        topic: topic.map(str::to_string),
        definition: text.trim_matches('\n').to_string(),
    })
}

fn split_arity(token: &str) -> Result<(&str, Arity), PluginError> {
    let Some(open) = token.find('[') else {
        return Ok((token, Arity::Single));
    };
    let inner = token[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| PluginError::schema(format!("unterminated array in {token}")))?;
    let arity = if inner.is_empty() {
        Arity::Sequence
    } else if let Some(bound) = inner.strip_prefix("<=") {
        Arity::BoundedSequence(parse_len(bound, token)?)
    } else {
        Arity::Array(parse_len(inner, token)?)
    };
    Ok((&token[..open], arity))
}

fn parse_len(text: &str, token: &str) -> Result<usize, PluginError> {
    text.trim()
        .parse()
        .map_err(|_| PluginError::schema(format!("bad array length in {token}")))
}

/// Normalize a reference to `pkg/msg/Type`. Bare names resolve to the owning package.
fn qualify(reference: &str, package: &str) -> Result<String, PluginError> {
    match reference.split('/').collect::<Vec<_>>().as_slice() {
        [ty] if !ty.is_empty() => Ok(format!("{package}/msg/{ty}")),
        [pkg, ty] => Ok(format!("{pkg}/msg/{ty}")),
        [_, "msg", _] => Ok(reference.to_string()),
        _ => Err(PluginError::schema(format!("malformed type reference {reference}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ENTRIES: &[CatalogEntry] = &[
        CatalogEntry {
            name: "demo_msgs/msg/Stamp",
            topic: None,
            definition: "int32 sec\nuint32 nanosec\n",
        },
        CatalogEntry {
            name: "demo_msgs/msg/Reading",
            topic: Some("/test/demo_msgs/reading"),
            definition: "\
# a comment line
uint8 MODE_A = 1
uint8 MODE_B=2
Stamp stamp
uint8 mode
float64[9] covariance
string[] labels
int16[<=4] window
float64 scale 1.0
",
        },
        CatalogEntry {
            name: "other_msgs/msg/Wrapper",
            topic: Some("/test/other_msgs/wrapper"),
            definition: "demo_msgs/Reading[] readings\ndemo_msgs/Stamp stamp\n",
        },
    ];

    #[test]
    fn parses_fields_constants_and_arity() {
        let reg = Registry::from_catalog(ENTRIES).unwrap();
        let reading = reg.lookup("demo_msgs/msg/Reading").unwrap();

        assert_eq!(reading.constants.len(), 2);
        assert_eq!(reading.constants[1].name, "MODE_B");
        assert_eq!(reading.constants[1].value, "2");

        let names: Vec<_> = reading.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["stamp", "mode", "covariance", "labels", "window", "scale"]);
        assert_eq!(reading.fields[0].kind, FieldKind::Nested("demo_msgs/msg/Stamp".into()));
        assert_eq!(reading.fields[2].arity, Arity::Array(9));
        assert_eq!(reading.fields[3].arity, Arity::Sequence);
        assert_eq!(reading.fields[4].arity, Arity::BoundedSequence(4));
        assert_eq!(reading.fields[5].default.as_deref(), Some("1.0"));
    }

    #[test]
    fn cross_package_references_are_qualified() {
        let reg = Registry::from_catalog(ENTRIES).unwrap();
        let wrapper = reg.lookup("other_msgs/msg/Wrapper").unwrap();
        assert_eq!(wrapper.fields[0].kind, FieldKind::Nested("demo_msgs/msg/Reading".into()));
        assert_eq!(wrapper.fields[0].arity, Arity::Sequence);
    }

    #[test]
    fn lookup_miss_is_unknown_type() {
        let reg = Registry::from_catalog(ENTRIES).unwrap();
        let err = reg.lookup("demo_msgs/msg/Nope").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
    }

    #[test]
    fn unresolved_reference_is_rejected() {
        let entries = [CatalogEntry {
            name: "demo_msgs/msg/Broken",
            topic: None,
            definition: "Missing inner\n",
        }];
        let err = Registry::from_catalog(&entries).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Schema);
        assert!(err.message.contains("demo_msgs/msg/Missing"));
    }

    #[test]
    fn published_skips_nested_only_types() {
        let reg = Registry::from_catalog(ENTRIES).unwrap();
        assert_eq!(
            reg.published(),
            vec![
                ("demo_msgs/msg/Reading", "/test/demo_msgs/reading"),
                ("other_msgs/msg/Wrapper", "/test/other_msgs/wrapper"),
            ]
        );
    }

    #[test]
    fn select_rejects_unknown_and_topicless_names() {
        let reg = Registry::from_catalog(ENTRIES).unwrap();
        let picked = reg.select(&["other_msgs/msg/Wrapper".to_string()]).unwrap();
        assert_eq!(picked, vec![("other_msgs/msg/Wrapper", "/test/other_msgs/wrapper")]);

        let err = reg.select(&["demo_msgs/msg/Nope".to_string()]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
        let err = reg.select(&["demo_msgs/msg/Stamp".to_string()]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Schema);
    }

    #[test]
    fn message_definition_appends_dependencies_once() {
        let reg = Registry::from_catalog(ENTRIES).unwrap();
        assert_eq!(
            reg.dependencies("other_msgs/msg/Wrapper").unwrap(),
            vec!["demo_msgs/msg/Reading", "demo_msgs/msg/Stamp"]
        );

        let text = reg.message_definition("other_msgs/msg/Wrapper").unwrap();
        assert!(text.starts_with("demo_msgs/Reading[] readings\ndemo_msgs/Stamp stamp\n="));
        assert_eq!(text.matches("MSG: demo_msgs/Stamp\n").count(), 1);
        assert_eq!(text.matches(DEFINITION_SEPARATOR).count(), 2);
        assert!(text.ends_with("int32 sec\nuint32 nanosec"));
    }
}
