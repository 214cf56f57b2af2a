//! Target type descriptors.
//!
//! A [`TargetType`] classifies the destination shape requested for a decoded
//! value. Aggregate variants carry their element/key/value sub-descriptors so
//! the decoder can recurse without consulting the resolver for structure;
//! record field shapes live behind the resolver (see `TypeResolver`).

use std::fmt;

/// Classification of a decode destination.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
    /// No expectation — materialize the natural value for each wire kind.
    Any,
    /// Boolean.
    Boolean,
    /// A specific numeric type.
    Number(NumberKind),
    /// Character sequence (string).
    CharSequence,
    /// A single character (decoded from a one-char string).
    Character,
    /// Raw byte array.
    ByteArray,
    /// Optional wrapper; unwraps one level, `Value::Null` is the empty case.
    Optional(Box<TargetType>),
    /// Map with declared key and value types.
    Map(Box<TargetType>, Box<TargetType>),
    /// Growable collection with a declared element type.
    Collection(Box<TargetType>),
    /// Fixed-size array with a declared element type.
    Array(Box<TargetType>),
    /// Heterogeneous tuple with positional element types.
    Args(Vec<TargetType>),
    /// Record type with named fields, resolved by name.
    Record(String),
    /// Type constructible from a string via the resolver's string factory.
    FromString(String),
}

impl TargetType {
    /// `Optional<inner>`.
    pub fn optional(inner: TargetType) -> Self {
        TargetType::Optional(Box::new(inner))
    }

    /// `Map<key, value>`.
    pub fn map(key: TargetType, value: TargetType) -> Self {
        TargetType::Map(Box::new(key), Box::new(value))
    }

    /// `Collection<element>`.
    pub fn collection(element: TargetType) -> Self {
        TargetType::Collection(Box::new(element))
    }

    /// `Array<element>`.
    pub fn array(element: TargetType) -> Self {
        TargetType::Array(Box::new(element))
    }

    /// Record type reference by name.
    pub fn record(name: impl Into<String>) -> Self {
        TargetType::Record(name.into())
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Any => f.write_str("any"),
            TargetType::Boolean => f.write_str("boolean"),
            TargetType::Number(kind) => write!(f, "{kind}"),
            TargetType::CharSequence => f.write_str("string"),
            TargetType::Character => f.write_str("char"),
            TargetType::ByteArray => f.write_str("byte array"),
            TargetType::Optional(inner) => write!(f, "optional<{inner}>"),
            TargetType::Map(key, value) => write!(f, "map<{key}, {value}>"),
            TargetType::Collection(element) => write!(f, "collection<{element}>"),
            TargetType::Array(element) => write!(f, "array<{element}>"),
            TargetType::Args(args) => {
                f.write_str("args(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            TargetType::Record(name) => write!(f, "record {name}"),
            TargetType::FromString(name) => write!(f, "{name} (from string)"),
        }
    }
}

/// Concrete numeric destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberKind::I8 => "i8",
            NumberKind::I16 => "i16",
            NumberKind::I32 => "i32",
            NumberKind::I64 => "i64",
            NumberKind::U8 => "u8",
            NumberKind::U16 => "u16",
            NumberKind::U32 => "u32",
            NumberKind::U64 => "u64",
            NumberKind::F32 => "f32",
            NumberKind::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Shape of a record type: its name and field descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    /// Type name the wire's records are resolved against.
    pub name: String,
    /// Field descriptors in declaration order.
    pub fields: Vec<FieldShape>,
}

impl RecordShape {
    /// Creates a shape with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field descriptor (builder style).
    pub fn field(mut self, name: impl Into<String>, ty: TargetType) -> Self {
        self.fields.push(FieldShape {
            name: name.into(),
            ty,
        });
        self
    }

    /// Looks up a field descriptor by name.
    pub fn field_named(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A single named, typed record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    pub name: String,
    pub ty: TargetType,
}
