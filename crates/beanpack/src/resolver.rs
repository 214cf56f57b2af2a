//! The type-resolution collaborator boundary.
//!
//! The decoder never inspects destination types on its own: classification,
//! record shapes, transforms, scalar conversion and construction all go
//! through a [`TypeResolver`]. [`SchemaResolver`] is the registry-backed
//! implementation most callers use; custom resolvers only need
//! [`TypeResolver::record_shape`].
//!
//! Hooks take `&self`: a resolver that wants to observe decoding (e.g. log
//! unknown fields) picks its own interior mutability, and whoever shares a
//! resolver across threads is responsible for making it `Sync`.

use std::cell::RefCell;

use crate::types::{FieldShape, NumberKind, RecordShape, TargetType};
use crate::value::{Record, Value};

/// Description of a decoded node's structural parent, for the non-owning
/// back-reference hook. Advisory bookkeeping only — never ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent<'a> {
    /// Value is being assigned to a named record field.
    Field { record: &'a str, field: &'a str },
    /// Value is an element of a collection/array/tuple.
    Element { index: usize },
    /// Value is a map entry's value.
    Entry { key: &'a str },
}

/// A reversible mapping between a declared type and an intermediate
/// wire-friendly type.
///
/// The decoder decodes into [`ValueSwap::intermediate`] and then applies
/// [`ValueSwap::unswap`] to recover the declared type's value.
pub trait ValueSwap {
    /// The intermediate type actually decoded off the wire.
    fn intermediate(&self) -> TargetType;

    /// Maps the decoded intermediate value back to the declared type.
    fn unswap(&self, value: Value) -> Result<Value, String>;
}

/// A builder-mediated transform: the wire carries the builder record's
/// fields; [`BuilderSwap::finish`] produces the final value from the
/// fully-populated builder.
pub trait BuilderSwap {
    /// The builder's own type, decoded off the wire (usually a record).
    fn intermediate(&self) -> TargetType;

    /// Produces the final value from the decoded builder.
    fn finish(&self, builder: Value) -> Result<Value, String>;
}

/// Runtime type-resolution collaborator consumed by the decoder.
///
/// Hook errors are `String` reasons; the decoder wraps them with the wire
/// kind, target type and field path before surfacing them.
pub trait TypeResolver {
    /// Shape lookup for record types. `None` means the name is unknown,
    /// which makes constructing that record a fatal decode error.
    fn record_shape(&self, name: &str) -> Option<&RecordShape>;

    /// Optional value transform declared for `ty`.
    fn swap_for(&self, _ty: &TargetType) -> Option<&dyn ValueSwap> {
        None
    }

    /// Optional builder transform declared for `ty`.
    fn builder_swap_for(&self, _ty: &TargetType) -> Option<&dyn BuilderSwap> {
        None
    }

    /// Converts a raw wire scalar to the requested scalar target.
    fn convert_scalar(&self, raw: Value, target: &TargetType) -> Result<Value, String> {
        convert_scalar(raw, target)
    }

    /// Constructs the destination for a Map target. Must return a
    /// [`Value::Map`] seed.
    fn construct_map(&self, _ty: &TargetType) -> Result<Value, String> {
        Ok(Value::Map(Vec::new()))
    }

    /// Constructs the destination for a Collection/Array target. Must return
    /// a [`Value::Array`] seed.
    fn construct_collection(&self, _ty: &TargetType) -> Result<Value, String> {
        Ok(Value::Array(Vec::new()))
    }

    /// Constructs an empty record instance of the named type.
    fn construct_record(&self, name: &str) -> Result<Record, String> {
        if self.record_shape(name).is_some() {
            Ok(Record::new(name))
        } else {
            Err(format!("unknown record type '{name}'"))
        }
    }

    /// String factory for [`TargetType::FromString`] targets.
    fn from_string(&self, type_name: &str, _s: &str) -> Result<Value, String> {
        Err(format!("no string factory registered for '{type_name}'"))
    }

    /// Assigns a decoded value to a resolved record field. May reject the
    /// value, which surfaces as a fatal field-assignment error.
    fn set_field(
        &self,
        record: &mut Record,
        field: &FieldShape,
        value: Value,
    ) -> Result<(), String> {
        record.set(field.name.clone(), value);
        Ok(())
    }

    /// Reserved discriminator property name. A record key with this name is
    /// consumed and discarded wherever it appears in the field sequence.
    fn type_property_name(&self) -> &str {
        "_type"
    }

    /// Called once per record key that matches no field descriptor and is
    /// not the discriminator. Decoding continues; the default discards.
    fn on_unknown_field(&self, _record: &mut Record, _name: &str, _value: Value) {}

    /// Non-owning parent back-reference hook, called after a child value is
    /// materialized under a structural parent. The default does nothing.
    fn set_parent(&self, _child: &mut Value, _parent: Parent<'_>) {}
}

/// Default scalar conversion: numeric widening/narrowing with range checks,
/// string parsing, and stringification. Floats truncate toward zero when
/// targeting integers.
pub fn convert_scalar(raw: Value, target: &TargetType) -> Result<Value, String> {
    match target {
        TargetType::Boolean => match raw {
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::Int(i) => Ok(Value::Bool(i != 0)),
            Value::UInt(u) => Ok(Value::Bool(u != 0)),
            Value::Str(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::Str(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            Value::Str(s) => Err(format!("'{s}' is not a boolean")),
            other => Err(format!("{} is not a boolean", other.type_label())),
        },
        TargetType::Number(kind) => match raw {
            Value::Int(i) => fit_integer(i as i128, *kind),
            Value::UInt(u) => fit_integer(u as i128, *kind),
            Value::Float(f) => fit_float(f, *kind),
            Value::Str(s) => parse_number(&s, *kind),
            other => Err(format!("{} is not a number", other.type_label())),
        },
        TargetType::CharSequence => match raw {
            Value::Str(s) => Ok(Value::Str(s)),
            Value::Bool(b) => Ok(Value::Str(b.to_string())),
            Value::Int(i) => Ok(Value::Str(i.to_string())),
            Value::UInt(u) => Ok(Value::Str(u.to_string())),
            Value::Float(f) => Ok(Value::Str(f.to_string())),
            other => Err(format!("{} is not a string", other.type_label())),
        },
        TargetType::Character => match raw {
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(_), None) => Ok(Value::Str(s)),
                    _ => Err(format!("'{s}' is not a single character")),
                }
            }
            other => Err(format!("{} is not a character", other.type_label())),
        },
        TargetType::ByteArray => match raw {
            Value::Bytes(b) => Ok(Value::Bytes(b)),
            other => Err(format!("{} is not binary data", other.type_label())),
        },
        other => Err(format!("'{other}' is not a scalar target")),
    }
}

fn integer_bounds(kind: NumberKind) -> Option<(i128, i128)> {
    match kind {
        NumberKind::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
        NumberKind::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
        NumberKind::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
        NumberKind::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
        NumberKind::U8 => Some((0, u8::MAX as i128)),
        NumberKind::U16 => Some((0, u16::MAX as i128)),
        NumberKind::U32 => Some((0, u32::MAX as i128)),
        NumberKind::U64 => Some((0, u64::MAX as i128)),
        NumberKind::F32 | NumberKind::F64 => None,
    }
}

fn fit_integer(value: i128, kind: NumberKind) -> Result<Value, String> {
    match integer_bounds(kind) {
        Some((min, max)) => {
            if value < min || value > max {
                return Err(format!("{value} is out of range for {kind}"));
            }
            if value > i64::MAX as i128 {
                Ok(Value::UInt(value as u64))
            } else {
                Ok(Value::Int(value as i64))
            }
        }
        None => match kind {
            NumberKind::F32 => Ok(Value::Float(value as f32 as f64)),
            _ => Ok(Value::Float(value as f64)),
        },
    }
}

fn fit_float(value: f64, kind: NumberKind) -> Result<Value, String> {
    match kind {
        NumberKind::F64 => Ok(Value::Float(value)),
        NumberKind::F32 => Ok(Value::Float(value as f32 as f64)),
        _ => {
            if !value.is_finite() {
                return Err(format!("{value} is out of range for {kind}"));
            }
            fit_integer(value.trunc() as i128, kind)
        }
    }
}

fn parse_number(s: &str, kind: NumberKind) -> Result<Value, String> {
    match kind {
        NumberKind::F32 | NumberKind::F64 => s
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a number"))
            .and_then(|f| fit_float(f, kind)),
        _ => s
            .parse::<i128>()
            .map_err(|_| format!("'{s}' is not an integer"))
            .and_then(|i| fit_integer(i, kind)),
    }
}

type StringFactory = Box<dyn Fn(&str) -> Result<Value, String>>;

/// Registry-backed [`TypeResolver`].
///
/// Record shapes, swaps and string factories are registered up front
/// (builder style); unknown record fields are logged and retrievable via
/// [`SchemaResolver::unknown_fields`].
#[derive(Default)]
pub struct SchemaResolver {
    records: Vec<RecordShape>,
    swaps: Vec<(TargetType, Box<dyn ValueSwap>)>,
    builder_swaps: Vec<(TargetType, Box<dyn BuilderSwap>)>,
    string_factories: Vec<(String, StringFactory)>,
    type_property: Option<String>,
    unknown: RefCell<Vec<(String, String)>>,
}

impl SchemaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record shape.
    pub fn record(mut self, shape: RecordShape) -> Self {
        self.records.push(shape);
        self
    }

    /// Registers a value transform for the given declared type.
    pub fn swap(mut self, ty: TargetType, swap: Box<dyn ValueSwap>) -> Self {
        self.swaps.push((ty, swap));
        self
    }

    /// Registers a builder transform for the given declared type.
    pub fn builder_swap(mut self, ty: TargetType, swap: Box<dyn BuilderSwap>) -> Self {
        self.builder_swaps.push((ty, swap));
        self
    }

    /// Registers a string factory for a [`TargetType::FromString`] type.
    pub fn string_factory(
        mut self,
        type_name: impl Into<String>,
        factory: StringFactory,
    ) -> Self {
        self.string_factories.push((type_name.into(), factory));
        self
    }

    /// Overrides the reserved discriminator property name.
    pub fn type_property(mut self, name: impl Into<String>) -> Self {
        self.type_property = Some(name.into());
        self
    }

    /// Unknown record fields observed so far, as (record type, field name).
    pub fn unknown_fields(&self) -> Vec<(String, String)> {
        self.unknown.borrow().clone()
    }
}

impl TypeResolver for SchemaResolver {
    fn record_shape(&self, name: &str) -> Option<&RecordShape> {
        self.records.iter().find(|shape| shape.name == name)
    }

    fn swap_for(&self, ty: &TargetType) -> Option<&dyn ValueSwap> {
        self.swaps
            .iter()
            .find(|(declared, _)| declared == ty)
            .map(|(_, swap)| swap.as_ref())
    }

    fn builder_swap_for(&self, ty: &TargetType) -> Option<&dyn BuilderSwap> {
        self.builder_swaps
            .iter()
            .find(|(declared, _)| declared == ty)
            .map(|(_, swap)| swap.as_ref())
    }

    fn from_string(&self, type_name: &str, s: &str) -> Result<Value, String> {
        match self
            .string_factories
            .iter()
            .find(|(name, _)| name == type_name)
        {
            Some((_, factory)) => factory(s),
            None => Err(format!("no string factory registered for '{type_name}'")),
        }
    }

    fn type_property_name(&self) -> &str {
        self.type_property.as_deref().unwrap_or("_type")
    }

    fn on_unknown_field(&self, record: &mut Record, name: &str, _value: Value) {
        self.unknown
            .borrow_mut()
            .push((record.type_name.clone(), name.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_narrowing_checks_range() {
        assert_eq!(
            convert_scalar(Value::Int(127), &TargetType::Number(NumberKind::I8)),
            Ok(Value::Int(127))
        );
        assert!(convert_scalar(Value::Int(128), &TargetType::Number(NumberKind::I8)).is_err());
        assert!(convert_scalar(Value::Int(-1), &TargetType::Number(NumberKind::U32)).is_err());
    }

    #[test]
    fn floats_truncate_toward_zero_for_integer_targets() {
        assert_eq!(
            convert_scalar(Value::Float(3.9), &TargetType::Number(NumberKind::I32)),
            Ok(Value::Int(3))
        );
        assert_eq!(
            convert_scalar(Value::Float(-3.9), &TargetType::Number(NumberKind::I32)),
            Ok(Value::Int(-3))
        );
        assert!(
            convert_scalar(Value::Float(f64::NAN), &TargetType::Number(NumberKind::I32)).is_err()
        );
    }

    #[test]
    fn strings_parse_into_numbers() {
        assert_eq!(
            convert_scalar(Value::Str("42".into()), &TargetType::Number(NumberKind::I64)),
            Ok(Value::Int(42))
        );
        assert_eq!(
            convert_scalar(Value::Str("2.5".into()), &TargetType::Number(NumberKind::F64)),
            Ok(Value::Float(2.5))
        );
        assert!(
            convert_scalar(Value::Str("nope".into()), &TargetType::Number(NumberKind::I32))
                .is_err()
        );
    }

    #[test]
    fn stringification() {
        assert_eq!(
            convert_scalar(Value::Int(-5), &TargetType::CharSequence),
            Ok(Value::Str("-5".into()))
        );
        assert_eq!(
            convert_scalar(Value::Bool(true), &TargetType::CharSequence),
            Ok(Value::Str("true".into()))
        );
    }

    #[test]
    fn character_requires_single_char() {
        assert_eq!(
            convert_scalar(Value::Str("é".into()), &TargetType::Character),
            Ok(Value::Str("é".into()))
        );
        assert!(convert_scalar(Value::Str("ab".into()), &TargetType::Character).is_err());
        assert!(convert_scalar(Value::Str("".into()), &TargetType::Character).is_err());
    }

    #[test]
    fn uint64_above_i64_stays_unsigned() {
        let big = u64::MAX;
        assert_eq!(
            convert_scalar(Value::UInt(big), &TargetType::Number(NumberKind::U64)),
            Ok(Value::UInt(big))
        );
        assert!(
            convert_scalar(Value::UInt(big), &TargetType::Number(NumberKind::I64)).is_err()
        );
    }

    #[test]
    fn schema_resolver_lookup_and_discriminator() {
        let resolver = SchemaResolver::new()
            .record(RecordShape::new("Person").field("name", TargetType::CharSequence))
            .type_property("@class");
        assert!(resolver.record_shape("Person").is_some());
        assert!(resolver.record_shape("Missing").is_none());
        assert_eq!(resolver.type_property_name(), "@class");
        assert!(resolver.construct_record("Missing").is_err());
    }
}
