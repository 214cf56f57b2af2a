//! [`Decoder`] — the type-directed decoder.
//!
//! Recursively consumes tagged values from a [`TagReader`] and materializes
//! a [`Value`] graph conforming to a requested [`TargetType`], consulting a
//! [`TypeResolver`] for record shapes, transforms, conversion and
//! construction. The decoder itself is stateless: it borrows the reader and
//! the resolver for the duration of one `decode` call, and the traversal is
//! a single depth-first pass with no backtracking — the wire's declared
//! structure is authoritative.
//!
//! One decoder/reader pair serves one decode call; sessions are not meant to
//! be shared across concurrent callers.

use crate::error::DecodeError;
use crate::reader::TagReader;
use crate::resolver::{Parent, TypeResolver};
use crate::tag::Kind;
use crate::types::TargetType;
use crate::value::Value;

/// One step of the field path used in error context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Renders a path as `$.field[index]...`.
fn render_path(path: &[PathSegment]) -> String {
    let mut out = String::from("$");
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Short label for a map key, for paths and diagnostics.
fn key_label(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Null => "null".to_owned(),
        other => other.type_label().to_owned(),
    }
}

/// Type-directed decoder over a borrowed [`TypeResolver`].
pub struct Decoder<'r, R: TypeResolver + ?Sized> {
    resolver: &'r R,
    trim_strings: bool,
}

impl<'r, R: TypeResolver + ?Sized> Decoder<'r, R> {
    /// Creates a decoder over the given resolver.
    pub fn new(resolver: &'r R) -> Self {
        Self {
            resolver,
            trim_strings: false,
        }
    }

    /// Trims leading/trailing whitespace from decoded string values (not
    /// from record field names). Off by default.
    pub fn trim_strings(mut self, trim: bool) -> Self {
        self.trim_strings = trim;
        self
    }

    /// Decodes one top-level value of the given target type from `input`.
    ///
    /// The entire input must be consumed; leftover bytes are an error. On
    /// any failure the whole decode is abandoned — no partial graph is
    /// returned.
    pub fn decode(&self, input: &[u8], ty: &TargetType) -> Result<Value, DecodeError> {
        let mut reader = TagReader::new(input);
        let mut path = Vec::new();
        let value = self.decode_any(&mut reader, ty, &mut path, None)?;
        if reader.remaining() > 0 {
            return Err(DecodeError::TrailingData {
                offset: reader.offset(),
            });
        }
        Ok(value)
    }

    /// Decodes one value and wires the parent back-reference hook.
    fn decode_any(
        &self,
        r: &mut TagReader<'_>,
        ty: &TargetType,
        path: &mut Vec<PathSegment>,
        parent: Option<Parent<'_>>,
    ) -> Result<Value, DecodeError> {
        let mut value = self.decode_unwrapped(r, ty, path)?;
        if let Some(parent) = parent {
            if !value.is_null() {
                self.resolver.set_parent(&mut value, parent);
            }
        }
        Ok(value)
    }

    /// Resolves transforms and optional wrappers, then dispatches on the
    /// wire tag.
    fn decode_unwrapped(
        &self,
        r: &mut TagReader<'_>,
        ty: &TargetType,
        path: &mut Vec<PathSegment>,
    ) -> Result<Value, DecodeError> {
        if let Some(swap) = self.resolver.builder_swap_for(ty) {
            let intermediate = swap.intermediate();
            let builder = self.decode_unwrapped(r, &intermediate, path)?;
            if builder.is_null() {
                return Ok(Value::Null);
            }
            return swap.finish(builder).map_err(|reason| DecodeError::Construction {
                type_name: ty.to_string(),
                reason,
                path: render_path(path),
            });
        }
        if let Some(swap) = self.resolver.swap_for(ty) {
            let intermediate = swap.intermediate();
            let decoded = self.decode_unwrapped(r, &intermediate, path)?;
            if decoded.is_null() {
                return Ok(Value::Null);
            }
            let from = decoded.type_label().to_owned();
            return swap.unswap(decoded).map_err(|reason| DecodeError::ScalarConversion {
                from,
                target: ty.to_string(),
                path: render_path(path),
                reason,
            });
        }
        if let TargetType::Optional(inner) = ty {
            // unwrap one level; Value::Null is the empty optional
            return self.decode_unwrapped(r, inner, path);
        }
        self.decode_value(r, ty, path)
    }

    /// The two-axis dispatch: wire tag kind × target classification.
    fn decode_value(
        &self,
        r: &mut TagReader<'_>,
        ty: &TargetType,
        path: &mut Vec<PathSegment>,
    ) -> Result<Value, DecodeError> {
        let kind = r.read_tag()?;

        // Nil short-circuits at any depth, whatever the target type.
        if kind == Kind::Nil {
            return Ok(Value::Null);
        }

        match (kind, ty) {
            // scalar tag, no expectation: the natural value
            (
                Kind::Bool
                | Kind::Int32
                | Kind::Int64
                | Kind::Float32
                | Kind::Float64
                | Kind::Str
                | Kind::Bin,
                TargetType::Any,
            ) => self.read_scalar(r, kind, path),

            // scalar tag, scalar target: natural value then conversion
            (
                Kind::Bool
                | Kind::Int32
                | Kind::Int64
                | Kind::Float32
                | Kind::Float64
                | Kind::Str
                | Kind::Bin,
                TargetType::Boolean
                | TargetType::Number(_)
                | TargetType::CharSequence
                | TargetType::Character
                | TargetType::ByteArray,
            ) => {
                let raw = self.read_scalar(r, kind, path)?;
                let from = raw.type_label().to_owned();
                self.resolver
                    .convert_scalar(raw, ty)
                    .map_err(|reason| DecodeError::ScalarConversion {
                        from,
                        target: ty.to_string(),
                        path: render_path(path),
                        reason,
                    })
            }

            // string tag, string-constructible target
            (Kind::Str, TargetType::FromString(name)) => {
                let len = r.read_length()? as usize;
                let s = self.read_string(r, len)?;
                self.resolver
                    .from_string(name, &s)
                    .map_err(|reason| DecodeError::Construction {
                        type_name: name.clone(),
                        reason,
                        path: render_path(path),
                    })
            }

            // array tag, no expectation: generic ordered list
            (Kind::Array, TargetType::Any) => {
                let len = r.read_length()?;
                // each element is at least one byte; never pre-allocate
                // more than the remaining input could hold
                let mut items = Vec::with_capacity((len as usize).min(r.remaining()));
                for index in 0..len as usize {
                    path.push(PathSegment::Index(index));
                    let item =
                        self.decode_any(r, &TargetType::Any, path, Some(Parent::Element { index }))?;
                    path.pop();
                    items.push(item);
                }
                Ok(Value::Array(items))
            }

            // array tag, declared element type
            (Kind::Array, TargetType::Collection(element) | TargetType::Array(element)) => {
                let len = r.read_length()?;
                let mut items = self.construct_collection(ty, path)?;
                items.reserve((len as usize).min(r.remaining()));
                for index in 0..len as usize {
                    path.push(PathSegment::Index(index));
                    let item =
                        self.decode_any(r, element, path, Some(Parent::Element { index }))?;
                    path.pop();
                    items.push(item);
                }
                Ok(Value::Array(items))
            }

            // array tag, positional tuple types
            (Kind::Array, TargetType::Args(args)) => {
                let len = r.read_length()?;
                if len as usize > args.len() {
                    return Err(DecodeError::TypeMismatch {
                        kind,
                        target: ty.to_string(),
                        path: render_path(path),
                    });
                }
                let mut items = Vec::with_capacity(len as usize);
                for (index, arg) in args.iter().take(len as usize).enumerate() {
                    path.push(PathSegment::Index(index));
                    let item = self.decode_any(r, arg, path, Some(Parent::Element { index }))?;
                    path.pop();
                    items.push(item);
                }
                Ok(Value::Array(items))
            }

            // map tag, no expectation: generic map with string-decoded keys
            (Kind::Map, TargetType::Any) => {
                let len = r.read_length()?;
                let mut entries = Vec::with_capacity((len as usize).min(r.remaining()));
                for _ in 0..len {
                    let key = self.decode_any(r, &TargetType::CharSequence, path, None)?;
                    let label = key_label(&key);
                    path.push(PathSegment::Key(label.clone()));
                    let value = self.decode_any(
                        r,
                        &TargetType::Any,
                        path,
                        Some(Parent::Entry { key: &label }),
                    )?;
                    path.pop();
                    entries.push((key, value));
                }
                Ok(Value::Map(entries))
            }

            // map tag, declared key/value types
            (Kind::Map, TargetType::Map(key_ty, value_ty)) => {
                let len = r.read_length()?;
                let mut entries = self.construct_map(ty, path)?;
                entries.reserve((len as usize).min(r.remaining()));
                for _ in 0..len {
                    let key = self.decode_any(r, key_ty, path, None)?;
                    let label = key_label(&key);
                    path.push(PathSegment::Key(label.clone()));
                    let value =
                        self.decode_any(r, value_ty, path, Some(Parent::Entry { key: &label }))?;
                    path.pop();
                    entries.push((key, value));
                }
                Ok(Value::Map(entries))
            }

            // map tag, record target
            (Kind::Map, TargetType::Record(name)) => self.decode_record(r, name, path),

            // everything else is a wire/target incompatibility
            (kind, ty) => Err(DecodeError::TypeMismatch {
                kind,
                target: ty.to_string(),
                path: render_path(path),
            }),
        }
    }

    /// Decodes a map tag's key/value sequence into a named record.
    fn decode_record(
        &self,
        r: &mut TagReader<'_>,
        name: &str,
        path: &mut Vec<PathSegment>,
    ) -> Result<Value, DecodeError> {
        let len = r.read_length()?;
        let mut record =
            self.resolver
                .construct_record(name)
                .map_err(|reason| DecodeError::Construction {
                    type_name: name.to_owned(),
                    reason,
                    path: render_path(path),
                })?;
        for _ in 0..len {
            let key_kind = r.read_tag()?;
            if key_kind != Kind::Str {
                return Err(DecodeError::TypeMismatch {
                    kind: key_kind,
                    target: format!("field name of record {name}"),
                    path: render_path(path),
                });
            }
            let key_len = r.read_length()? as usize;
            let key = r.read_str(key_len)?;

            // Discriminator consumption is positional: discard wherever the
            // reserved name appears in the field sequence.
            if key == self.resolver.type_property_name() {
                let _ = self.decode_any(r, &TargetType::Any, path, None)?;
                continue;
            }

            match self
                .resolver
                .record_shape(name)
                .and_then(|shape| shape.field_named(&key))
            {
                None => {
                    let value = self.decode_any(r, &TargetType::Any, path, None)?;
                    self.resolver.on_unknown_field(&mut record, &key, value);
                }
                Some(field) => {
                    path.push(PathSegment::Key(key.clone()));
                    let value = self.decode_any(
                        r,
                        &field.ty,
                        path,
                        Some(Parent::Field {
                            record: name,
                            field: &field.name,
                        }),
                    )?;
                    self.resolver
                        .set_field(&mut record, field, value)
                        .map_err(|reason| DecodeError::FieldAssignment {
                            path: render_path(path),
                            reason,
                        })?;
                    path.pop();
                }
            }
        }
        Ok(Value::Record(record))
    }

    /// Obtains the seed for a Collection/Array target from the resolver.
    fn construct_collection(
        &self,
        ty: &TargetType,
        path: &[PathSegment],
    ) -> Result<Vec<Value>, DecodeError> {
        let construction = |reason: String| DecodeError::Construction {
            type_name: ty.to_string(),
            reason,
            path: render_path(path),
        };
        match self.resolver.construct_collection(ty).map_err(construction)? {
            Value::Array(items) => Ok(items),
            other => Err(construction(format!(
                "constructor returned {}, expected an array",
                other.type_label()
            ))),
        }
    }

    /// Obtains the seed for a Map target from the resolver.
    fn construct_map(
        &self,
        ty: &TargetType,
        path: &[PathSegment],
    ) -> Result<Vec<(Value, Value)>, DecodeError> {
        let construction = |reason: String| DecodeError::Construction {
            type_name: ty.to_string(),
            reason,
            path: render_path(path),
        };
        match self.resolver.construct_map(ty).map_err(construction)? {
            Value::Map(entries) => Ok(entries),
            other => Err(construction(format!(
                "constructor returned {}, expected a map",
                other.type_label()
            ))),
        }
    }

    /// Reads the natural scalar for a scalar tag kind.
    fn read_scalar(
        &self,
        r: &mut TagReader<'_>,
        kind: Kind,
        path: &[PathSegment],
    ) -> Result<Value, DecodeError> {
        match kind {
            Kind::Bool => Ok(Value::Bool(r.read_bool())),
            Kind::Int32 => Ok(Value::Int(r.read_i32()? as i64)),
            Kind::Int64 => {
                let wide = r.read_i64()?;
                if wide > i64::MAX as i128 {
                    Ok(Value::UInt(wide as u64))
                } else {
                    Ok(Value::Int(wide as i64))
                }
            }
            Kind::Float32 => Ok(Value::Float(r.read_f32()? as f64)),
            Kind::Float64 => Ok(Value::Float(r.read_f64()?)),
            Kind::Str => {
                let len = r.read_length()? as usize;
                Ok(Value::Str(self.read_string(r, len)?))
            }
            Kind::Bin => {
                let len = r.read_length()? as usize;
                Ok(Value::Bytes(r.read_bin(len)?))
            }
            Kind::Nil | Kind::Array | Kind::Map => Err(DecodeError::TypeMismatch {
                kind,
                target: "scalar".to_owned(),
                path: render_path(path),
            }),
        }
    }

    /// Reads a string value, applying the trim option.
    fn read_string(&self, r: &mut TagReader<'_>, len: usize) -> Result<String, DecodeError> {
        let s = r.read_str(len)?;
        if self.trim_strings {
            Ok(s.trim().to_owned())
        } else {
            Ok(s)
        }
    }
}
