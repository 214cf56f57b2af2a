//! One-shot convenience entry points.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::DecodeError;
use crate::resolver::{SchemaResolver, TypeResolver};
use crate::types::TargetType;
use crate::value::Value;

/// Decodes one top-level value of `ty` from `input` against `resolver`.
pub fn decode<R: TypeResolver + ?Sized>(
    input: &[u8],
    ty: &TargetType,
    resolver: &R,
) -> Result<Value, DecodeError> {
    Decoder::new(resolver).decode(input, ty)
}

/// Decodes one top-level value with no target expectation and no registered
/// schema. Each call builds its own resolver; nothing is shared.
pub fn decode_any(input: &[u8]) -> Result<Value, DecodeError> {
    let resolver = SchemaResolver::new();
    Decoder::new(&resolver).decode(input, &TargetType::Any)
}

/// Encodes one value to bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    Encoder::new().encode(value)
}
