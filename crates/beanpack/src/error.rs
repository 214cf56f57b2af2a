//! Decode error taxonomy.

use thiserror::Error;

use crate::tag::Kind;

/// Error type for decode operations.
///
/// Every variant is fatal and unwinds the whole top-level decode; no partial
/// graph is ever returned. Unknown record fields are not an error — they are
/// routed to `TypeResolver::on_unknown_field` and decoding continues.
///
/// `path` fields hold the field path being decoded when the error was raised,
/// rendered as `$.field[index]...`; `offset` fields hold the byte offset into
/// the input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Stream ended before a tag's declared payload was fully read.
    #[error("truncated stream at offset {offset}")]
    TruncatedStream { offset: usize },
    /// Unrecognized tag byte pattern.
    #[error("unrecognized marker byte 0x{marker:02x} at offset {offset}")]
    MalformedStream { marker: u8, offset: usize },
    /// String payload was not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    /// Wire tag kind is incompatible with the requested target type.
    #[error("wire value of kind {kind} cannot be decoded into {target} at {path}")]
    TypeMismatch {
        kind: Kind,
        target: String,
        path: String,
    },
    /// Wire scalar could not be converted to the requested scalar type.
    #[error("cannot convert {from} into {target} at {path}: {reason}")]
    ScalarConversion {
        from: String,
        target: String,
        path: String,
        reason: String,
    },
    /// The type resolver could not instantiate the requested type.
    #[error("could not construct {type_name} at {path}: {reason}")]
    Construction {
        type_name: String,
        reason: String,
        path: String,
    },
    /// A resolved record field rejected the decoded value during assignment.
    #[error("field {path} rejected decoded value: {reason}")]
    FieldAssignment { path: String, reason: String },
    /// Input continued past the end of the top-level value.
    #[error("trailing data after top-level value at offset {offset}")]
    TrailingData { offset: usize },
}
