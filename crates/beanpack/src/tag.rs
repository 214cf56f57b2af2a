//! Wire tag kinds and marker constants.
//!
//! The wire format is the MessagePack encoding restricted to ten kinds; the
//! extension family and `0xc1` are not part of the contract and decode as
//! malformed stream.

use std::fmt;

/// Kind of the next value on the wire, as identified by its tag.
///
/// For [`Kind::Str`], [`Kind::Bin`], [`Kind::Array`] and [`Kind::Map`] the
/// tag additionally carries a byte/element count, surfaced separately by
/// `TagReader::read_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    Str,
    Bin,
    Array,
    Map,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Bool => "boolean",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Str => "string",
            Kind::Bin => "binary",
            Kind::Array => "array",
            Kind::Map => "map",
        };
        f.write_str(name)
    }
}

/// One-byte markers outside the fixint/fixstr/fixarray/fixmap ranges.
pub mod marker {
    pub const NIL: u8 = 0xc0;
    pub const FALSE: u8 = 0xc2;
    pub const TRUE: u8 = 0xc3;
    pub const BIN8: u8 = 0xc4;
    pub const BIN16: u8 = 0xc5;
    pub const BIN32: u8 = 0xc6;
    pub const FLOAT32: u8 = 0xca;
    pub const FLOAT64: u8 = 0xcb;
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const UINT64: u8 = 0xcf;
    pub const INT8: u8 = 0xd0;
    pub const INT16: u8 = 0xd1;
    pub const INT32: u8 = 0xd2;
    pub const INT64: u8 = 0xd3;
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    pub const MAP16: u8 = 0xde;
    pub const MAP32: u8 = 0xdf;
}

/// Classifies a header byte, or `None` for markers outside the contract.
pub fn classify(byte: u8) -> Option<Kind> {
    // positive fixint: 0x00-0x7f, negative fixint: 0xe0-0xff
    if byte <= 0x7f || byte >= 0xe0 {
        return Some(Kind::Int32);
    }
    // fixmap: 0x80-0x8f
    if (0x80..=0x8f).contains(&byte) {
        return Some(Kind::Map);
    }
    // fixarray: 0x90-0x9f
    if (0x90..=0x9f).contains(&byte) {
        return Some(Kind::Array);
    }
    // fixstr: 0xa0-0xbf
    if (0xa0..=0xbf).contains(&byte) {
        return Some(Kind::Str);
    }
    match byte {
        marker::NIL => Some(Kind::Nil),
        marker::FALSE | marker::TRUE => Some(Kind::Bool),
        marker::BIN8 | marker::BIN16 | marker::BIN32 => Some(Kind::Bin),
        marker::FLOAT32 => Some(Kind::Float32),
        marker::FLOAT64 => Some(Kind::Float64),
        // uint32/uint64/int64 may exceed the i32 range
        marker::UINT8 | marker::UINT16 | marker::INT8 | marker::INT16 | marker::INT32 => {
            Some(Kind::Int32)
        }
        marker::UINT32 | marker::UINT64 | marker::INT64 => Some(Kind::Int64),
        marker::STR8 | marker::STR16 | marker::STR32 => Some(Kind::Str),
        marker::ARRAY16 | marker::ARRAY32 => Some(Kind::Array),
        marker::MAP16 | marker::MAP32 => Some(Kind::Map),
        // 0xc1, ext8/16/32, fixext1-16
        _ => None,
    }
}
