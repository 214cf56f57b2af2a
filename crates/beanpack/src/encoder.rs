//! [`Encoder`] — serializes a [`Value`] graph back to the wire format.
//!
//! Always picks the smallest marker that can represent a value. Integers are
//! never collapsed to floats (and vice versa); records encode as plain field
//! maps with string keys and no discriminator entry.

use beanpack_buffers::Writer;

use crate::tag::marker;
use crate::value::Value;

/// Encodes [`Value`] graphs, reusing one growable buffer across calls.
#[derive(Default)]
pub struct Encoder {
    writer: Writer,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes one value and returns the produced bytes.
    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    /// Writes one value recursively.
    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Null => self.write_nil(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_int(*i),
            Value::UInt(u) => self.write_uint(*u),
            Value::Float(f) => self.write_float(*f),
            Value::Str(s) => self.write_str(s),
            Value::Bytes(b) => self.write_bin(b),
            Value::Array(items) => {
                self.write_array_header(items.len());
                for item in items {
                    self.write_any(item);
                }
            }
            Value::Map(entries) => {
                self.write_map_header(entries.len());
                for (key, value) in entries {
                    self.write_any(key);
                    self.write_any(value);
                }
            }
            Value::Record(record) => {
                self.write_map_header(record.fields.len());
                for (name, value) in &record.fields {
                    self.write_str(name);
                    self.write_any(value);
                }
            }
        }
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(marker::NIL);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.writer.u8(if b { marker::TRUE } else { marker::FALSE });
    }

    /// Writes a signed integer using the smallest representation.
    pub fn write_int(&mut self, i: i64) {
        if i >= 0 {
            match i {
                0..=0x7f => self.writer.u8(i as u8),
                0x80..=0xff => {
                    self.writer.u8(marker::UINT8);
                    self.writer.u8(i as u8);
                }
                0x100..=0xffff => self.writer.u8u16(marker::UINT16, i as u16),
                0x1_0000..=0xffff_ffff => self.writer.u8u32(marker::UINT32, i as u32),
                _ => {
                    self.writer.u8(marker::INT64);
                    self.writer.i64(i);
                }
            }
        } else if i >= -32 {
            // negative fixint
            self.writer.u8(i as u8);
        } else if i >= i8::MIN as i64 {
            self.writer.u8(marker::INT8);
            self.writer.i8(i as i8);
        } else if i >= i16::MIN as i64 {
            self.writer.u8(marker::INT16);
            self.writer.i16(i as i16);
        } else if i >= i32::MIN as i64 {
            self.writer.u8(marker::INT32);
            self.writer.i32(i as i32);
        } else {
            self.writer.u8(marker::INT64);
            self.writer.i64(i);
        }
    }

    /// Writes an unsigned integer using the smallest representation.
    pub fn write_uint(&mut self, u: u64) {
        if u > i64::MAX as u64 {
            self.writer.u8u64(marker::UINT64, u);
        } else {
            self.write_int(u as i64);
        }
    }

    pub fn write_float(&mut self, f: f64) {
        self.writer.u8f64(marker::FLOAT64, f);
    }

    pub fn write_str(&mut self, s: &str) {
        let len = s.len();
        if len <= 0x1f {
            self.writer.u8(0xa0 | len as u8);
        } else if len <= 0xff {
            self.writer.u8(marker::STR8);
            self.writer.u8(len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(marker::STR16, len as u16);
        } else {
            self.writer.u8u32(marker::STR32, len as u32);
        }
        self.writer.utf8(s);
    }

    pub fn write_bin(&mut self, b: &[u8]) {
        let len = b.len();
        if len <= 0xff {
            self.writer.u8(marker::BIN8);
            self.writer.u8(len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(marker::BIN16, len as u16);
        } else {
            self.writer.u8u32(marker::BIN32, len as u32);
        }
        self.writer.buf(b);
    }

    pub fn write_array_header(&mut self, len: usize) {
        if len <= 0x0f {
            self.writer.u8(0x90 | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(marker::ARRAY16, len as u16);
        } else {
            self.writer.u8u32(marker::ARRAY32, len as u32);
        }
    }

    pub fn write_map_header(&mut self, len: usize) {
        if len <= 0x0f {
            self.writer.u8(0x80 | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(marker::MAP16, len as u16);
        } else {
            self.writer.u8u32(marker::MAP32, len as u32);
        }
    }
}
