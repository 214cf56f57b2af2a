//! [`TagReader`] — the binary stream reader.
//!
//! Converts a byte slice into a sequence of tagged values, hiding the
//! marker-level encoding (fix ranges, variable-width integers, length
//! prefixes). The cursor only ever advances; the type-directed decoder
//! borrows a `TagReader` for the duration of one decode call.

use beanpack_buffers::{BufferError, Reader};

use crate::error::DecodeError;
use crate::tag::{classify, marker, Kind};

/// Reads tagged values sequentially from a byte slice.
pub struct TagReader<'a> {
    r: Reader<'a>,
    /// Header byte of the most recently read tag. Scalar widths and
    /// fix-range lengths are encoded in it.
    m: u8,
}

impl<'a> TagReader<'a> {
    /// Creates a reader over the given input.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            r: Reader::new(input),
            m: marker::NIL,
        }
    }

    /// Current byte offset into the input.
    pub fn offset(&self) -> usize {
        self.r.x
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.r.size()
    }

    #[inline]
    fn lift(&self, err: BufferError) -> DecodeError {
        match err {
            BufferError::EndOfBuffer(offset) => DecodeError::TruncatedStream { offset },
            BufferError::InvalidUtf8(offset) => DecodeError::InvalidUtf8 { offset },
        }
    }

    /// Consumes one header byte and returns the kind of the next value.
    pub fn read_tag(&mut self) -> Result<Kind, DecodeError> {
        let offset = self.r.x;
        let byte = self.r.u8().map_err(|e| self.lift(e))?;
        match classify(byte) {
            Some(kind) => {
                self.m = byte;
                Ok(kind)
            }
            None => Err(DecodeError::MalformedStream {
                marker: byte,
                offset,
            }),
        }
    }

    /// Returns the element/byte count of the most recent tag.
    ///
    /// Valid only immediately after a tag of kind `Str`, `Bin`, `Array` or
    /// `Map`; consumes the tag's trailing length bytes, if any.
    pub fn read_length(&mut self) -> Result<u64, DecodeError> {
        // fixstr / fixmap / fixarray carry the count in the header byte
        if (0xa0..=0xbf).contains(&self.m) {
            return Ok((self.m & 0x1f) as u64);
        }
        if (0x80..=0x9f).contains(&self.m) {
            return Ok((self.m & 0x0f) as u64);
        }
        match self.m {
            marker::STR8 | marker::BIN8 => self.r.u8().map(u64::from).map_err(|e| self.lift(e)),
            marker::STR16 | marker::BIN16 | marker::ARRAY16 | marker::MAP16 => {
                self.r.u16().map(u64::from).map_err(|e| self.lift(e))
            }
            marker::STR32 | marker::BIN32 | marker::ARRAY32 | marker::MAP32 => {
                self.r.u32().map(u64::from).map_err(|e| self.lift(e))
            }
            byte => Err(DecodeError::MalformedStream {
                marker: byte,
                offset: self.r.x,
            }),
        }
    }

    /// Boolean value of the most recent `Bool` tag (no payload bytes).
    pub fn read_bool(&self) -> bool {
        self.m == marker::TRUE
    }

    /// Integer payload of the most recent `Int32`-kind tag.
    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        match self.m {
            byte if byte <= 0x7f => Ok(byte as i32),
            byte if byte >= 0xe0 => Ok(byte as i8 as i32),
            marker::UINT8 => self.r.u8().map(i32::from).map_err(|e| self.lift(e)),
            marker::UINT16 => self.r.u16().map(i32::from).map_err(|e| self.lift(e)),
            marker::INT8 => self.r.i8().map(i32::from).map_err(|e| self.lift(e)),
            marker::INT16 => self.r.i16().map(i32::from).map_err(|e| self.lift(e)),
            marker::INT32 => self.r.i32().map_err(|e| self.lift(e)),
            byte => Err(DecodeError::MalformedStream {
                marker: byte,
                offset: self.r.x,
            }),
        }
    }

    /// Integer payload of the most recent `Int64`-kind tag.
    ///
    /// Returned as `i128` so the full uint64 range is representable.
    pub fn read_i64(&mut self) -> Result<i128, DecodeError> {
        match self.m {
            marker::UINT32 => self.r.u32().map(i128::from).map_err(|e| self.lift(e)),
            marker::UINT64 => self.r.u64().map(i128::from).map_err(|e| self.lift(e)),
            marker::INT64 => self.r.i64().map(i128::from).map_err(|e| self.lift(e)),
            byte => Err(DecodeError::MalformedStream {
                marker: byte,
                offset: self.r.x,
            }),
        }
    }

    /// Float payload of the most recent `Float32` tag.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.r.f32().map_err(|e| self.lift(e))
    }

    /// Float payload of the most recent `Float64` tag.
    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.r.f64().map_err(|e| self.lift(e))
    }

    /// Reads `len` raw bytes then decodes them as UTF-8.
    pub fn read_str(&mut self, len: usize) -> Result<String, DecodeError> {
        self.r
            .utf8(len)
            .map(str::to_owned)
            .map_err(|e| self.lift(e))
    }

    /// Reads `len` raw bytes.
    pub fn read_bin(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        self.r.buf(len).map(<[u8]>::to_vec).map_err(|e| self.lift(e))
    }
}
