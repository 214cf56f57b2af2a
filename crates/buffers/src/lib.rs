//! Bounds-checked binary buffer primitives.
//!
//! [`Reader`] reads big-endian values from a byte slice behind a cursor;
//! every read is fallible so truncated input surfaces as an error, never a
//! panic. [`Writer`] is the auto-growing inverse used by encoders.

mod error;
mod reader;
mod writer;

pub use error::BufferError;
pub use reader::Reader;
pub use writer::Writer;
