//! Buffer error type.

use thiserror::Error;

/// Error type for buffer read operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("end of buffer at offset {0}")]
    EndOfBuffer(usize),
    #[error("invalid UTF-8 at offset {0}")]
    InvalidUtf8(usize),
}
