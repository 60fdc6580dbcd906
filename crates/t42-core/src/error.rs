//! Error types for t42

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for t42 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting T.42 colour fax images
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input buffer could not be opened as an image stream
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JPEG marker chain is truncated or corrupt
    #[error("Malformed JPEG: {0}")]
    Malformed(String),

    /// Fatal error reported by the JPEG codec
    #[error("{0}")]
    Codec(String),

    /// Image uses a feature the pipelines cannot handle
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Source JPEG carries no G3FAX application marker
    #[error("Is not ITUFAX.")]
    NotItuFax,

    /// Scanline or output buffer could not be allocated
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Image dimensions are zero or exceed what JPEG can carry
    #[error("Invalid image dimensions: {width}x{height}")]
    Dimensions { width: u32, height: u32 },

    /// Gamut would produce a zero or non-finite code step
    #[error("Invalid gamut: {0}")]
    InvalidGamut(String),

    /// White point would produce a division by zero
    #[error("Invalid white point: {0}")]
    InvalidWhitePoint(String),
}

impl Error {
    /// Copy the error message into a fixed-size, NUL-terminated buffer.
    ///
    /// The message is truncated to `buf.len() - 1` bytes, never splitting a
    /// UTF-8 sequence. Returns the number of message bytes written, not
    /// counting the terminator. An empty buffer receives nothing.
    pub fn write_diagnostic(&self, buf: &mut [u8]) -> usize {
        let Some(capacity) = buf.len().checked_sub(1) else {
            return 0;
        };

        let mut message = self.to_string();
        if message.is_empty() {
            message.push_str("Unspecified JPEG codec error.");
        }

        let mut len = message.len().min(capacity);
        while !message.is_char_boundary(len) {
            len -= 1;
        }

        buf[..len].copy_from_slice(&message.as_bytes()[..len]);
        buf[len] = 0;
        len
    }
}

impl From<jpeg_decoder::Error> for Error {
    fn from(e: jpeg_decoder::Error) -> Self {
        Error::Codec(e.to_string())
    }
}

impl From<jpeg_encoder::EncodingError> for Error {
    fn from(e: jpeg_encoder::EncodingError) -> Self {
        Error::Codec(e.to_string())
    }
}
