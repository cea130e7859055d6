//! Error types for codec and file operations.

use std::io;
use thiserror::Error;

/// Codec or file failure.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Format could not be determined or is not handled.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed header, truncated data or unsupported subformat.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Invalid encoder options or an image the format cannot hold.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Decoded dimensions rejected by [`pixmap_core::PixelBuffer`].
    #[error(transparent)]
    Core(#[from] pixmap_core::Error),
}

/// Result type for codec operations.
pub type IoResult<T> = Result<T, IoError>;

impl IoError {
    pub(crate) fn decode(e: impl std::fmt::Display) -> Self {
        Self::DecodeError(e.to_string())
    }

    pub(crate) fn encode(e: impl std::fmt::Display) -> Self {
        Self::EncodeError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = IoError::UnsupportedFormat("bmp".into());
        assert_eq!(e.to_string(), "unsupported format: bmp");
        let e: IoError = pixmap_core::Error::invalid_parameter("bad").into();
        assert!(matches!(e, IoError::Core(_)));
    }
}
