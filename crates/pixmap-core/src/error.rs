//! Error types for pixmap-core operations.
//!
//! The [`Error`] enum covers construction and access failures of
//! [`crate::PixelBuffer`]:
//! - Dimension validation (the 8192 pixel limit)
//! - Parameter validation shared by dependent crates
//! - Checked pixel access
//!
//! # Usage
//!
//! ```rust
//! use pixmap_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! assert!(check(3, 0, 2, 2).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by buffer construction and checked access.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height outside `[0, MAX_WIDTH]` / `[0, MAX_HEIGHT]`, or
    /// a pixel slice whose length does not match `width * height`.
    #[error("invalid size: {width}x{height} ({reason})")]
    InvalidSize {
        /// Requested width
        width: u64,
        /// Requested height
        height: u64,
        /// Why the size was rejected
        reason: String,
    },

    /// An operation parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Checked pixel access outside the buffer.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was accessed
        x: i64,
        /// Y coordinate that was accessed
        y: i64,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Two buffers that must share a size do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First buffer width
        a_width: u32,
        /// First buffer height
        a_height: u32,
        /// Second buffer width
        b_width: u32,
        /// Second buffer height
        b_height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidSize`] error.
    #[inline]
    pub fn invalid_size(width: impl Into<u64>, height: impl Into<u64>, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            width: width.into(),
            height: height.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: impl Into<i64>, y: impl Into<i64>, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x: x.into(),
            y: y.into(),
            width,
            height,
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, -5, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("-5"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_invalid_size() {
        let err = Error::invalid_size(9000u32, 10u32, "exceeds maximum");
        assert!(err.to_string().contains("9000x10"));
        assert!(!err.is_bounds_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let msg = Error::dimension_mismatch((100, 100), (200, 50)).to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x50"));
    }
}
