//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Target size outside `[0, 8192]` or otherwise unusable.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// Invalid parameter value (even aperture, zero levels, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffers that must match in size do not.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Any other core error.
    #[error(transparent)]
    Core(pixmap_core::Error),
}

impl From<pixmap_core::Error> for OpsError {
    fn from(err: pixmap_core::Error) -> Self {
        match err {
            pixmap_core::Error::InvalidSize { .. } => Self::InvalidSize(err.to_string()),
            pixmap_core::Error::InvalidParameter(msg) => Self::InvalidParameter(msg),
            pixmap_core::Error::DimensionMismatch { .. } => Self::SizeMismatch(err.to_string()),
            other => Self::Core(other),
        }
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_size_maps_to_invalid_size() {
        let err: OpsError = pixmap_core::Error::invalid_size(9000u32, 1u32, "too wide").into();
        assert!(matches!(err, OpsError::InvalidSize(msg) if msg.contains("9000x1")));
    }

    #[test]
    fn test_core_bounds_kept() {
        let err: OpsError = pixmap_core::Error::out_of_bounds(1, 2, 1, 1).into();
        assert!(matches!(err, OpsError::Core(e) if e.is_bounds_error()));
    }
}
