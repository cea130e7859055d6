//! The capability every format implements.
//!
//! Formats are a closed set; [`crate::decode`] and [`crate::encode_with`]
//! pick the implementation by matching on [`ImageFormat`].

use crate::{ImageFormat, IoError, IoResult};
use pixmap_core::PixelBuffer;

/// Detect, probe, decode and encode one image format.
///
/// Implementations are stateless; every method works on byte slices.
pub trait Codec {
    /// Encoder options.
    type Options: Default;

    /// Format handled by this codec.
    const FORMAT: ImageFormat;

    /// Recognized file extensions, lowercase, without the dot.
    const EXTENSIONS: &'static [&'static str];

    /// Returns `true` if `header` starts with this format's signature.
    fn is_header(header: &[u8]) -> bool {
        ImageFormat::from_bytes(header) == Self::FORMAT
    }

    /// Reads the dimensions without decoding pixel data.
    fn size(bytes: &[u8]) -> IoResult<(u32, u32)>;

    /// Decodes to RGBA8.
    fn decode(bytes: &[u8]) -> IoResult<PixelBuffer>;

    /// Encodes `image` with `options`.
    fn encode(image: &PixelBuffer, options: &Self::Options) -> IoResult<Vec<u8>>;
}

/// Rejects images a codec cannot represent.
pub(crate) fn ensure_encodable(image: &PixelBuffer, format: ImageFormat) -> IoResult<()> {
    if image.is_empty() {
        return Err(IoError::EncodeError(format!("cannot encode an empty image as {format}")));
    }
    Ok(())
}
