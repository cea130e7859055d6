//! # pixmap-io
//!
//! Encoding and decoding of [`PixelBuffer`]s.
//!
//! - **PNG** - Lossless with alpha
//! - **JPEG** - Lossy, opaque
//! - **PPM** - Netpbm family, ASCII and binary
//! - **WebP** - Lossy or lossless decode, lossless encode
//!
//! Every format implements [`Codec`]. The free functions below dispatch on
//! [`ImageFormat`], detecting it from magic bytes when the caller passes
//! [`ImageFormat::Unspecified`].
//!
//! # Quick Start
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_io::{decode, encode, ImageFormat};
//!
//! let img = PixelBuffer::filled(4, 3, Color::rgb(10, 20, 30))?;
//! let bytes = encode(&img, ImageFormat::Ppm)?;
//! let back = decode(&bytes, ImageFormat::Unspecified)?;
//! assert_eq!(back, img);
//! # Ok::<(), pixmap_io::IoError>(())
//! ```
//!
//! # Supported Formats
//!
//! | Format | Decode | Encode | Options |
//! |--------|--------|--------|---------|
//! | PNG | any color type, 1-16 bit | RGBA8 | compression, filter |
//! | JPEG | RGB, L8, L16, CMYK | RGB | quality 1-100 |
//! | PPM | P1-P6, maxval up to 65535 | P2, P3, P5, P6 | variant |
//! | WebP | lossy, lossless | lossless | quality, method |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)
//! - `webp` - WebP support (default)
//!
//! PPM is always available.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod codec;
mod error;
mod format;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;
pub mod ppm;
#[cfg(feature = "webp")]
pub mod webp;

pub use codec::Codec;
pub use error::{IoError, IoResult};
pub use format::ImageFormat;

use pixmap_core::PixelBuffer;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Format-specific encoder options; the variant selects the format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeOptions {
    /// PNG options.
    #[cfg(feature = "png")]
    Png(self::png::PngOptions),
    /// JPEG options.
    #[cfg(feature = "jpeg")]
    Jpeg(self::jpeg::JpegOptions),
    /// Netpbm options.
    Ppm(self::ppm::PpmOptions),
    /// WebP options.
    #[cfg(feature = "webp")]
    WebP(self::webp::WebpOptions),
}

impl EncodeOptions {
    /// Default options for `format`.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedFormat`] for [`ImageFormat::Unspecified`] or a
    /// format whose feature is disabled.
    pub fn for_format(format: ImageFormat) -> IoResult<Self> {
        match format {
            #[cfg(feature = "png")]
            ImageFormat::Png => Ok(Self::Png(Default::default())),
            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => Ok(Self::Jpeg(Default::default())),
            ImageFormat::Ppm => Ok(Self::Ppm(Default::default())),
            #[cfg(feature = "webp")]
            ImageFormat::WebP => Ok(Self::WebP(Default::default())),
            #[allow(unreachable_patterns)]
            other => Err(unsupported(other)),
        }
    }

    /// Format these options encode to.
    pub fn format(&self) -> ImageFormat {
        match self {
            #[cfg(feature = "png")]
            Self::Png(_) => ImageFormat::Png,
            #[cfg(feature = "jpeg")]
            Self::Jpeg(_) => ImageFormat::Jpeg,
            Self::Ppm(_) => ImageFormat::Ppm,
            #[cfg(feature = "webp")]
            Self::WebP(_) => ImageFormat::WebP,
        }
    }
}

fn unsupported(format: ImageFormat) -> IoError {
    IoError::UnsupportedFormat(match format {
        ImageFormat::Unspecified => "could not determine image format".into(),
        other => format!("{other} support not compiled in"),
    })
}

/// Magic bytes win; `hint` is used when they are not recognized.
fn resolve(bytes: &[u8], hint: ImageFormat) -> IoResult<ImageFormat> {
    match ImageFormat::from_bytes(bytes) {
        ImageFormat::Unspecified if hint == ImageFormat::Unspecified => Err(unsupported(hint)),
        ImageFormat::Unspecified => Ok(hint),
        detected => Ok(detected),
    }
}

/// Decodes `bytes` to RGBA8.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] if the format cannot be determined
/// - [`IoError::DecodeError`] for malformed or truncated data
pub fn decode(bytes: &[u8], hint: ImageFormat) -> IoResult<PixelBuffer> {
    let format = resolve(bytes, hint)?;
    debug!(%format, len = bytes.len(), "decode");
    match format {
        #[cfg(feature = "png")]
        ImageFormat::Png => self::png::PngCodec::decode(bytes),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => self::jpeg::JpegCodec::decode(bytes),
        ImageFormat::Ppm => self::ppm::PpmCodec::decode(bytes),
        #[cfg(feature = "webp")]
        ImageFormat::WebP => self::webp::WebpCodec::decode(bytes),
        #[allow(unreachable_patterns)]
        other => Err(unsupported(other)),
    }
}

/// Reads image dimensions from the header without decoding pixels.
pub fn image_size(bytes: &[u8], hint: ImageFormat) -> IoResult<(u32, u32)> {
    match resolve(bytes, hint)? {
        #[cfg(feature = "png")]
        ImageFormat::Png => self::png::PngCodec::size(bytes),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => self::jpeg::JpegCodec::size(bytes),
        ImageFormat::Ppm => self::ppm::PpmCodec::size(bytes),
        #[cfg(feature = "webp")]
        ImageFormat::WebP => self::webp::WebpCodec::size(bytes),
        #[allow(unreachable_patterns)]
        other => Err(unsupported(other)),
    }
}

/// Encodes with the format's default options.
pub fn encode(image: &PixelBuffer, format: ImageFormat) -> IoResult<Vec<u8>> {
    encode_with(image, &EncodeOptions::for_format(format)?)
}

/// Encodes with explicit options.
///
/// # Errors
///
/// [`IoError::EncodeError`] for invalid options or an empty image.
pub fn encode_with(image: &PixelBuffer, options: &EncodeOptions) -> IoResult<Vec<u8>> {
    debug!(format = %options.format(), width = image.width(), height = image.height(), "encode");
    match options {
        #[cfg(feature = "png")]
        EncodeOptions::Png(o) => self::png::PngCodec::encode(image, o),
        #[cfg(feature = "jpeg")]
        EncodeOptions::Jpeg(o) => self::jpeg::JpegCodec::encode(image, o),
        EncodeOptions::Ppm(o) => self::ppm::PpmCodec::encode(image, o),
        #[cfg(feature = "webp")]
        EncodeOptions::WebP(o) => self::webp::WebpCodec::encode(image, o),
    }
}

/// Reads an image file, detecting the format from its content and then
/// its extension.
///
/// # Example
///
/// ```rust,ignore
/// let image = pixmap_io::read("input.png")?;
/// println!("Size: {}x{}", image.width(), image.height());
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let hint = ImageFormat::detect(&bytes, Some(path));
    decode(&bytes, hint)
}

/// Reads a color image and takes its alpha channel from the red channel
/// of a second image.
///
/// # Errors
///
/// [`IoError::Core`] if the two images differ in size.
pub fn read_with_alpha<P: AsRef<Path>, Q: AsRef<Path>>(rgb: P, alpha: Q) -> IoResult<PixelBuffer> {
    let mut image = read(rgb)?;
    let mask = read(alpha)?;
    if image.size() != mask.size() {
        return Err(pixmap_core::Error::dimension_mismatch(image.size(), mask.size()).into());
    }
    for (p, m) in image.pixels_mut().iter_mut().zip(mask.pixels()) {
        p.a = m.r;
    }
    Ok(image)
}

/// Saves `image`; [`ImageFormat::Unspecified`] picks the format from the
/// extension.
///
/// The file is written to a temporary sibling and renamed into place, so
/// `path` either holds the complete new image or is left untouched.
pub fn try_save<P: AsRef<Path>>(image: &PixelBuffer, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let format = match format {
        ImageFormat::Unspecified => ImageFormat::from_extension(path),
        f => f,
    };
    try_save_with(image, path, &EncodeOptions::for_format(format)?)
}

/// [`try_save`] with explicit encoder options.
pub fn try_save_with<P: AsRef<Path>>(image: &PixelBuffer, path: P, options: &EncodeOptions) -> IoResult<()> {
    let path = path.as_ref();
    let bytes = encode_with(image, options)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| IoError::Io(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "saved");
    Ok(())
}

/// [`try_save`] reporting only success.
pub fn save<P: AsRef<Path>>(image: &PixelBuffer, path: P, format: ImageFormat) -> bool {
    let path = path.as_ref();
    match try_save(image, path, format) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "save failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmap_core::Color;

    #[test]
    fn test_resolve_prefers_magic() {
        assert_eq!(resolve(b"P3 1 1 255\n0 0 0\n", ImageFormat::Png).unwrap(), ImageFormat::Ppm);
        assert_eq!(resolve(b"????", ImageFormat::Jpeg).unwrap(), ImageFormat::Jpeg);
        assert!(matches!(
            resolve(b"????", ImageFormat::Unspecified),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_encode_unspecified_fails() {
        let img = PixelBuffer::filled(1, 1, Color::WHITE).unwrap();
        assert!(matches!(
            encode(&img, ImageFormat::Unspecified),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_options_format() {
        for format in ImageFormat::ALL {
            assert_eq!(EncodeOptions::for_format(format).unwrap().format(), format);
        }
    }
}
