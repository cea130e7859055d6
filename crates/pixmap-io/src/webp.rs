//! WebP format support via the `image` crate.
//!
//! Lossy and lossless files decode to RGBA8. The encoder writes lossless
//! VP8L only; `quality` and `method` are validated but a lossy request
//! still produces a lossless file.

use crate::codec::{Codec, ensure_encodable};
use crate::{ImageFormat, IoError, IoResult};
use pixmap_core::PixelBuffer;
use std::io::Cursor;
use tracing::{trace, warn};

/// WebP writer options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebpOptions {
    /// Request lossless compression. Default: true.
    ///
    /// The encoder only writes lossless VP8L: `false` is accepted but the
    /// output is still lossless (and larger than a lossy file would be),
    /// and a `warn!` event is emitted.
    pub lossless: bool,
    /// Quality for lossy compression (0-100). Validated, otherwise unused.
    /// Default: 90.
    pub quality: f32,
    /// Speed / size trade-off (0 = fast, 6 = small). Default: 4.
    pub method: u8,
}

impl Default for WebpOptions {
    fn default() -> Self {
        Self {
            lossless: true,
            quality: 90.0,
            method: 4,
        }
    }
}

impl WebpOptions {
    fn validate(&self) -> IoResult<()> {
        if !(0.0..=100.0).contains(&self.quality) {
            return Err(IoError::EncodeError(format!(
                "WebP quality must be in 0..=100, got {}",
                self.quality
            )));
        }
        if self.method > 6 {
            return Err(IoError::EncodeError(format!(
                "WebP method must be in 0..=6, got {}",
                self.method
            )));
        }
        Ok(())
    }
}

/// WebP codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl Codec for WebpCodec {
    type Options = WebpOptions;
    const FORMAT: ImageFormat = ImageFormat::WebP;
    const EXTENSIONS: &'static [&'static str] = &["webp"];

    fn size(bytes: &[u8]) -> IoResult<(u32, u32)> {
        image::ImageReader::with_format(Cursor::new(bytes), image::ImageFormat::WebP)
            .into_dimensions()
            .map_err(IoError::decode)
    }

    fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::WebP)
            .map_err(IoError::decode)?;
        let (width, height) = (img.width(), img.height());
        trace!(width, height, color = ?img.color(), "webp decode");
        let rgba = img.to_rgba8().into_raw();
        Ok(PixelBuffer::from_rgba8_bytes(width, height, &rgba)?)
    }

    fn encode(image: &PixelBuffer, options: &WebpOptions) -> IoResult<Vec<u8>> {
        options.validate()?;
        ensure_encodable(image, ImageFormat::WebP)?;
        trace!(width = image.width(), height = image.height(), ?options, "webp encode");
        if !options.lossless {
            warn!(quality = options.quality, "lossy WebP not available, writing lossless");
        }

        let mut buffer = Vec::new();
        image::codecs::webp::WebPEncoder::new_lossless(&mut buffer)
            .encode(
                &image.to_rgba8_bytes(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(IoError::encode)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmap_core::{Color, Generator};

    #[test]
    fn test_roundtrip() {
        let img = PixelBuffer::generate(
            17,
            9,
            Generator::Pixel(&mut |p| Color::new((p.x * 15) as u8, (p.y * 28) as u8, 7, 200)),
        )
        .unwrap();
        let bytes = WebpCodec::encode(&img, &WebpOptions::default()).unwrap();
        assert!(WebpCodec::is_header(&bytes));
        assert_eq!(WebpCodec::size(&bytes).unwrap(), (17, 9));
        let back = WebpCodec::decode(&bytes).unwrap();
        assert_eq!(back.size(), (17, 9));
        assert_eq!(back, img);
    }

    #[test]
    fn test_option_validation() {
        let img = PixelBuffer::filled(2, 2, Color::WHITE).unwrap();
        let bad_quality = WebpOptions { quality: 101.0, ..Default::default() };
        let bad_method = WebpOptions { method: 7, ..Default::default() };
        assert!(matches!(WebpCodec::encode(&img, &bad_quality), Err(IoError::EncodeError(_))));
        assert!(matches!(WebpCodec::encode(&img, &bad_method), Err(IoError::EncodeError(_))));
    }

    #[test]
    fn test_lossy_request_writes_lossless() {
        let img = PixelBuffer::generate(
            8,
            8,
            Generator::Pixel(&mut |p| Color::new((p.x * 31) as u8, (p.y * 29) as u8, ((p.x ^ p.y) * 17) as u8, 255)),
        )
        .unwrap();
        let lossy = WebpOptions { lossless: false, quality: 10.0, method: 0 };
        let bytes = WebpCodec::encode(&img, &lossy).unwrap();
        assert_eq!(WebpCodec::decode(&bytes).unwrap(), img);
    }
}
