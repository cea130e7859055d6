//! JPEG format support.
//!
//! Decoding accepts RGB, 8- and 16-bit grayscale and CMYK streams and
//! always yields opaque RGBA8. Encoding drops alpha.

use crate::codec::{Codec, ensure_encodable};
use crate::{ImageFormat, IoError, IoResult};
use pixmap_core::PixelBuffer;
use std::io::Cursor;
use tracing::trace;

/// JPEG writer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Quality level 1-100. Higher = better quality, larger files.
    /// Default: 90.
    pub quality: u8,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// JPEG codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl Codec for JpegCodec {
    type Options = JpegOptions;
    const FORMAT: ImageFormat = ImageFormat::Jpeg;
    const EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "jpe", "jfif"];

    fn size(bytes: &[u8]) -> IoResult<(u32, u32)> {
        let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
        decoder.read_info().map_err(IoError::decode)?;
        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;
        Ok((u32::from(info.width), u32::from(info.height)))
    }

    fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
        let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
        let pixels = decoder.decode().map_err(IoError::decode)?;
        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;
        trace!(width = info.width, height = info.height, format = ?info.pixel_format, "jpeg decode");

        let rgba: Vec<u8> = match info.pixel_format {
            jpeg_decoder::PixelFormat::RGB24 => {
                pixels.chunks_exact(3).flat_map(|c| [c[0], c[1], c[2], 255]).collect()
            }
            jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            // high byte first
            jpeg_decoder::PixelFormat::L16 => {
                pixels.chunks_exact(2).flat_map(|l| [l[0], l[0], l[0], 255]).collect()
            }
            jpeg_decoder::PixelFormat::CMYK32 => pixels
                .chunks_exact(4)
                .flat_map(|cmyk| {
                    let k = 255 - u32::from(cmyk[3]);
                    let ch = |v: u8| ((255 - u32::from(v)) * k / 255) as u8;
                    [ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2]), 255]
                })
                .collect(),
        };
        Ok(PixelBuffer::from_rgba8_bytes(
            u32::from(info.width),
            u32::from(info.height),
            &rgba,
        )?)
    }

    fn encode(image: &PixelBuffer, options: &JpegOptions) -> IoResult<Vec<u8>> {
        if !(1..=100).contains(&options.quality) {
            return Err(IoError::EncodeError(format!(
                "JPEG quality must be in 1..=100, got {}",
                options.quality
            )));
        }
        ensure_encodable(image, ImageFormat::Jpeg)?;
        trace!(width = image.width(), height = image.height(), quality = options.quality, "jpeg encode");

        let (w, h) = (image.width() as u16, image.height() as u16);
        let mut buffer = Vec::new();
        let encoder = jpeg_encoder::Encoder::new(&mut buffer, options.quality);
        encoder
            .encode(&image.to_rgba8_bytes(), w, h, jpeg_encoder::ColorType::Rgba)
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmap_core::{Color, Generator};

    fn gradient() -> PixelBuffer {
        PixelBuffer::generate(
            32,
            24,
            Generator::Normalized(&mut |u, v| Color::new((u * 255.0) as u8, (v * 255.0) as u8, 128, 255)),
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip_within_tolerance() {
        let img = gradient();
        let bytes = JpegCodec::encode(&img, &JpegOptions { quality: 95 }).unwrap();
        assert!(JpegCodec::is_header(&bytes));
        assert_eq!(JpegCodec::size(&bytes).unwrap(), (32, 24));

        let back = JpegCodec::decode(&bytes).unwrap();
        assert_eq!(back.size(), img.size());
        let total: u64 = img
            .to_rgba8_bytes()
            .iter()
            .zip(back.to_rgba8_bytes())
            .map(|(&a, b)| u64::from(a.abs_diff(b)))
            .sum();
        let mae = total as f64 / (img.pixel_count() * 4) as f64;
        assert!(mae < 10.0, "mae = {mae}");
    }

    #[test]
    fn test_alpha_is_dropped() {
        let img = PixelBuffer::filled(8, 8, Color::new(200, 100, 50, 10)).unwrap();
        let bytes = JpegCodec::encode(&img, &JpegOptions::default()).unwrap();
        let back = JpegCodec::decode(&bytes).unwrap();
        assert!(back.pixels().iter().all(|p| p.a == 255));
    }

    #[test]
    fn test_quality_validation() {
        let img = gradient();
        assert!(matches!(
            JpegCodec::encode(&img, &JpegOptions { quality: 0 }),
            Err(IoError::EncodeError(_))
        ));
        assert!(matches!(
            JpegCodec::encode(&img, &JpegOptions { quality: 101 }),
            Err(IoError::EncodeError(_))
        ));
        assert!(JpegCodec::encode(&img, &JpegOptions { quality: 1 }).is_ok());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(JpegCodec::decode(&[0xFF, 0xD8, 0xFF, 0x00]), Err(IoError::DecodeError(_))));
    }
}
