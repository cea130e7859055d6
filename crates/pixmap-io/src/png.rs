//! PNG format support.
//!
//! Every color type and bit depth decodes to RGBA8: palettes and
//! low-bit grayscale are expanded, 16-bit samples are reduced to their
//! high byte. Encoding always writes 8-bit RGBA.

use crate::codec::{Codec, ensure_encodable};
use crate::{ImageFormat, IoError, IoResult};
use pixmap_core::PixelBuffer;
use std::io::Cursor;
use tracing::trace;

/// Deflate effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    /// Store only.
    None,
    /// Fastest compression.
    Fastest,
    /// Fast compression.
    Fast,
    /// Balance of speed and size.
    #[default]
    Balanced,
    /// Smallest output.
    High,
}

/// Per-row prediction filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngFilter {
    /// No prediction.
    None,
    /// Left neighbour.
    Sub,
    /// Upper neighbour.
    Up,
    /// Average of left and upper.
    Average,
    /// Paeth predictor.
    Paeth,
    /// Chosen per row by the encoder.
    #[default]
    Adaptive,
}

/// PNG writer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PngOptions {
    /// Deflate effort. Default: balanced.
    pub compression: PngCompression,
    /// Row filter. Default: adaptive.
    pub filter: PngFilter,
}

impl From<PngCompression> for png::Compression {
    fn from(c: PngCompression) -> Self {
        match c {
            PngCompression::None => png::Compression::NoCompression,
            PngCompression::Fastest => png::Compression::Fastest,
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Balanced => png::Compression::Balanced,
            PngCompression::High => png::Compression::High,
        }
    }
}

impl From<PngFilter> for png::Filter {
    fn from(f: PngFilter) -> Self {
        match f {
            PngFilter::None => png::Filter::NoFilter,
            PngFilter::Sub => png::Filter::Sub,
            PngFilter::Up => png::Filter::Up,
            PngFilter::Average => png::Filter::Avg,
            PngFilter::Paeth => png::Filter::Paeth,
            PngFilter::Adaptive => png::Filter::Adaptive,
        }
    }
}

/// PNG codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

fn reader(bytes: &[u8]) -> IoResult<png::Reader<Cursor<&[u8]>>> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    decoder.read_info().map_err(IoError::decode)
}

impl Codec for PngCodec {
    type Options = PngOptions;
    const FORMAT: ImageFormat = ImageFormat::Png;
    const EXTENSIONS: &'static [&'static str] = &["png"];

    fn size(bytes: &[u8]) -> IoResult<(u32, u32)> {
        let reader = reader(bytes)?;
        let info = reader.info();
        Ok((info.width, info.height))
    }

    fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
        let mut reader = reader(bytes)?;
        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
        let mut buf = vec![0u8; buf_size];
        let info = reader.next_frame(&mut buf).map_err(IoError::decode)?;
        let data = &buf[..info.buffer_size()];
        trace!(width = info.width, height = info.height, color = ?info.color_type, "png decode");

        let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
            (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
            (png::ColorType::Rgb, png::BitDepth::Eight) => {
                data.chunks_exact(3).flat_map(|c| [c[0], c[1], c[2], 255]).collect()
            }
            (png::ColorType::Grayscale, png::BitDepth::Eight) => {
                data.iter().flat_map(|&g| [g, g, g, 255]).collect()
            }
            (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
                data.chunks_exact(2).flat_map(|c| [c[0], c[0], c[0], c[1]]).collect()
            }
            (color_type, bit_depth) => {
                return Err(IoError::DecodeError(format!(
                    "unsupported PNG layout {color_type:?} {bit_depth:?}"
                )));
            }
        };
        Ok(PixelBuffer::from_rgba8_bytes(info.width, info.height, &rgba)?)
    }

    fn encode(image: &PixelBuffer, options: &PngOptions) -> IoResult<Vec<u8>> {
        ensure_encodable(image, ImageFormat::Png)?;
        trace!(width = image.width(), height = image.height(), ?options, "png encode");
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(options.compression.into());
            encoder.set_filter(options.filter.into());
            let mut writer = encoder.write_header().map_err(IoError::encode)?;
            writer
                .write_image_data(&image.to_rgba8_bytes())
                .map_err(IoError::encode)?;
            writer.finish().map_err(IoError::encode)?;
        }
        Ok(out)
    }
}
