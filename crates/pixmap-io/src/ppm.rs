//! Netpbm (PBM / PGM / PPM) support.
//!
//! Decodes all six variants:
//!
//! | Magic | Kind | Samples |
//! |-------|------|---------|
//! | P1 / P4 | bitmap, ASCII / binary | 1 = black |
//! | P2 / P5 | graymap, ASCII / binary | maxval up to 65535 |
//! | P3 / P6 | pixmap, ASCII / binary | maxval up to 65535 |
//!
//! Samples are rescaled from `0..=maxval` to `0..=255` with rounding;
//! 16-bit binary samples are big-endian. Encoding writes 8-bit P2, P3, P5
//! or P6 and drops alpha.

use crate::codec::{Codec, ensure_encodable};
use crate::{ImageFormat, IoError, IoResult};
use pixmap_core::{Color, PixelBuffer, validate_size};
use std::fmt::Write as _;
use tracing::trace;

/// Output variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PpmType {
    /// P3: ASCII RGB.
    #[default]
    AsciiRgb,
    /// P6: binary RGB.
    BinaryRgb,
    /// P2: ASCII grayscale (BT.601 luminance).
    AsciiGray,
    /// P5: binary grayscale (BT.601 luminance).
    BinaryGray,
}

impl PpmType {
    fn magic(self) -> &'static str {
        match self {
            Self::AsciiRgb => "P3",
            Self::BinaryRgb => "P6",
            Self::AsciiGray => "P2",
            Self::BinaryGray => "P5",
        }
    }
}

/// PPM writer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PpmOptions {
    /// Output variant. Default: ASCII RGB.
    pub kind: PpmType,
}

/// Netpbm codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpmCodec;

/// Parsed header plus the offset of the first sample.
#[derive(Debug, Clone, Copy)]
struct Header {
    magic: u8,
    width: u32,
    height: u32,
    maxval: u32,
    data: usize,
}

/// Whitespace- and comment-aware cursor over the file.
struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn skip_space(&mut self) {
        while let Some(&c) = self.bytes.get(self.pos) {
            if c == b'#' {
                while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn number(&mut self, what: &str) -> IoResult<u32> {
        self.skip_space();
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(&c) = self.bytes.get(self.pos).filter(|c| c.is_ascii_digit()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(c - b'0')))
                .ok_or_else(|| IoError::DecodeError(format!("{what} overflows")))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(IoError::DecodeError(format!("expected {what}")));
        }
        Ok(value)
    }

    /// A single `0` or `1`; plain PBM allows digits without separators.
    fn bit(&mut self) -> IoResult<bool> {
        self.skip_space();
        let bit = match self.bytes.get(self.pos) {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(IoError::DecodeError("expected bitmap digit".into())),
        };
        self.pos += 1;
        Ok(bit)
    }

    /// The single whitespace byte that separates a binary header from data.
    fn separator(&mut self) -> IoResult<()> {
        match self.bytes.get(self.pos) {
            Some(c) if c.is_ascii_whitespace() => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(IoError::DecodeError("missing whitespace after header".into())),
        }
    }
}

fn parse_header(bytes: &[u8]) -> IoResult<Header> {
    let magic = match bytes {
        [b'P', m @ b'1'..=b'6', ..] => *m - b'0',
        _ => return Err(IoError::DecodeError("not a Netpbm file".into())),
    };
    let mut t = Tokens::new(bytes, 2);
    let width = t.number("width")?;
    let height = t.number("height")?;
    let maxval = if matches!(magic, 1 | 4) { 1 } else { t.number("maxval")? };
    if !(1..=65535).contains(&maxval) {
        return Err(IoError::DecodeError(format!("maxval {maxval} out of range 1..=65535")));
    }
    if magic >= 4 {
        t.separator()?;
    }
    Ok(Header { magic, width, height, maxval, data: t.pos })
}

#[inline]
fn rescale(v: u32, maxval: u32) -> u8 {
    ((v * 255 + maxval / 2) / maxval) as u8
}

fn sample_error(v: u32, maxval: u32) -> IoError {
    IoError::DecodeError(format!("sample {v} exceeds maxval {maxval}"))
}

fn decode_body(bytes: &[u8], h: Header, width: u32, height: u32) -> IoResult<Vec<Color>> {
    let count = width as usize * height as usize;
    let channels = match h.magic {
        3 | 6 => 3,
        _ => 1,
    };
    let truncated = || IoError::DecodeError("truncated sample data".into());
    let mut out = Vec::with_capacity(count);

    match h.magic {
        1 => {
            let mut t = Tokens::new(bytes, h.data);
            for _ in 0..count {
                let black = t.bit()?;
                out.push(if black { Color::BLACK } else { Color::WHITE });
            }
        }
        4 => {
            let row_bytes = (width as usize).div_ceil(8);
            let data = bytes.get(h.data..h.data + row_bytes * height as usize).ok_or_else(truncated)?;
            for row in data.chunks_exact(row_bytes.max(1)).take(height as usize) {
                for x in 0..width as usize {
                    let black = row[x / 8] & (0x80 >> (x % 8)) != 0;
                    out.push(if black { Color::BLACK } else { Color::WHITE });
                }
            }
        }
        2 | 3 => {
            let mut t = Tokens::new(bytes, h.data);
            let mut px = [0u8; 3];
            for _ in 0..count {
                for c in px.iter_mut().take(channels) {
                    let v = t.number("sample")?;
                    if v > h.maxval {
                        return Err(sample_error(v, h.maxval));
                    }
                    *c = rescale(v, h.maxval);
                }
                out.push(pixel(&px, channels));
            }
        }
        _ => {
            let wide = h.maxval > 255;
            let sample_bytes = if wide { 2 } else { 1 };
            let len = count * channels * sample_bytes;
            let data = bytes.get(h.data..h.data + len).ok_or_else(truncated)?;
            let mut px = [0u8; 3];
            for chunk in data.chunks_exact(channels * sample_bytes) {
                for (c, s) in px.iter_mut().zip(chunk.chunks_exact(sample_bytes)) {
                    let v = if wide { u32::from(u16::from_be_bytes([s[0], s[1]])) } else { u32::from(s[0]) };
                    if v > h.maxval {
                        return Err(sample_error(v, h.maxval));
                    }
                    *c = rescale(v, h.maxval);
                }
                out.push(pixel(&px, channels));
            }
        }
    }
    Ok(out)
}

#[inline]
fn pixel(px: &[u8; 3], channels: usize) -> Color {
    if channels == 3 { Color::rgb(px[0], px[1], px[2]) } else { Color::gray(px[0]) }
}

/// Appends ASCII samples, wrapping lines before 70 characters.
fn write_ascii(out: &mut String, samples: impl Iterator<Item = u8>) {
    let mut line = 0;
    for v in samples {
        if line > 66 {
            out.push('\n');
            line = 0;
        } else if line > 0 {
            out.push(' ');
            line += 1;
        }
        let before = out.len();
        let _ = write!(out, "{v}");
        line += out.len() - before;
    }
    out.push('\n');
}

impl Codec for PpmCodec {
    type Options = PpmOptions;
    const FORMAT: ImageFormat = ImageFormat::Ppm;
    const EXTENSIONS: &'static [&'static str] = &["ppm", "pgm", "pbm", "pnm"];

    fn size(bytes: &[u8]) -> IoResult<(u32, u32)> {
        let h = parse_header(bytes)?;
        Ok((h.width, h.height))
    }

    fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
        let h = parse_header(bytes)?;
        trace!(magic = h.magic, width = h.width, height = h.height, maxval = h.maxval, "ppm decode");
        let (width, height) = validate_size(h.width, h.height)?;
        let pixels = decode_body(bytes, h, width, height)?;
        Ok(PixelBuffer::from_pixels(width, height, pixels)?)
    }

    fn encode(image: &PixelBuffer, options: &PpmOptions) -> IoResult<Vec<u8>> {
        ensure_encodable(image, ImageFormat::Ppm)?;
        let kind = options.kind;
        trace!(width = image.width(), height = image.height(), ?kind, "ppm encode");
        let header = format!("{}\n{} {}\n255\n", kind.magic(), image.width(), image.height());
        let pixels = image.pixels();
        let rgb = || pixels.iter().flat_map(|p| [p.r, p.g, p.b]);
        let gray = || pixels.iter().map(|p| p.luminance());

        Ok(match kind {
            PpmType::AsciiRgb | PpmType::AsciiGray => {
                let mut text = header;
                if kind == PpmType::AsciiRgb {
                    write_ascii(&mut text, rgb());
                } else {
                    write_ascii(&mut text, gray());
                }
                text.into_bytes()
            }
            PpmType::BinaryRgb => header.into_bytes().into_iter().chain(rgb()).collect(),
            PpmType::BinaryGray => header.into_bytes().into_iter().chain(gray()).collect(),
        })
    }
}
