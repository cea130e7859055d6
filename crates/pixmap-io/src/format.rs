//! Format detection.
//!
//! Magic bytes are checked first; the file extension is only a fallback
//! for data too short or ambiguous to identify.

use std::path::Path;
use tracing::debug;

/// Image formats understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// PNG.
    Png,
    /// Baseline or progressive JPEG.
    Jpeg,
    /// Netpbm family (PBM, PGM, PPM; ASCII and binary).
    Ppm,
    /// WebP, lossy or lossless.
    WebP,
    /// Not yet known; resolved by [`ImageFormat::detect`].
    #[default]
    Unspecified,
}

impl ImageFormat {
    /// Every concrete format.
    pub const ALL: [ImageFormat; 4] = [Self::Png, Self::Jpeg, Self::Ppm, Self::WebP];

    /// Detects the format of `bytes`, using `hint` when the bytes are not
    /// recognized.
    ///
    /// A concrete `hint` format is ignored when the magic bytes say
    /// otherwise.
    pub fn detect(bytes: &[u8], hint: Option<&Path>) -> Self {
        let from_bytes = Self::from_bytes(bytes);
        if from_bytes != Self::Unspecified {
            debug!(format = ?from_bytes, "format detected from magic bytes");
            return from_bytes;
        }
        let from_ext = hint.map_or(Self::Unspecified, Self::from_extension);
        debug!(format = ?from_ext, "format taken from extension");
        from_ext
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Self::Png,
            Some("jpg") | Some("jpeg") | Some("jpe") | Some("jfif") => Self::Jpeg,
            Some("ppm") | Some("pgm") | Some("pbm") | Some("pnm") => Self::Ppm,
            Some("webp") => Self::WebP,
            _ => Self::Unspecified,
        }
    }

    /// Detects format from leading magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // PNG: 0x89 'P' 'N' 'G' CR LF 0x1A LF
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Self::Png;
        }

        // JPEG: SOI followed by a marker
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // WebP: RIFF....WEBP
        if bytes.len() >= 12 && bytes[0..4] == *b"RIFF" && bytes[8..12] == *b"WEBP" {
            return Self::WebP;
        }

        // Netpbm: 'P' '1'..'6' then whitespace
        if bytes.len() >= 3
            && bytes[0] == b'P'
            && (b'1'..=b'6').contains(&bytes[1])
            && bytes[2].is_ascii_whitespace()
        {
            return Self::Ppm;
        }

        Self::Unspecified
    }

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Ppm => "ppm",
            Self::WebP => "webp",
            Self::Unspecified => "",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Ppm => "image/x-portable-pixmap",
            Self::WebP => "image/webp",
            Self::Unspecified => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Ppm => "PPM",
            Self::WebP => "WebP",
            Self::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageFormat::from_extension("a.PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("a.jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("a.pgm"), ImageFormat::Ppm);
        assert_eq!(ImageFormat::from_extension("a.webp"), ImageFormat::WebP);
        assert_eq!(ImageFormat::from_extension("a.bmp"), ImageFormat::Unspecified);
        assert_eq!(ImageFormat::from_extension("noext"), ImageFormat::Unspecified);
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(
            ImageFormat::from_bytes(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            ImageFormat::Png
        );
        assert_eq!(ImageFormat::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_bytes(b"RIFF\0\0\0\0WEBPVP8L"), ImageFormat::WebP);
        assert_eq!(ImageFormat::from_bytes(b"P6\n1 1\n255\n"), ImageFormat::Ppm);
        assert_eq!(ImageFormat::from_bytes(b"P7\n"), ImageFormat::Unspecified);
        assert_eq!(ImageFormat::from_bytes(b"Px"), ImageFormat::Unspecified);
        assert_eq!(ImageFormat::from_bytes(&[]), ImageFormat::Unspecified);
    }

    #[test]
    fn test_magic_beats_extension() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::detect(&png, Some(Path::new("x.jpg"))), ImageFormat::Png);
        assert_eq!(ImageFormat::detect(b"junk", Some(Path::new("x.jpg"))), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::detect(b"junk", None), ImageFormat::Unspecified);
    }
}
