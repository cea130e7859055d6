//! RGBA8 pixel and its floating-point companion.
//!
//! [`Color`] is the storage element of [`crate::PixelBuffer`]: four 8-bit
//! channels laid out `R, G, B, A`. [`ColorF`] carries per-channel `f64`
//! values produced by fractional sampling and filter accumulators; it is
//! re-quantized with round-to-nearest and clamping to `[0, 255]`.
//!
//! # Luminance
//!
//! Luminance uses the BT.601 weights [`LUMA_R`], [`LUMA_G`], [`LUMA_B`]
//! (0.299 / 0.587 / 0.114), rounded to the nearest integer:
//!
//! ```rust
//! use pixmap_core::Color;
//!
//! assert_eq!(Color::new(100, 150, 200, 255).luminance(), 141);
//! ```

/// BT.601 red luminance weight.
pub const LUMA_R: f64 = 0.299;
/// BT.601 green luminance weight.
pub const LUMA_G: f64 = 0.587;
/// BT.601 blue luminance weight.
pub const LUMA_B: f64 = 0.114;

/// Rounds and clamps a float channel into `[0, 255]`.
#[inline]
pub fn quantize(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// An RGBA pixel with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Fully transparent black; the zero value of the buffer.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a color from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Creates an opaque gray level.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 255)
    }

    /// Creates a color from `[r, g, b, a]`.
    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// BT.601 luminance, rounded.
    #[inline]
    pub fn luminance(self) -> u8 {
        quantize(
            LUMA_R * f64::from(self.r) + LUMA_G * f64::from(self.g) + LUMA_B * f64::from(self.b),
        )
    }

    /// Applies `f` to R, G and B, leaving alpha untouched.
    #[inline]
    pub fn map_rgb(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }
}

impl From<[u8; 4]> for Color {
    #[inline]
    fn from(c: [u8; 4]) -> Self {
        Self::from_array(c)
    }
}

impl From<Color> for [u8; 4] {
    #[inline]
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

/// A color with `f64` channels on the same `[0, 255]` scale as [`Color`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorF {
    /// Red channel
    pub r: f64,
    /// Green channel
    pub g: f64,
    /// Blue channel
    pub b: f64,
    /// Alpha channel
    pub a: f64,
}

impl ColorF {
    /// Creates a float color.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Re-quantizes to [`Color`] (round to nearest, clamp).
    #[inline]
    pub fn to_color(self) -> Color {
        Color::new(
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        )
    }

    /// Channels as an array.
    #[inline]
    pub const fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Builds a color from an array of channels.
    #[inline]
    pub const fn from_array(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for ColorF {
    #[inline]
    fn from(c: Color) -> Self {
        Self::new(f64::from(c.r), f64::from(c.g), f64::from(c.b), f64::from(c.a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_luminance_weights() {
        assert_eq!(Color::new(100, 150, 200, 255).luminance(), 141);
        assert_eq!(Color::WHITE.luminance(), 255);
        assert_eq!(Color::BLACK.luminance(), 0);
        assert_relative_eq!(LUMA_R + LUMA_G + LUMA_B, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-3.2), 0);
        assert_eq!(quantize(254.5), 255);
        assert_eq!(quantize(300.0), 255);
        assert_eq!(quantize(127.49), 127);
        assert_eq!(quantize(f64::NAN), 0);
    }

    #[test]
    fn test_colorf_roundtrip() {
        let c = Color::new(1, 2, 3, 4);
        assert_eq!(ColorF::from(c).to_color(), c);
    }

    #[test]
    fn test_map_rgb_keeps_alpha() {
        let c = Color::new(10, 20, 30, 40).map_rgb(|v| 255 - v);
        assert_eq!(c, Color::new(245, 235, 225, 40));
    }
}
