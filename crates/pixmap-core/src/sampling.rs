//! Boundary policies and bilinear sampling.
//!
//! Maps out-of-range integer coordinates to in-range ones and blends the
//! four neighbours of a fractional coordinate.
//!
//! | Mode | Mapping |
//! |------|---------|
//! | [`BoundaryMode::Repeat`] | floor-mod, tiles the image |
//! | [`BoundaryMode::Clamp`] | saturate to `[0, len-1]` |
//! | [`BoundaryMode::Mirror`] | `t = x mod 2len`; `t` if `t < len`, else `2len-1-t` |
//!
//! ```rust
//! use pixmap_core::sampling::{wrap_mirror, wrap_repeat};
//!
//! assert_eq!(wrap_repeat(-1, 4), 3);
//! assert_eq!(wrap_mirror(4, 4), 3);
//! assert_eq!(wrap_mirror(-1, 4), 0);
//! ```

use crate::image::PixelBuffer;
use crate::pixel::{Color, ColorF};

/// How coordinates outside the buffer are mapped back inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryMode {
    /// Tile the image infinitely.
    Repeat,
    /// Extend edge pixels.
    #[default]
    Clamp,
    /// Reflect at the edges with period `2 * len`.
    Mirror,
}

impl BoundaryMode {
    /// Maps `x` into `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn wrap(self, x: i64, len: u32) -> u32 {
        match self {
            Self::Repeat => wrap_repeat(x, len),
            Self::Clamp => wrap_clamp(x, len),
            Self::Mirror => wrap_mirror(x, len),
        }
    }
}

/// Floor-mod wrap, always non-negative.
#[inline]
pub fn wrap_repeat(x: i64, len: u32) -> u32 {
    debug_assert!(len > 0);
    x.rem_euclid(i64::from(len)) as u32
}

/// Saturates to `[0, len - 1]`.
#[inline]
pub fn wrap_clamp(x: i64, len: u32) -> u32 {
    debug_assert!(len > 0);
    x.clamp(0, i64::from(len) - 1) as u32
}

/// Mirror tiling with period `2 * len`; edge pixels are repeated once.
#[inline]
pub fn wrap_mirror(x: i64, len: u32) -> u32 {
    debug_assert!(len > 0);
    let len = i64::from(len);
    let t = x.rem_euclid(2 * len);
    if t < len { t as u32 } else { (2 * len - 1 - t) as u32 }
}

/// Bilinear blend of four samples.
///
/// `c1..c4` are top-left, top-right, bottom-left, bottom-right; `px`, `py`
/// are the fractional offsets in `[0, 1)`.
#[inline]
pub fn bilinear(c1: ColorF, c2: ColorF, c3: ColorF, c4: ColorF, px: f64, py: f64) -> ColorF {
    let lerp = |a: f64, b: f64, c: f64, d: f64| a + px * (b - a) + py * (c - a) + px * py * (a - b - c + d);
    ColorF::new(
        lerp(c1.r, c2.r, c3.r, c4.r),
        lerp(c1.g, c2.g, c3.g, c4.g),
        lerp(c1.b, c2.b, c3.b, c4.b),
        lerp(c1.a, c2.a, c3.a, c4.a),
    )
}

/// Brings a fractional coordinate into one period of `mode` before the
/// integer conversion, so huge inputs cannot saturate `i64`.
///
/// Outside `[-1, len]` both Clamp neighbours are the same edge pixel.
#[inline]
fn reduce(v: f64, len: u32, mode: BoundaryMode) -> f64 {
    let len = f64::from(len);
    match mode {
        BoundaryMode::Repeat => v.rem_euclid(len),
        BoundaryMode::Mirror => v.rem_euclid(2.0 * len),
        BoundaryMode::Clamp => v.clamp(-1.0, len),
    }
}

impl PixelBuffer {
    /// Reads a pixel at any integer coordinate under `mode`.
    ///
    /// Returns transparent black for an empty buffer.
    #[inline]
    pub fn pixel_wrapped(&self, x: i64, y: i64, mode: BoundaryMode) -> Color {
        if self.is_empty() {
            return Color::TRANSPARENT;
        }
        self.pixel(mode.wrap(x, self.width()), mode.wrap(y, self.height()))
    }

    /// [`pixel_wrapped`](Self::pixel_wrapped) with [`BoundaryMode::Repeat`].
    #[inline]
    pub fn pixel_repeat(&self, x: i64, y: i64) -> Color {
        self.pixel_wrapped(x, y, BoundaryMode::Repeat)
    }

    /// [`pixel_wrapped`](Self::pixel_wrapped) with [`BoundaryMode::Clamp`].
    #[inline]
    pub fn pixel_clamp(&self, x: i64, y: i64) -> Color {
        self.pixel_wrapped(x, y, BoundaryMode::Clamp)
    }

    /// [`pixel_wrapped`](Self::pixel_wrapped) with [`BoundaryMode::Mirror`].
    #[inline]
    pub fn pixel_mirror(&self, x: i64, y: i64) -> Color {
        self.pixel_wrapped(x, y, BoundaryMode::Mirror)
    }

    /// Bilinearly samples a fractional coordinate.
    ///
    /// Pixel `(i, j)` is located at `(i, j)`: sampling exactly on an integer
    /// coordinate returns that pixel. Each of the four neighbours is wrapped
    /// independently under `mode`.
    ///
    /// ```rust
    /// use pixmap_core::{BoundaryMode, Color, PixelBuffer};
    ///
    /// let mut img = PixelBuffer::filled(2, 1, Color::BLACK)?;
    /// img.set_pixel(1, 0, Color::WHITE);
    /// let mid = img.sample(0.5, 0.0, BoundaryMode::Clamp).to_color();
    /// assert_eq!(mid.r, 128);
    /// # Ok::<(), pixmap_core::Error>(())
    /// ```
    pub fn sample(&self, x: f64, y: f64, mode: BoundaryMode) -> ColorF {
        if self.is_empty() || !x.is_finite() || !y.is_finite() {
            return ColorF::default();
        }
        let x = reduce(x, self.width(), mode);
        let y = reduce(y, self.height(), mode);
        let fx = x.floor();
        let fy = y.floor();
        let (ix, iy) = (fx as i64, fy as i64);
        let (nx, ny) = (ix.saturating_add(1), iy.saturating_add(1));
        let c1 = self.pixel_wrapped(ix, iy, mode).into();
        let c2 = self.pixel_wrapped(nx, iy, mode).into();
        let c3 = self.pixel_wrapped(ix, ny, mode).into();
        let c4 = self.pixel_wrapped(nx, ny, mode).into();
        bilinear(c1, c2, c3, c4, x - fx, y - fy)
    }

    /// [`sample`](Self::sample) with [`BoundaryMode::Repeat`].
    #[inline]
    pub fn sample_repeat(&self, x: f64, y: f64) -> ColorF {
        self.sample(x, y, BoundaryMode::Repeat)
    }

    /// [`sample`](Self::sample) with [`BoundaryMode::Clamp`].
    #[inline]
    pub fn sample_clamp(&self, x: f64, y: f64) -> ColorF {
        self.sample(x, y, BoundaryMode::Clamp)
    }

    /// [`sample`](Self::sample) with [`BoundaryMode::Mirror`].
    #[inline]
    pub fn sample_mirror(&self, x: f64, y: f64) -> ColorF {
        self.sample(x, y, BoundaryMode::Mirror)
    }
}
