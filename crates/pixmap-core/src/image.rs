//! The [`PixelBuffer`]: a dense, row-major RGBA8 bitmap.
//!
//! # Memory Layout
//!
//! Pixels are stored as one contiguous `Vec<Color>` in row-major order:
//!
//! ```text
//! index = y * width + x
//!
//! Row 0: [P(0,0)] [P(1,0)] ... [P(w-1,0)]
//! Row 1: [P(0,1)] [P(1,1)] ... [P(w-1,1)]
//! ```
//!
//! The invariant `pixels.len() == width * height` holds at all times. The
//! empty buffer is `0x0` with no pixels; asking for a size with exactly one
//! zero dimension also produces the empty buffer.
//!
//! # Access Tiers
//!
//! - [`PixelBuffer::pixel`], [`PixelBuffer::pixel_mut`],
//!   [`PixelBuffer::set_pixel`]: the caller guarantees `x < width` and
//!   `y < height`; checked with `debug_assert!` only.
//! - [`PixelBuffer::get`], [`PixelBuffer::get_mut`],
//!   [`PixelBuffer::try_pixel`]: bounds-validated, returning `Option` or
//!   [`Error::OutOfBounds`].
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//!
//! let mut img = PixelBuffer::filled(4, 3, Color::BLACK)?;
//! img.set_pixel(1, 2, Color::WHITE);
//! assert_eq!(img.pixel(1, 2), Color::WHITE);
//! assert!(img.get(4, 0).is_none());
//! # Ok::<(), pixmap_core::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::pixel::Color;
use crate::rect::{Point, Rect};

/// Largest supported width in pixels.
pub const MAX_WIDTH: u32 = 8192;
/// Largest supported height in pixels.
pub const MAX_HEIGHT: u32 = 8192;

/// Validates a requested size, collapsing a single zero dimension to `0x0`.
pub fn validate_size(width: u32, height: u32) -> Result<(u32, u32)> {
    if width > MAX_WIDTH || height > MAX_HEIGHT {
        return Err(Error::invalid_size(
            width,
            height,
            format!("maximum is {MAX_WIDTH}x{MAX_HEIGHT}"),
        ));
    }
    if width == 0 || height == 0 {
        return Ok((0, 0));
    }
    Ok((width, height))
}

/// Procedural pixel source for [`PixelBuffer::generate`].
///
/// Each variant names the shape of its callback explicitly:
///
/// ```rust
/// use pixmap_core::{Color, Generator, PixelBuffer};
///
/// let ramp = PixelBuffer::generate(
///     3,
///     1,
///     Generator::Normalized(&mut |u, _v| Color::gray((u * 255.0) as u8)),
/// )?;
/// assert_eq!(ramp.pixel(0, 0).r, 0);
/// assert_eq!(ramp.pixel(2, 0).r, 255);
/// # Ok::<(), pixmap_core::Error>(())
/// ```
pub enum Generator<'a> {
    /// Called once per pixel without arguments, in row-major order.
    Fill(&'a mut dyn FnMut() -> Color),
    /// Called with the integer pixel coordinate.
    Pixel(&'a mut dyn FnMut(Point) -> Color),
    /// Called with coordinates normalized to `[0, 1]`.
    ///
    /// `u = x / (width - 1)`; a single column or row maps to `0.0`.
    Normalized(&'a mut dyn FnMut(f64, f64) -> Color),
}

/// A dense 2D RGBA8 bitmap.
///
/// Cloning is a deep copy. [`PixelBuffer::take`] moves the storage out
/// and leaves the source empty.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Creates a buffer of transparent black pixels.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSize`] if a dimension exceeds 8192.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Creates a buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        let (width, height) = validate_size(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        })
    }

    /// The empty `0x0` buffer.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Wraps an existing pixel vector.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSize`] if the size is out of range or
    /// `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let (w, h) = validate_size(width, height)?;
        if pixels.len() != w as usize * h as usize {
            return Err(Error::invalid_size(
                width,
                height,
                format!("expected {} pixels, got {}", w as usize * h as usize, pixels.len()),
            ));
        }
        Ok(Self {
            width: w,
            height: h,
            pixels,
        })
    }

    /// Builds a buffer from tightly packed RGBA8 bytes.
    pub fn from_rgba8_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let (w, h) = validate_size(width, height)?;
        let expected = w as usize * h as usize * 4;
        if bytes.len() != expected {
            return Err(Error::invalid_size(
                width,
                height,
                format!("expected {expected} bytes, got {}", bytes.len()),
            ));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Color::new(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            width: w,
            height: h,
            pixels,
        })
    }

    /// Builds a buffer by calling a generator for every pixel.
    pub fn generate(width: u32, height: u32, generator: Generator<'_>) -> Result<Self> {
        let (width, height) = validate_size(width, height)?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        match generator {
            Generator::Fill(f) => {
                pixels.extend((0..width as usize * height as usize).map(|_| f()));
            }
            Generator::Pixel(f) => {
                for y in 0..height as i32 {
                    for x in 0..width as i32 {
                        pixels.push(f(Point::new(x, y)));
                    }
                }
            }
            Generator::Normalized(f) => {
                let sx = if width > 1 { 1.0 / f64::from(width - 1) } else { 0.0 };
                let sy = if height > 1 { 1.0 / f64::from(height - 1) } else { 0.0 };
                for y in 0..height {
                    for x in 0..width {
                        pixels.push(f(f64::from(x) * sx, f64::from(y) * sy));
                    }
                }
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Converts a row-major grid of any element type.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSize`] if `grid.len() != width * height` or the size
    /// is out of range.
    ///
    /// ```rust
    /// use pixmap_core::{Color, PixelBuffer};
    ///
    /// let heights = [0.0f32, 0.5, 1.0, 0.25];
    /// let img = PixelBuffer::from_grid(2, 2, &heights, |h| Color::gray((h * 255.0) as u8))?;
    /// assert_eq!(img.pixel(0, 1).r, 255);
    /// # Ok::<(), pixmap_core::Error>(())
    /// ```
    pub fn from_grid<T>(
        width: u32,
        height: u32,
        grid: &[T],
        mut converter: impl FnMut(&T) -> Color,
    ) -> Result<Self> {
        if grid.len() != width as usize * height as usize {
            return Err(Error::invalid_size(
                width,
                height,
                format!("grid holds {} elements", grid.len()),
            ));
        }
        let (width, height) = validate_size(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: grid.iter().map(&mut converter).collect(),
        })
    }

    // ========================================================================
    // Dimensions
    // ========================================================================

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Total size of the pixel data in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * 4
    }

    /// Returns `true` for the `0x0` buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounds as a rectangle at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width as i32, self.height as i32)
    }

    /// Returns `true` if `(x, y)` addresses a pixel.
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    // ========================================================================
    // Storage lifecycle
    // ========================================================================

    /// Changes the size, discarding the previous content.
    ///
    /// No-op if the size is unchanged. Content after a size change must be
    /// treated as unspecified by callers; this implementation zero-fills it.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.resize_impl(width, height, None)
    }

    /// Changes the size and sets every pixel to `fill`.
    ///
    /// No-op (content kept) if the size is unchanged.
    pub fn resize_with(&mut self, width: u32, height: u32, fill: Color) -> Result<()> {
        self.resize_impl(width, height, Some(fill))
    }

    fn resize_impl(&mut self, width: u32, height: u32, fill: Option<Color>) -> Result<()> {
        let (width, height) = validate_size(width, height)?;
        if (width, height) == self.size() {
            return Ok(());
        }
        tracing::trace!(width, height, "resize pixel buffer");
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, fill.unwrap_or(Color::TRANSPARENT));
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Empties the buffer, keeping its allocation for reuse.
    pub fn clear(&mut self) {
        self.pixels.clear();
        self.width = 0;
        self.height = 0;
    }

    /// Empties the buffer and frees its allocation.
    pub fn release(&mut self) {
        self.clear();
        self.pixels = Vec::new();
    }

    /// Drops spare capacity.
    pub fn shrink_to_fit(&mut self) {
        self.pixels.shrink_to_fit();
    }

    /// Exchanges contents and dimensions with `other` in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut PixelBuffer) {
        std::mem::swap(self, other);
    }

    /// Moves the contents out, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> PixelBuffer {
        std::mem::take(self)
    }

    // ========================================================================
    // Pixel access
    // ========================================================================

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Reads a pixel. The caller guarantees `x < width`, `y < height`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[self.index(x, y)]
    }

    /// Mutable pixel reference. The caller guarantees the coordinate is valid.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut Color {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = self.index(x, y);
        &mut self.pixels[i]
    }

    /// Writes a pixel. The caller guarantees the coordinate is valid.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        *self.pixel_mut(x, y) = color;
    }

    /// Bounds-checked read.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(i64::from(x), i64::from(y)) {
            Some(self.pixels[self.index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Bounds-checked mutable access.
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Color> {
        if self.in_bounds(i64::from(x), i64::from(y)) {
            let i = self.index(x as u32, y as u32);
            Some(&mut self.pixels[i])
        } else {
            None
        }
    }

    /// Bounds-checked read reporting [`Error::OutOfBounds`].
    pub fn try_pixel(&self, x: i32, y: i32) -> Result<Color> {
        self.get(x, y)
            .ok_or_else(|| Error::out_of_bounds(x, y, self.width, self.height))
    }

    /// Pixels of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Color] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Mutable pixels of row `y`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        let w = self.width as usize;
        &mut self.pixels[start..start + w]
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// All pixels, mutable.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Consumes the buffer, returning its pixel vector.
    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    /// Copies the pixels out as packed RGBA8 bytes.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Iterates `(x, y, color)` in row-major order.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        let w = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, &c)| ((i as u32) % w, (i as u32) / w, c))
    }

    // ========================================================================
    // Whole-buffer helpers
    // ========================================================================

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Color) -> &mut Self {
        self.pixels.fill(color);
        self
    }

    /// Visits every pixel mutably in row-major order.
    pub fn for_each(&mut self, f: impl FnMut(&mut Color)) -> &mut Self {
        self.pixels.iter_mut().for_each(f);
        self
    }

    /// Visits every pixel with its coordinate.
    pub fn for_each_with_pos(&mut self, mut f: impl FnMut(Point, &mut Color)) -> &mut Self {
        let w = self.width as usize;
        for (i, c) in self.pixels.iter_mut().enumerate() {
            f(Point::new((i % w) as i32, (i / w) as i32), c);
        }
        self
    }

    /// Exchanges the red and blue channels (RGBA <-> BGRA).
    pub fn swap_rb(&mut self) -> &mut Self {
        for c in &mut self.pixels {
            std::mem::swap(&mut c.r, &mut c.b);
        }
        self
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}
