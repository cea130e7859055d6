//! Neighbourhood filters: blurs, morphology, adaptive threshold, mosaic
//! and spread.
//!
//! Every filter reads from the immutable source buffer and writes a new
//! one, so rows can be processed in parallel without changing the result.
//!
//! # Filters
//!
//! - [`box_blur`] - Separable box blur, Clamp borders
//! - [`gaussian_blur`] - Separable Gaussian with selectable [`BorderType`]
//! - [`median_blur`] - Per-channel median
//! - [`dilate`] / [`erode`] - 3x3 max / min
//! - [`adaptive_threshold`] - Local mean threshold on luminance
//! - [`mosaic`] - Block averages
//! - [`spread`] - Random neighbourhood displacement
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_ops::filter::{box_blur, median_blur};
//!
//! let img = PixelBuffer::filled(16, 16, Color::gray(90))?;
//! let blurred = box_blur(&img, 2, 2);
//! assert_eq!(blurred.pixel(0, 0), Color::gray(90));
//! assert!(median_blur(&img, 4).is_err());
//! # Ok::<(), pixmap_ops::OpsError>(())
//! ```

use crate::parallel::{for_each_row, transpose};
use crate::{OpsError, OpsResult};
use pixmap_core::sampling::{wrap_clamp, wrap_mirror};
use pixmap_core::{Color, PixelBuffer, quantize};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

/// Edge handling for [`gaussian_blur`].
///
/// ```text
/// Replicate:  aaaaaa|abcdefgh|hhhhhhh
/// Reflect:    fedcba|abcdefgh|hgfedcb
/// Reflect101: gfedcb|abcdefgh|gfedcba
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderType {
    /// Repeat the edge pixel.
    Replicate,
    /// Mirror including the edge pixel.
    Reflect,
    /// Mirror excluding the edge pixel.
    #[default]
    Reflect101,
}

impl BorderType {
    /// Maps `x` into `[0, len)`.
    #[inline]
    pub fn map(self, x: i64, len: u32) -> u32 {
        match self {
            Self::Replicate => wrap_clamp(x, len),
            Self::Reflect => wrap_mirror(x, len),
            Self::Reflect101 => {
                if len == 1 {
                    return 0;
                }
                let period = 2 * (i64::from(len) - 1);
                let t = x.rem_euclid(period);
                if t < i64::from(len) { t as u32 } else { (period - t) as u32 }
            }
        }
    }
}

/// Local mean used by [`adaptive_threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdaptiveMethod {
    /// Unweighted block mean.
    #[default]
    Mean,
    /// Gaussian-weighted block mean.
    Gaussian,
}

// ============================================================================
// Box blur
// ============================================================================

/// Separable box blur with window `2r + 1` per axis and Clamp borders.
///
/// A zero radius leaves that axis untouched.
pub fn box_blur(src: &PixelBuffer, h_radius: u32, v_radius: u32) -> PixelBuffer {
    trace!(width = src.width(), height = src.height(), h_radius, v_radius, "box_blur");
    if src.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = (src.width() as usize, src.height() as usize);
    let mut pixels = src.pixels().to_vec();
    if h_radius > 0 {
        pixels = blur_rows(&pixels, w, h_radius as usize);
    }
    if v_radius > 0 {
        let cols = blur_rows(&transpose(&pixels, w, h), h, v_radius as usize);
        pixels = transpose(&cols, h, w);
    }
    PixelBuffer::from_pixels(src.width(), src.height(), pixels).unwrap_or_default()
}

/// Sliding-window horizontal pass over every row.
fn blur_rows(src: &[Color], width: usize, radius: usize) -> Vec<Color> {
    let mut dst = vec![Color::TRANSPARENT; src.len()];
    let r = radius as i64;
    let window = 2 * r + 1;
    let last = width as i64 - 1;
    let at = |x: i64| x.clamp(0, last) as usize;
    for_each_row(&mut dst, width, |y, row| {
        let line = &src[y * width..(y + 1) * width];
        // Clamped taps left of 0 and right of `last` collapse to the edge pixels.
        let mut sum = [0i64; 4];
        add(&mut sum, line[0], r);
        for &c in &line[..=(r.min(last) as usize)] {
            add(&mut sum, c, 1);
        }
        add(&mut sum, line[last as usize], (r - last).max(0));
        for x in 0..width {
            row[x] = Color::from_array(sum.map(|s| ((s + window / 2) / window) as u8));
            add(&mut sum, line[at(x as i64 + r + 1)], 1);
            add(&mut sum, line[at(x as i64 - r)], -1);
        }
    });
    dst
}

#[inline]
fn add(sum: &mut [i64; 4], c: Color, times: i64) {
    for (s, v) in sum.iter_mut().zip(c.to_array()) {
        *s += times * i64::from(v);
    }
}

// ============================================================================
// Gaussian blur
// ============================================================================

/// Sigma derived from an odd kernel size.
#[inline]
pub fn sigma_for_size(size: u32) -> f64 {
    0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian kernel of odd `size`.
pub fn gaussian_kernel(size: u32) -> Vec<f64> {
    let sigma = sigma_for_size(size);
    let r = (size / 2) as i64;
    let mut k: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = k.iter().sum();
    k.iter_mut().for_each(|v| *v /= sum);
    k
}

fn check_odd(name: &str, size: u32, min: u32) -> OpsResult<()> {
    if size < min || size % 2 == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "{name} must be odd and >= {min}, got {size}"
        )));
    }
    Ok(())
}

/// Separable Gaussian blur.
///
/// `h_size` and `v_size` are kernel widths; both must be odd. A size of 1
/// leaves that axis untouched.
pub fn gaussian_blur(
    src: &PixelBuffer,
    h_size: u32,
    v_size: u32,
    border: BorderType,
) -> OpsResult<PixelBuffer> {
    check_odd("horizontal kernel size", h_size, 1)?;
    check_odd("vertical kernel size", v_size, 1)?;
    trace!(h_size, v_size, ?border, "gaussian_blur");
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    let (w, h) = (src.width() as usize, src.height() as usize);
    let kx = gaussian_kernel(h_size);
    let ky = gaussian_kernel(v_size);
    let (rx, ry) = ((h_size / 2) as i64, (v_size / 2) as i64);

    let mut temp = vec![[0.0f64; 4]; w * h];
    for_each_row(&mut temp, w, |y, row| {
        let line = src.row(y as u32);
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = [0.0; 4];
            for (i, k) in kx.iter().enumerate() {
                let sx = border.map(x as i64 + i as i64 - rx, src.width());
                accumulate(&mut sum, line[sx as usize].to_array().map(f64::from), *k);
            }
            *out = sum;
        }
    });

    let mut dst = vec![Color::TRANSPARENT; w * h];
    for_each_row(&mut dst, w, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = [0.0; 4];
            for (i, k) in ky.iter().enumerate() {
                let sy = border.map(y as i64 + i as i64 - ry, src.height()) as usize;
                accumulate(&mut sum, temp[sy * w + x], *k);
            }
            *out = Color::from_array(sum.map(quantize));
        }
    });
    Ok(PixelBuffer::from_pixels(src.width(), src.height(), dst)?)
}

#[inline]
fn accumulate(sum: &mut [f64; 4], v: [f64; 4], k: f64) {
    for (s, v) in sum.iter_mut().zip(v) {
        *s += v * k;
    }
}

// ============================================================================
// Median
// ============================================================================

/// Per-channel median over an `aperture x aperture` window.
///
/// Borders replicate the edge pixel.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] unless `aperture` is odd and >= 3.
pub fn median_blur(src: &PixelBuffer, aperture: u32) -> OpsResult<PixelBuffer> {
    check_odd("aperture", aperture, 3)?;
    trace!(width = src.width(), height = src.height(), aperture, "median_blur");
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    let r = (aperture / 2) as i64;
    let n = (aperture * aperture) as usize;
    let mut dst = vec![Color::TRANSPARENT; src.pixel_count()];
    for_each_row(&mut dst, src.width() as usize, |y, row| {
        let mut window: [Vec<u8>; 4] = std::array::from_fn(|_| Vec::with_capacity(n));
        for (x, out) in row.iter_mut().enumerate() {
            window.iter_mut().for_each(Vec::clear);
            for dy in -r..=r {
                for dx in -r..=r {
                    let c = src.pixel_clamp(x as i64 + dx, y as i64 + dy).to_array();
                    for ch in 0..4 {
                        window[ch].push(c[ch]);
                    }
                }
            }
            let mid = n / 2;
            *out = Color::from_array(std::array::from_fn(|ch| *window[ch].select_nth_unstable(mid).1));
        }
    });
    Ok(PixelBuffer::from_pixels(src.width(), src.height(), dst)?)
}

// ============================================================================
// Morphology
// ============================================================================

/// Morphological dilation (3x3 max per channel), repeated `iterations` times.
pub fn dilate(src: &PixelBuffer, iterations: u32) -> PixelBuffer {
    trace!(iterations, "dilate");
    morphology_op(src, iterations, u8::max)
}

/// Morphological erosion (3x3 min per channel), repeated `iterations` times.
pub fn erode(src: &PixelBuffer, iterations: u32) -> PixelBuffer {
    trace!(iterations, "erode");
    morphology_op(src, iterations, u8::min)
}

/// Out-of-bounds neighbours are skipped rather than padded.
fn morphology_op(src: &PixelBuffer, iterations: u32, op: fn(u8, u8) -> u8) -> PixelBuffer {
    let mut current = src.clone();
    if current.is_empty() {
        return current;
    }
    let (w, h) = (src.width() as i64, src.height() as i64);
    for _ in 0..iterations {
        let mut next = vec![Color::TRANSPARENT; current.pixel_count()];
        let snapshot = &current;
        for_each_row(&mut next, w as usize, |y, row| {
            let y = y as i64;
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as i64;
                let mut acc = snapshot.pixel(x as u32, y as u32).to_array();
                for ny in (y - 1).max(0)..=(y + 1).min(h - 1) {
                    for nx in (x - 1).max(0)..=(x + 1).min(w - 1) {
                        let c = snapshot.pixel(nx as u32, ny as u32).to_array();
                        for ch in 0..4 {
                            acc[ch] = op(acc[ch], c[ch]);
                        }
                    }
                }
                *out = Color::from_array(acc);
            }
        });
        current = PixelBuffer::from_pixels(src.width(), src.height(), next).unwrap_or_default();
    }
    current
}

// ============================================================================
// Adaptive threshold
// ============================================================================

/// Binarizes luminance against a local mean minus `c`.
///
/// A pixel becomes white when its luminance is greater than the local
/// mean minus `c` (black when `inverse`). Alpha is preserved; the local
/// window replicates edge pixels.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] unless `block_size` is odd and >= 3.
pub fn adaptive_threshold(
    src: &PixelBuffer,
    method: AdaptiveMethod,
    block_size: u32,
    c: f64,
    inverse: bool,
) -> OpsResult<PixelBuffer> {
    check_odd("block size", block_size, 3)?;
    trace!(?method, block_size, c, inverse, "adaptive_threshold");
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    let (w, h) = (src.width() as usize, src.height() as usize);
    let luma: Vec<f64> = src.pixels().iter().map(|p| f64::from(p.luminance())).collect();
    let kernel = match method {
        AdaptiveMethod::Mean => vec![1.0 / f64::from(block_size); block_size as usize],
        AdaptiveMethod::Gaussian => gaussian_kernel(block_size),
    };
    let r = (block_size / 2) as i64;

    let mut temp = vec![0.0f64; w * h];
    for_each_row(&mut temp, w, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(i, k)| k * luma[y * w + wrap_clamp(x as i64 + i as i64 - r, w as u32) as usize])
                .sum();
        }
    });

    let mut dst = src.pixels().to_vec();
    for_each_row(&mut dst, w, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let mean: f64 = kernel
                .iter()
                .enumerate()
                .map(|(i, k)| k * temp[wrap_clamp(y as i64 + i as i64 - r, h as u32) as usize * w + x])
                .sum();
            let above = luma[y * w + x] > mean - c;
            let v = if above != inverse { 255 } else { 0 };
            *out = Color::new(v, v, v, out.a);
        }
    });
    Ok(PixelBuffer::from_pixels(src.width(), src.height(), dst)?)
}

// ============================================================================
// Mosaic / spread
// ============================================================================

/// Replaces each `h_cell x v_cell` block with its average color.
///
/// Blocks on the right and bottom edges may be smaller.
pub fn mosaic(src: &PixelBuffer, h_cell: u32, v_cell: u32) -> OpsResult<PixelBuffer> {
    if h_cell == 0 || v_cell == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "mosaic cell size must be >= 1, got {h_cell}x{v_cell}"
        )));
    }
    trace!(h_cell, v_cell, "mosaic");
    let mut dst = src.clone();
    let (w, h) = src.size();
    for by in (0..h).step_by(v_cell as usize) {
        for bx in (0..w).step_by(h_cell as usize) {
            let (ex, ey) = ((bx + h_cell).min(w), (by + v_cell).min(h));
            let mut sum = [0u64; 4];
            for y in by..ey {
                for p in &src.row(y)[bx as usize..ex as usize] {
                    for (s, v) in sum.iter_mut().zip(p.to_array()) {
                        *s += u64::from(v);
                    }
                }
            }
            let n = u64::from((ex - bx) * (ey - by));
            let avg = Color::from_array(sum.map(|s| ((s + n / 2) / n) as u8));
            for y in by..ey {
                dst.row_mut(y)[bx as usize..ex as usize].fill(avg);
            }
        }
    }
    Ok(dst)
}

/// Replaces each pixel with a random pixel from its `[-h, h] x [-v, v]`
/// neighbourhood, clamped to the buffer.
pub fn spread(src: &PixelBuffer, h: u32, v: u32) -> PixelBuffer {
    spread_with(src, h, v, &mut StdRng::from_entropy())
}

/// [`spread`] with a deterministic seed.
pub fn spread_seeded(src: &PixelBuffer, h: u32, v: u32, seed: u64) -> PixelBuffer {
    spread_with(src, h, v, &mut StdRng::seed_from_u64(seed))
}

/// [`spread`] drawing offsets from `rng` in row-major order.
pub fn spread_with<R: Rng + ?Sized>(src: &PixelBuffer, h: u32, v: u32, rng: &mut R) -> PixelBuffer {
    debug!(h, v, "spread");
    let mut dst = src.clone();
    let (h, v) = (i64::from(h), i64::from(v));
    for y in 0..src.height() {
        for x in 0..src.width() {
            let dx = rng.gen_range(-h..=h);
            let dy = rng.gen_range(-v..=v);
            dst.set_pixel(x, y, src.pixel_clamp(i64::from(x) + dx, i64::from(y) + dy));
        }
    }
    dst
}
