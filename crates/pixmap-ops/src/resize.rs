//! Image resize and resampling operations.
//!
//! # Interpolation
//!
//! - [`Interpolation::Nearest`] - Source pixel under the destination center
//! - [`Interpolation::Linear`] - Bilinear sampling with Clamp borders
//! - [`Interpolation::Cubic`] - Cubic convolution (a = -0.5), radius 2
//! - [`Interpolation::Area`] - Coverage-weighted average of the footprint
//! - [`Interpolation::Lanczos`] - Windowed sinc, radius 3
//! - [`Interpolation::Auto`] - Area when shrinking by more than 2x, else Linear
//!
//! Cubic, Lanczos and Area run as two separable passes (horizontal then
//! vertical). When downscaling, the Cubic and Lanczos support widens by
//! the scale factor so the kernel also low-passes.
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_ops::resize::{scale, Interpolation};
//!
//! let red = PixelBuffer::filled(4, 4, Color::rgb(255, 0, 0))?;
//! let small = scale(&red, 2, 2, Interpolation::Nearest)?;
//! assert!(small.pixels().iter().all(|&c| c == Color::rgb(255, 0, 0)));
//! # Ok::<(), pixmap_ops::OpsError>(())
//! ```

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};
use pixmap_core::{BoundaryMode, Color, PixelBuffer, quantize, validate_size};
use tracing::{debug, trace};

/// Reconstruction kernel used by [`scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    Linear,
    /// Cubic convolution.
    Cubic,
    /// Area averaging.
    Area,
    /// Lanczos, radius 3.
    Lanczos,
    /// Area for strong reductions, otherwise Linear.
    #[default]
    Auto,
}

impl Interpolation {
    /// Resolves [`Interpolation::Auto`] for a concrete size change.
    pub fn resolve(self, src: (u32, u32), dst: (u32, u32)) -> Interpolation {
        match self {
            Self::Auto => {
                let shrinks = u64::from(src.0) > 2 * u64::from(dst.0)
                    || u64::from(src.1) > 2 * u64::from(dst.1);
                if shrinks { Self::Area } else { Self::Linear }
            }
            other => other,
        }
    }

    /// Support radius of the separable kernels.
    #[inline]
    fn support(self) -> f64 {
        match self {
            Self::Cubic => 2.0,
            Self::Lanczos => 3.0,
            _ => 1.0,
        }
    }

    /// Kernel weight at distance `x`.
    #[inline]
    fn weight(self, x: f64) -> f64 {
        match self {
            Self::Cubic => cubic_weight(x),
            Self::Lanczos => lanczos_weight(x, 3.0),
            _ => bilinear_weight(x),
        }
    }
}

/// Triangle weight function.
#[inline]
fn bilinear_weight(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Keys cubic convolution weight with a = -0.5.
#[inline]
fn cubic_weight(x: f64) -> f64 {
    const A: f64 = -0.5;
    let ax = x.abs();
    if ax <= 1.0 {
        (A + 2.0) * ax * ax * ax - (A + 3.0) * ax * ax + 1.0
    } else if ax < 2.0 {
        A * ax * ax * ax - 5.0 * A * ax * ax + 8.0 * A * ax - 4.0 * A
    } else {
        0.0
    }
}

/// Lanczos weight function.
#[inline]
fn lanczos_weight(x: f64, a: f64) -> f64 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f64::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Normalized source weights feeding one destination sample.
#[derive(Debug, Clone)]
struct Contribution {
    start: usize,
    weights: Vec<f64>,
}

/// Builds per-destination contributions for one axis.
fn contributions(src_len: usize, dst_len: usize, interp: Interpolation) -> Vec<Contribution> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| match interp {
            Interpolation::Area => area_contribution(d, scale, src_len),
            _ => kernel_contribution(d, scale, src_len, interp),
        })
        .collect()
}

fn kernel_contribution(d: usize, scale: f64, src_len: usize, interp: Interpolation) -> Contribution {
    let stretch = scale.max(1.0);
    let support = interp.support() * stretch;
    let center = (d as f64 + 0.5) * scale - 0.5;
    let left = ((center - support).floor() as i64).max(0) as usize;
    let right = ((center + support).ceil() as i64).clamp(0, src_len as i64 - 1) as usize;
    let mut weights: Vec<f64> = (left..=right)
        .map(|s| interp.weight((s as f64 - center) / stretch))
        .collect();
    normalize(&mut weights);
    Contribution {
        start: left,
        weights,
    }
}

fn area_contribution(d: usize, scale: f64, src_len: usize) -> Contribution {
    let f0 = d as f64 * scale;
    let f1 = ((d + 1) as f64 * scale).min(src_len as f64);
    let first = f0.floor() as usize;
    let last = ((f1.ceil() as usize).max(first + 1)).min(src_len);
    let mut weights: Vec<f64> = (first..last)
        .map(|s| {
            let lo = f0.max(s as f64);
            let hi = f1.min((s + 1) as f64);
            (hi - lo).max(0.0)
        })
        .collect();
    normalize(&mut weights);
    Contribution {
        start: first.min(src_len - 1),
        weights,
    }
}

fn normalize(weights: &mut [f64]) {
    let sum: f64 = weights.iter().sum();
    if sum.abs() > f64::EPSILON {
        weights.iter_mut().for_each(|w| *w /= sum);
    } else if let Some(first) = weights.first_mut() {
        *first = 1.0;
    }
}

/// Resamples `src` to `width x height`.
///
/// A zero target dimension yields the empty buffer, as does an empty
/// source.
///
/// # Errors
///
/// [`OpsError::InvalidSize`] if a target dimension exceeds 8192.
pub fn scale(src: &PixelBuffer, width: u32, height: u32, interp: Interpolation) -> OpsResult<PixelBuffer> {
    let (width, height) = validate_size(width, height)?;
    trace!(src_w = src.width(), src_h = src.height(), width, height, ?interp, "scale");
    if src.is_empty() || width == 0 {
        return Ok(PixelBuffer::empty());
    }
    let resolved = interp.resolve(src.size(), (width, height));
    if interp == Interpolation::Auto {
        debug!(?resolved, "auto interpolation");
    }
    if src.size() == (width, height) {
        return Ok(src.clone());
    }
    let pixels = match resolved {
        Interpolation::Nearest => scale_nearest(src, width, height),
        Interpolation::Linear | Interpolation::Auto => scale_linear(src, width, height),
        kernel => scale_separable(src, width, height, kernel),
    };
    Ok(PixelBuffer::from_pixels(width, height, pixels)?)
}

/// Scales both axes by `factor`, rounding to at least one pixel.
pub fn scale_by(src: &PixelBuffer, factor: f64, interp: Interpolation) -> OpsResult<PixelBuffer> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "scale factor must be positive, got {factor}"
        )));
    }
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    let dim = |v: u32| (f64::from(v) * factor).round().clamp(1.0, f64::from(u32::MAX)) as u32;
    scale(src, dim(src.width()), dim(src.height()), interp)
}

/// Scales preserving aspect ratio to fit inside `max_w x max_h`.
///
/// With `scale_up == false` an image that already fits is returned
/// unchanged.
pub fn fit(
    src: &PixelBuffer,
    max_w: u32,
    max_h: u32,
    scale_up: bool,
    interp: Interpolation,
) -> OpsResult<PixelBuffer> {
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    if !scale_up && src.width() <= max_w && src.height() <= max_h {
        return Ok(src.clone());
    }
    if max_w == 0 || max_h == 0 {
        return Ok(PixelBuffer::empty());
    }
    let (w, h) = fit_dimensions(src.width(), src.height(), max_w, max_h);
    scale(src, w, h, interp)
}

/// Calculates the aspect-preserving dimensions for a target box.
///
/// ```rust
/// use pixmap_ops::resize::fit_dimensions;
///
/// assert_eq!(fit_dimensions(1920, 1080, 640, 480), (640, 360));
/// ```
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let scale_w = f64::from(max_w) / f64::from(src_w.max(1));
    let scale_h = f64::from(max_h) / f64::from(src_h.max(1));
    let s = scale_w.min(scale_h);
    let new_w = ((f64::from(src_w) * s).round() as u32).clamp(1, max_w.max(1));
    let new_h = ((f64::from(src_h) * s).round() as u32).clamp(1, max_h.max(1));
    (new_w, new_h)
}

fn scale_nearest(src: &PixelBuffer, width: u32, height: u32) -> Vec<Color> {
    let sx = f64::from(src.width()) / f64::from(width);
    let sy = f64::from(src.height()) / f64::from(height);
    let max_x = src.width() - 1;
    let max_y = src.height() - 1;
    let mut dst = vec![Color::TRANSPARENT; width as usize * height as usize];
    for_each_row(&mut dst, width as usize, |y, row| {
        let src_y = (((y as f64 + 0.5) * sy) as u32).min(max_y);
        for (x, p) in row.iter_mut().enumerate() {
            let src_x = (((x as f64 + 0.5) * sx) as u32).min(max_x);
            *p = src.pixel(src_x, src_y);
        }
    });
    dst
}

fn scale_linear(src: &PixelBuffer, width: u32, height: u32) -> Vec<Color> {
    let sx = f64::from(src.width()) / f64::from(width);
    let sy = f64::from(src.height()) / f64::from(height);
    let mut dst = vec![Color::TRANSPARENT; width as usize * height as usize];
    for_each_row(&mut dst, width as usize, |y, row| {
        let fy = (y as f64 + 0.5) * sy - 0.5;
        for (x, p) in row.iter_mut().enumerate() {
            let fx = (x as f64 + 0.5) * sx - 0.5;
            *p = src.sample(fx, fy, BoundaryMode::Clamp).to_color();
        }
    });
    dst
}

/// Two-pass separable resample: horizontal then vertical.
fn scale_separable(src: &PixelBuffer, width: u32, height: u32, interp: Interpolation) -> Vec<Color> {
    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let (dst_w, dst_h) = (width as usize, height as usize);

    let h_contrib = contributions(src_w, dst_w, interp);
    let mut temp = vec![[0.0f32; 4]; dst_w * src_h];
    for_each_row(&mut temp, dst_w, |y, row| {
        let src_row = src.row(y as u32);
        for (out, c) in row.iter_mut().zip(&h_contrib) {
            let mut sum = [0.0f64; 4];
            for (i, w) in c.weights.iter().enumerate() {
                let p = src_row[c.start + i].to_array();
                for ch in 0..4 {
                    sum[ch] += f64::from(p[ch]) * w;
                }
            }
            *out = sum.map(|v| v as f32);
        }
    });

    let v_contrib = contributions(src_h, dst_h, interp);
    let mut dst = vec![Color::TRANSPARENT; dst_w * dst_h];
    for_each_row(&mut dst, dst_w, |y, row| {
        let c = &v_contrib[y];
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = [0.0f64; 4];
            for (i, w) in c.weights.iter().enumerate() {
                let p = temp[(c.start + i) * dst_w + x];
                for ch in 0..4 {
                    sum[ch] += f64::from(p[ch]) * w;
                }
            }
            *out = Color::from_array(sum.map(quantize));
        }
    });
    dst
}
