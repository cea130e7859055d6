//! Pointwise color transforms.
//!
//! Each transform maps one pixel to one pixel and clamps rather than
//! wraps. Functions mutate in place; see [`crate::PixelBufferExt`] for the
//! copying variants.
//!
//! | Transform | RGB | Alpha |
//! |-----------|-----|-------|
//! | [`negate`] | `255 - c` | kept |
//! | [`grayscale`] | BT.601 luminance | kept |
//! | [`sepia`] | `(Y + level, Y, Y - level)` | kept |
//! | [`brighten`] | `c + level` | kept |
//! | [`gamma_correct`] | `255 * (c / 255)^(1 / gamma)` | kept |
//! | [`posterize`] | quantized to `levels` steps | kept |
//! | [`threshold`] | white if luminance `> level` | kept |

use crate::parallel::for_each_pixel;
use crate::{OpsError, OpsResult};
use pixmap_core::{Color, PixelBuffer, quantize};
use tracing::trace;

/// Builds a 256-entry lookup table.
fn lut(f: impl Fn(u8) -> u8) -> [u8; 256] {
    std::array::from_fn(|i| f(i as u8))
}

fn apply_lut(img: &mut PixelBuffer, table: &[u8; 256]) {
    for_each_pixel(img.pixels_mut(), |p| {
        *p = p.map_rgb(|c| table[c as usize]);
    });
}

/// Inverts R, G and B.
pub fn negate(img: &mut PixelBuffer) {
    trace!("negate");
    for_each_pixel(img.pixels_mut(), |p| *p = p.map_rgb(|c| 255 - c));
}

/// Replaces R, G and B with the rounded BT.601 luminance.
///
/// ```rust
/// use pixmap_core::{Color, PixelBuffer};
/// use pixmap_ops::color::grayscale;
///
/// let mut img = PixelBuffer::filled(1, 1, Color::new(100, 150, 200, 255))?;
/// grayscale(&mut img);
/// assert_eq!(img.pixel(0, 0), Color::new(141, 141, 141, 255));
/// # Ok::<(), pixmap_core::Error>(())
/// ```
pub fn grayscale(img: &mut PixelBuffer) {
    trace!("grayscale");
    for_each_pixel(img.pixels_mut(), |p| {
        let y = p.luminance();
        *p = Color::new(y, y, y, p.a);
    });
}

/// Sepia tone: luminance shifted toward red by `level` and away from blue.
pub fn sepia(img: &mut PixelBuffer, level: i32) {
    trace!(level, "sepia");
    for_each_pixel(img.pixels_mut(), |p| {
        let y = i32::from(p.luminance());
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        *p = Color::new(clamp(y + level), y as u8, clamp(y - level), p.a);
    });
}

/// Adds `level` to R, G and B.
pub fn brighten(img: &mut PixelBuffer, level: i32) {
    trace!(level, "brighten");
    let table = lut(|c| (i32::from(c) + level).clamp(0, 255) as u8);
    apply_lut(img, &table);
}

/// Gamma correction `255 * (c / 255)^(1 / gamma)`.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] unless `gamma` is finite and positive.
pub fn gamma_correct(img: &mut PixelBuffer, gamma: f64) -> OpsResult<()> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(OpsError::InvalidParameter(format!("gamma must be > 0, got {gamma}")));
    }
    trace!(gamma, "gamma_correct");
    let inv = 1.0 / gamma;
    let table = lut(|c| quantize(255.0 * (f64::from(c) / 255.0).powf(inv)));
    apply_lut(img, &table);
    Ok(())
}

/// Quantizes each channel into `levels` evenly spaced values
/// (`0` and `255` always included).
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `levels < 2`.
pub fn posterize(img: &mut PixelBuffer, levels: u32) -> OpsResult<()> {
    if levels < 2 {
        return Err(OpsError::InvalidParameter(format!(
            "posterize needs at least 2 levels, got {levels}"
        )));
    }
    trace!(levels, "posterize");
    let n = u64::from(levels);
    let table = lut(|c| {
        let bucket = (u64::from(c) * n / 256).min(n - 1);
        quantize(bucket as f64 * 255.0 / (n - 1) as f64)
    });
    apply_lut(img, &table);
    Ok(())
}

/// Binarizes by luminance: `> level` becomes white, otherwise black.
///
/// `inverse` swaps the two outputs. Alpha is preserved, so applying the
/// same threshold twice yields the same image.
pub fn threshold(img: &mut PixelBuffer, level: u8, inverse: bool) {
    trace!(level, inverse, "threshold");
    for_each_pixel(img.pixels_mut(), |p| {
        let v = if (p.luminance() > level) != inverse { 255 } else { 0 };
        *p = Color::new(v, v, v, p.a);
    });
}

/// Copies the red channel of `alpha` into the alpha channel of `img`.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] if the buffers differ in size.
pub fn apply_alpha_from_r(img: &mut PixelBuffer, alpha: &PixelBuffer) -> OpsResult<()> {
    if img.size() != alpha.size() {
        return Err(pixmap_core::Error::dimension_mismatch(img.size(), alpha.size()).into());
    }
    for (p, a) in img.pixels_mut().iter_mut().zip(alpha.pixels()) {
        p.a = a.r;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(c: Color) -> PixelBuffer {
        PixelBuffer::filled(1, 1, c).unwrap()
    }

    #[test]
    fn test_grayscale_weights() {
        let mut img = one(Color::new(100, 150, 200, 255));
        grayscale(&mut img);
        assert_eq!(img.pixel(0, 0), Color::new(141, 141, 141, 255));
    }

    #[test]
    fn test_negate_keeps_alpha() {
        let mut img = one(Color::new(0, 100, 255, 7));
        negate(&mut img);
        assert_eq!(img.pixel(0, 0), Color::new(255, 155, 0, 7));
        negate(&mut img);
        assert_eq!(img.pixel(0, 0), Color::new(0, 100, 255, 7));
    }

    #[test]
    fn test_sepia_clamps() {
        let mut img = one(Color::gray(240));
        sepia(&mut img, 25);
        assert_eq!(img.pixel(0, 0), Color::new(255, 240, 215, 255));
        let mut dark = one(Color::gray(10));
        sepia(&mut dark, 25);
        assert_eq!(dark.pixel(0, 0), Color::new(35, 10, 0, 255));
    }

    #[test]
    fn test_brighten_clamps() {
        let mut img = one(Color::new(10, 200, 250, 128));
        brighten(&mut img, 20);
        assert_eq!(img.pixel(0, 0), Color::new(30, 220, 255, 128));
        brighten(&mut img, -40);
        assert_eq!(img.pixel(0, 0), Color::new(0, 180, 215, 128));
    }

    #[test]
    fn test_gamma() {
        let mut img = one(Color::new(0, 64, 255, 255));
        gamma_correct(&mut img, 1.0).unwrap();
        assert_eq!(img.pixel(0, 0), Color::new(0, 64, 255, 255));
        gamma_correct(&mut img, 2.0).unwrap();
        // 255 * sqrt(64 / 255) = 127.75
        assert_eq!(img.pixel(0, 0), Color::new(0, 128, 255, 255));
        assert!(gamma_correct(&mut img, 0.0).is_err());
        assert!(gamma_correct(&mut img, f64::NAN).is_err());
    }

    #[test]
    fn test_posterize() {
        let mut img = PixelBuffer::from_pixels(
            4,
            1,
            vec![Color::gray(0), Color::gray(100), Color::gray(130), Color::gray(255)],
        )
        .unwrap();
        posterize(&mut img, 2).unwrap();
        let r: Vec<u8> = img.pixels().iter().map(|p| p.r).collect();
        assert_eq!(r, vec![0, 0, 255, 255]);
        assert!(posterize(&mut img, 1).is_err());
        assert!(posterize(&mut img, 0).is_err());
    }

    #[test]
    fn test_posterize_levels() {
        let mut img = PixelBuffer::generate(256, 1, pixmap_core::Generator::Pixel(&mut |p| Color::gray(p.x as u8)))
            .unwrap();
        posterize(&mut img, 4).unwrap();
        let mut distinct: Vec<u8> = img.pixels().iter().map(|p| p.r).collect();
        distinct.dedup();
        assert_eq!(distinct, vec![0, 85, 170, 255]);
    }

    #[test]
    fn test_threshold_idempotent() {
        let mut img = PixelBuffer::generate(
            16,
            16,
            pixmap_core::Generator::Pixel(&mut |p| Color::new((p.x * 16) as u8, (p.y * 16) as u8, 90, 200)),
        )
        .unwrap();
        threshold(&mut img, 128, false);
        let once = img.clone();
        threshold(&mut img, 128, false);
        assert_eq!(img, once);
        assert!(img.pixels().iter().all(|p| (p.r == 0 || p.r == 255) && p.a == 200));
    }

    #[test]
    fn test_threshold_inverse() {
        let mut img = one(Color::gray(200));
        threshold(&mut img, 128, true);
        assert_eq!(img.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_apply_alpha_from_r() {
        let mut img = PixelBuffer::filled(2, 1, Color::WHITE).unwrap();
        let mask = PixelBuffer::from_pixels(2, 1, vec![Color::gray(0), Color::gray(99)]).unwrap();
        apply_alpha_from_r(&mut img, &mask).unwrap();
        assert_eq!(img.pixel(0, 0).a, 0);
        assert_eq!(img.pixel(1, 0).a, 99);
        let wrong = PixelBuffer::new(3, 1).unwrap();
        assert!(matches!(apply_alpha_from_r(&mut img, &wrong), Err(OpsError::SizeMismatch(_))));
    }
}
