//! Exact geometric transforms: clipping, rotation, mirroring, borders and
//! compositing one buffer onto another.
//!
//! None of these interpolate; every output pixel is a copy of a source
//! pixel or a fill color. Resampling lives in [`crate::resize`].
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer, Rect};
//! use pixmap_ops::geometry::{clip, rotate90};
//!
//! let img = PixelBuffer::filled(8, 4, Color::WHITE)?;
//! assert_eq!(rotate90(&img).size(), (4, 8));
//! assert_eq!(clip(&img, Rect::new(6, 2, 10, 10)).size(), (2, 2));
//! assert!(clip(&img, Rect::new(20, 0, 4, 4)).is_empty());
//! # Ok::<(), pixmap_core::Error>(())
//! ```

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};
use pixmap_core::{Color, PixelBuffer, Rect, quantize, validate_size};
use tracing::trace;

/// Copies the part of `src` covered by `rect`.
///
/// `rect` is intersected with the buffer bounds; no overlap yields the
/// empty buffer.
pub fn clip(src: &PixelBuffer, rect: Rect) -> PixelBuffer {
    trace!(x = rect.x, y = rect.y, w = rect.width, h = rect.height, "clip");
    let Some(r) = rect.intersect(&src.bounds()) else {
        return PixelBuffer::empty();
    };
    let (x0, w) = (r.x as usize, r.width as usize);
    let mut pixels = Vec::with_capacity(w * r.height as usize);
    for y in r.y..r.y + r.height {
        pixels.extend_from_slice(&src.row(y as u32)[x0..x0 + w]);
    }
    PixelBuffer::from_pixels(r.width as u32, r.height as u32, pixels).unwrap_or_default()
}

/// Largest centered square.
pub fn square_clipped(src: &PixelBuffer) -> PixelBuffer {
    let (w, h) = src.size();
    let side = w.min(h);
    clip(
        src,
        Rect::new(((w - side) / 2) as i32, ((h - side) / 2) as i32, side as i32, side as i32),
    )
}

/// Rotates 90 degrees clockwise.
pub fn rotate90(src: &PixelBuffer) -> PixelBuffer {
    let (w, h) = src.size();
    rotated(src, h, w, |x, y| src.pixel(y, h - 1 - x))
}

/// Rotates 180 degrees.
pub fn rotate180(src: &PixelBuffer) -> PixelBuffer {
    let mut pixels = src.pixels().to_vec();
    pixels.reverse();
    PixelBuffer::from_pixels(src.width(), src.height(), pixels).unwrap_or_default()
}

/// Rotates 270 degrees clockwise (90 counter-clockwise).
pub fn rotate270(src: &PixelBuffer) -> PixelBuffer {
    let (w, h) = src.size();
    rotated(src, h, w, |x, y| src.pixel(w - 1 - y, x))
}

fn rotated<F>(src: &PixelBuffer, dst_w: u32, dst_h: u32, fetch: F) -> PixelBuffer
where
    F: Fn(u32, u32) -> Color + Send + Sync,
{
    if src.is_empty() {
        return PixelBuffer::empty();
    }
    let mut pixels = vec![Color::TRANSPARENT; src.pixel_count()];
    for_each_row(&mut pixels, dst_w as usize, |y, row| {
        for (x, p) in row.iter_mut().enumerate() {
            *p = fetch(x as u32, y as u32);
        }
    });
    PixelBuffer::from_pixels(dst_w, dst_h, pixels).unwrap_or_default()
}

/// Horizontal flip (left <-> right).
pub fn mirror(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = src.clone();
    let w = dst.width() as usize;
    for_each_row(dst.pixels_mut(), w, |_, row| row.reverse());
    dst
}

/// Vertical flip (top <-> bottom).
pub fn flip(src: &PixelBuffer) -> PixelBuffer {
    let w = src.width() as usize;
    let pixels: Vec<Color> = src
        .pixels()
        .chunks(w.max(1))
        .rev()
        .flatten()
        .copied()
        .collect();
    PixelBuffer::from_pixels(src.width(), src.height(), pixels).unwrap_or_default()
}

/// Adds a uniform border of `thickness` pixels.
pub fn border(src: &PixelBuffer, thickness: i32, color: Color) -> OpsResult<PixelBuffer> {
    border_sides(src, thickness, thickness, thickness, thickness, color)
}

/// Adds per-side borders, copying `src` to `(left, top)`.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] for a negative margin
/// - [`OpsError::InvalidSize`] if the result exceeds 8192 in either axis
pub fn border_sides(
    src: &PixelBuffer,
    top: i32,
    right: i32,
    bottom: i32,
    left: i32,
    color: Color,
) -> OpsResult<PixelBuffer> {
    trace!(top, right, bottom, left, "border");
    if top < 0 || right < 0 || bottom < 0 || left < 0 {
        return Err(OpsError::InvalidParameter(format!(
            "border margins must be non-negative, got ({top}, {right}, {bottom}, {left})"
        )));
    }
    if src.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    let new_w = u64::from(src.width()) + left as u64 + right as u64;
    let new_h = u64::from(src.height()) + top as u64 + bottom as u64;
    let (new_w, new_h) = validate_size(
        u32::try_from(new_w).unwrap_or(u32::MAX),
        u32::try_from(new_h).unwrap_or(u32::MAX),
    )?;
    let mut dst = PixelBuffer::filled(new_w, new_h, color)?;
    overwrite(&mut dst, src, left, top);
    Ok(dst)
}

/// Source and destination spans of `src` placed at `(x, y)` inside `dst`.
fn placement(dst: &PixelBuffer, src: &PixelBuffer, x: i32, y: i32) -> Option<(Rect, i32, i32)> {
    let placed = Rect::new(x, y, src.width() as i32, src.height() as i32);
    let r = placed.intersect(&dst.bounds())?;
    Some((r, r.x - x, r.y - y))
}

/// Copies `src` into `dst` at `(x, y)`, replacing pixels verbatim.
///
/// Parts falling outside `dst` are dropped.
pub fn overwrite(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32) {
    let Some((r, sx, sy)) = placement(dst, src, x, y) else {
        return;
    };
    let (w, sx) = (r.width as usize, sx as usize);
    for row in 0..r.height {
        let src_row = &src.row((sy + row) as u32)[sx..sx + w];
        let dst_row = dst.row_mut((r.y + row) as u32);
        dst_row[r.x as usize..r.x as usize + w].copy_from_slice(src_row);
    }
}

/// Alpha-blends `src`, modulated by `tint`, onto `dst` at `(x, y)`.
///
/// Uses the "over" operator on straight (non-premultiplied) alpha.
pub fn paint(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32, tint: Color) {
    let Some((r, sx, sy)) = placement(dst, src, x, y) else {
        return;
    };
    trace!(x, y, w = r.width, h = r.height, "paint");
    let tint = [tint.r, tint.g, tint.b, tint.a].map(|c| f64::from(c) / 255.0);
    for row in 0..r.height {
        for col in 0..r.width {
            let s = src.pixel((sx + col) as u32, (sy + row) as u32);
            let d = dst.pixel_mut((r.x + col) as u32, (r.y + row) as u32);
            *d = blend_over(s, *d, tint);
        }
    }
}

fn blend_over(s: Color, d: Color, tint: [f64; 4]) -> Color {
    let sa = f64::from(s.a) / 255.0 * tint[3];
    let da = f64::from(d.a) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }
    let ch = |sc: u8, dc: u8, t: f64| {
        let sc = f64::from(sc) * t;
        quantize((sc * sa + f64::from(dc) * da * (1.0 - sa)) / out_a)
    };
    Color::new(
        ch(s.r, d.r, tint[0]),
        ch(s.g, d.g, tint[1]),
        ch(s.b, d.b, tint[2]),
        quantize(out_a * 255.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmap_core::Generator;

    fn numbered(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::generate(
            w,
            h,
            Generator::Pixel(&mut |p| Color::new(p.x as u8, p.y as u8, (p.x * 7 + p.y) as u8, 255)),
        )
        .unwrap()
    }

    #[test]
    fn test_clip_inside() {
        let img = numbered(6, 5);
        let c = clip(&img, Rect::new(1, 2, 3, 2));
        assert_eq!(c.size(), (3, 2));
        assert_eq!(c.pixel(0, 0), img.pixel(1, 2));
        assert_eq!(c.pixel(2, 1), img.pixel(3, 3));
    }

    #[test]
    fn test_clip_partial_and_outside() {
        let img = numbered(4, 4);
        let c = clip(&img, Rect::new(-2, -1, 4, 3));
        assert_eq!(c.size(), (2, 2));
        assert_eq!(c.pixel(0, 0), img.pixel(0, 0));
        assert!(clip(&img, Rect::new(4, 0, 2, 2)).is_empty());
        assert!(clip(&img, Rect::new(-5, -5, 5, 5)).is_empty());
    }

    #[test]
    fn test_square_clipped() {
        let img = numbered(7, 3);
        let sq = square_clipped(&img);
        assert_eq!(sq.size(), (3, 3));
        assert_eq!(sq.pixel(0, 0), img.pixel(2, 0));
    }

    #[test]
    fn test_rotate90_clockwise() {
        let img = numbered(3, 2);
        let r = rotate90(&img);
        assert_eq!(r.size(), (2, 3));
        // top-left of the source ends up top-right
        assert_eq!(r.pixel(1, 0), img.pixel(0, 0));
        assert_eq!(r.pixel(0, 0), img.pixel(0, 1));
        assert_eq!(r.pixel(0, 2), img.pixel(2, 1));
    }

    #[test]
    fn test_rotation_laws() {
        let img = numbered(5, 3);
        assert_eq!(rotate90(&rotate90(&rotate90(&rotate90(&img)))), img);
        assert_eq!(rotate90(&rotate90(&img)), rotate180(&img));
        assert_eq!(rotate270(&rotate90(&img)), img);
        assert_eq!(rotate90(&rotate180(&img)), rotate270(&img));
    }

    #[test]
    fn test_mirror_flip_involution() {
        let img = numbered(4, 3);
        assert_eq!(mirror(&img).pixel(0, 1), img.pixel(3, 1));
        assert_eq!(flip(&img).pixel(2, 0), img.pixel(2, 2));
        assert_eq!(mirror(&mirror(&img)), img);
        assert_eq!(flip(&flip(&img)), img);
        assert_eq!(flip(&mirror(&img)), rotate180(&img));
    }

    #[test]
    fn test_empty_transforms() {
        let e = PixelBuffer::empty();
        assert!(rotate90(&e).is_empty());
        assert!(rotate180(&e).is_empty());
        assert!(mirror(&e).is_empty());
        assert!(flip(&e).is_empty());
    }

    #[test]
    fn test_border_sides() {
        let img = PixelBuffer::filled(2, 2, Color::WHITE).unwrap();
        let b = border_sides(&img, 1, 2, 3, 4, Color::BLACK).unwrap();
        assert_eq!(b.size(), (8, 6));
        assert_eq!(b.pixel(4, 1), Color::WHITE);
        assert_eq!(b.pixel(5, 2), Color::WHITE);
        assert_eq!(b.pixel(3, 1), Color::BLACK);
        assert_eq!(b.pixel(6, 1), Color::BLACK);
        assert_eq!(b.pixel(4, 0), Color::BLACK);
        assert_eq!(b.pixel(4, 3), Color::BLACK);
    }

    #[test]
    fn test_border_errors() {
        let img = PixelBuffer::filled(2, 2, Color::WHITE).unwrap();
        assert!(matches!(
            border(&img, -1, Color::BLACK),
            Err(OpsError::InvalidParameter(_))
        ));
        assert!(matches!(
            border(&img, 4096, Color::BLACK),
            Err(OpsError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_overwrite_clips() {
        let mut dst = PixelBuffer::filled(4, 4, Color::BLACK).unwrap();
        let src = PixelBuffer::filled(3, 3, Color::WHITE).unwrap();
        overwrite(&mut dst, &src, 2, -1);
        assert_eq!(dst.pixel(2, 0), Color::WHITE);
        assert_eq!(dst.pixel(3, 1), Color::WHITE);
        assert_eq!(dst.pixel(2, 2), Color::BLACK);
        assert_eq!(dst.pixel(1, 0), Color::BLACK);
    }

    #[test]
    fn test_paint_alpha() {
        let mut dst = PixelBuffer::filled(2, 1, Color::BLACK).unwrap();
        let src = PixelBuffer::filled(1, 1, Color::new(255, 255, 255, 128)).unwrap();
        paint(&mut dst, &src, 1, 0, Color::WHITE);
        assert_eq!(dst.pixel(0, 0), Color::BLACK);
        let p = dst.pixel(1, 0);
        assert_eq!(p.a, 255);
        assert_eq!(p.r, 128);

        let opaque = PixelBuffer::filled(1, 1, Color::WHITE).unwrap();
        paint(&mut dst, &opaque, 0, 0, Color::rgb(255, 0, 0));
        assert_eq!(dst.pixel(0, 0), Color::rgb(255, 0, 0));
    }
}
