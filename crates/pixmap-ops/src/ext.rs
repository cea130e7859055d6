//! Method-style access to every operation on [`PixelBuffer`].
//!
//! Mutating methods replace the buffer's content and return `&mut Self`
//! so calls chain. Each has a copying twin (`rotated90`, `blurred`, ...)
//! that leaves the receiver untouched; prefer those when the buffer is
//! shared.
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_ops::PixelBufferExt;
//!
//! let mut img = PixelBuffer::filled(4, 2, Color::new(100, 150, 200, 255))?;
//! img.grayscale().rotate90().mirror();
//! assert_eq!(img.size(), (2, 4));
//! assert_eq!(img.pixel(0, 0).r, 141);
//!
//! let small = img.scaled(1, 2, pixmap_ops::Interpolation::Area)?;
//! assert_eq!(small.size(), (1, 2));
//! # Ok::<(), pixmap_ops::OpsError>(())
//! ```

use crate::color;
use crate::contour::{self, MultiPolygon, Polygon};
use crate::filter::{self, AdaptiveMethod, BorderType};
use crate::geometry;
use crate::region::{self, Connectivity};
use crate::resize::{self, Interpolation};
use crate::OpsResult;
use pixmap_core::{Color, PixelBuffer, Point, Rect};

/// Extension methods for [`PixelBuffer`].
pub trait PixelBufferExt {
    // --- geometry -------------------------------------------------------

    /// See [`geometry::clip`].
    fn clipped(&self, rect: Rect) -> PixelBuffer;
    /// See [`geometry::square_clipped`].
    fn square_clipped(&self) -> PixelBuffer;
    /// Rotates 90 degrees clockwise in place.
    fn rotate90(&mut self) -> &mut Self;
    /// Copying [`rotate90`](Self::rotate90).
    fn rotated90(&self) -> PixelBuffer;
    /// Rotates 180 degrees in place.
    fn rotate180(&mut self) -> &mut Self;
    /// Copying [`rotate180`](Self::rotate180).
    fn rotated180(&self) -> PixelBuffer;
    /// Rotates 270 degrees clockwise in place.
    fn rotate270(&mut self) -> &mut Self;
    /// Copying [`rotate270`](Self::rotate270).
    fn rotated270(&self) -> PixelBuffer;
    /// Horizontal flip in place.
    fn mirror(&mut self) -> &mut Self;
    /// Copying [`mirror`](Self::mirror).
    fn mirrored(&self) -> PixelBuffer;
    /// Vertical flip in place.
    fn flip(&mut self) -> &mut Self;
    /// Copying [`flip`](Self::flip).
    fn flipped(&self) -> PixelBuffer;
    /// See [`geometry::border`].
    fn bordered(&self, thickness: i32, color: Color) -> OpsResult<PixelBuffer>;
    /// See [`geometry::border_sides`].
    fn bordered_sides(&self, top: i32, right: i32, bottom: i32, left: i32, color: Color) -> OpsResult<PixelBuffer>;
    /// Alpha-blends `self` onto `dst` at `(x, y)`.
    fn paint_to(&self, dst: &mut PixelBuffer, x: i32, y: i32);
    /// Copies `self` verbatim into `dst` at `(x, y)`.
    fn overwrite_to(&self, dst: &mut PixelBuffer, x: i32, y: i32);

    // --- resampling -----------------------------------------------------

    /// Resamples in place.
    fn scale(&mut self, width: u32, height: u32, interp: Interpolation) -> OpsResult<&mut Self>;
    /// See [`resize::scale`].
    fn scaled(&self, width: u32, height: u32, interp: Interpolation) -> OpsResult<PixelBuffer>;
    /// See [`resize::scale_by`].
    fn scaled_by(&self, factor: f64, interp: Interpolation) -> OpsResult<PixelBuffer>;
    /// Fits inside a box in place.
    fn fit(&mut self, width: u32, height: u32, scale_up: bool, interp: Interpolation) -> OpsResult<&mut Self>;
    /// See [`resize::fit`].
    fn fitted(&self, width: u32, height: u32, scale_up: bool, interp: Interpolation) -> OpsResult<PixelBuffer>;

    // --- filters --------------------------------------------------------

    /// Box blur in place.
    fn blur(&mut self, h_radius: u32, v_radius: u32) -> &mut Self;
    /// See [`filter::box_blur`].
    fn blurred(&self, h_radius: u32, v_radius: u32) -> PixelBuffer;
    /// Gaussian blur in place.
    fn gaussian_blur(&mut self, h_size: u32, v_size: u32, border: BorderType) -> OpsResult<&mut Self>;
    /// See [`filter::gaussian_blur`].
    fn gaussian_blurred(&self, h_size: u32, v_size: u32, border: BorderType) -> OpsResult<PixelBuffer>;
    /// Median blur in place.
    fn median_blur(&mut self, aperture: u32) -> OpsResult<&mut Self>;
    /// See [`filter::median_blur`].
    fn median_blurred(&self, aperture: u32) -> OpsResult<PixelBuffer>;
    /// Dilation in place.
    fn dilate(&mut self, iterations: u32) -> &mut Self;
    /// See [`filter::dilate`].
    fn dilated(&self, iterations: u32) -> PixelBuffer;
    /// Erosion in place.
    fn erode(&mut self, iterations: u32) -> &mut Self;
    /// See [`filter::erode`].
    fn eroded(&self, iterations: u32) -> PixelBuffer;
    /// Adaptive threshold in place.
    fn adaptive_threshold(&mut self, method: AdaptiveMethod, block_size: u32, c: f64, inverse: bool) -> OpsResult<&mut Self>;
    /// See [`filter::adaptive_threshold`].
    fn adaptive_thresholded(&self, method: AdaptiveMethod, block_size: u32, c: f64, inverse: bool) -> OpsResult<PixelBuffer>;
    /// Mosaic in place.
    fn mosaic(&mut self, h_cell: u32, v_cell: u32) -> OpsResult<&mut Self>;
    /// See [`filter::mosaic`].
    fn mosaiced(&self, h_cell: u32, v_cell: u32) -> OpsResult<PixelBuffer>;
    /// Spread in place.
    fn spread(&mut self, h: u32, v: u32) -> &mut Self;
    /// See [`filter::spread`].
    fn spreaded(&self, h: u32, v: u32) -> PixelBuffer;

    // --- color ----------------------------------------------------------

    /// See [`color::negate`].
    fn negate(&mut self) -> &mut Self;
    /// Copying [`negate`](Self::negate).
    fn negated(&self) -> PixelBuffer;
    /// See [`color::grayscale`].
    fn grayscale(&mut self) -> &mut Self;
    /// Copying [`grayscale`](Self::grayscale).
    fn grayscaled(&self) -> PixelBuffer;
    /// See [`color::sepia`].
    fn sepia(&mut self, level: i32) -> &mut Self;
    /// Copying [`sepia`](Self::sepia).
    fn sepiaed(&self, level: i32) -> PixelBuffer;
    /// See [`color::brighten`].
    fn brighten(&mut self, level: i32) -> &mut Self;
    /// Copying [`brighten`](Self::brighten).
    fn brightened(&self, level: i32) -> PixelBuffer;
    /// See [`color::gamma_correct`].
    fn gamma_correct(&mut self, gamma: f64) -> OpsResult<&mut Self>;
    /// Copying [`gamma_correct`](Self::gamma_correct).
    fn gamma_corrected(&self, gamma: f64) -> OpsResult<PixelBuffer>;
    /// See [`color::posterize`].
    fn posterize(&mut self, levels: u32) -> OpsResult<&mut Self>;
    /// Copying [`posterize`](Self::posterize).
    fn posterized(&self, levels: u32) -> OpsResult<PixelBuffer>;
    /// See [`color::threshold`].
    fn threshold(&mut self, level: u8, inverse: bool) -> &mut Self;
    /// Copying [`threshold`](Self::threshold).
    fn thresholded(&self, level: u8, inverse: bool) -> PixelBuffer;

    // --- regions --------------------------------------------------------

    /// See [`region::flood_fill`].
    fn flood_fill(&mut self, seed: Point, color: Color, connectivity: Connectivity, lower: u8, upper: u8) -> &mut Self;
    /// Copying [`flood_fill`](Self::flood_fill).
    fn flood_filled(&self, seed: Point, color: Color, connectivity: Connectivity, lower: u8, upper: u8) -> PixelBuffer;
    /// See [`contour::alpha_to_polygon`].
    fn alpha_to_polygon(&self, threshold: u8, allow_holes: bool) -> Option<Polygon>;
    /// See [`contour::alpha_to_polygons`].
    fn alpha_to_polygons(&self, threshold: u8, allow_holes: bool) -> MultiPolygon;
    /// See [`contour::grayscale_to_polygon`].
    fn grayscale_to_polygon(&self, threshold: u8, allow_holes: bool) -> Option<Polygon>;
    /// See [`contour::grayscale_to_polygons`].
    fn grayscale_to_polygons(&self, threshold: u8, allow_holes: bool) -> MultiPolygon;
}

/// Applies an in-place operation to a copy.
fn copied(src: &PixelBuffer, f: impl FnOnce(&mut PixelBuffer)) -> PixelBuffer {
    let mut dst = src.clone();
    f(&mut dst);
    dst
}

impl PixelBufferExt for PixelBuffer {
    fn clipped(&self, rect: Rect) -> PixelBuffer {
        geometry::clip(self, rect)
    }

    fn square_clipped(&self) -> PixelBuffer {
        geometry::square_clipped(self)
    }

    fn rotate90(&mut self) -> &mut Self {
        *self = geometry::rotate90(self);
        self
    }

    fn rotated90(&self) -> PixelBuffer {
        geometry::rotate90(self)
    }

    fn rotate180(&mut self) -> &mut Self {
        self.pixels_mut().reverse();
        self
    }

    fn rotated180(&self) -> PixelBuffer {
        geometry::rotate180(self)
    }

    fn rotate270(&mut self) -> &mut Self {
        *self = geometry::rotate270(self);
        self
    }

    fn rotated270(&self) -> PixelBuffer {
        geometry::rotate270(self)
    }

    fn mirror(&mut self) -> &mut Self {
        *self = geometry::mirror(self);
        self
    }

    fn mirrored(&self) -> PixelBuffer {
        geometry::mirror(self)
    }

    fn flip(&mut self) -> &mut Self {
        *self = geometry::flip(self);
        self
    }

    fn flipped(&self) -> PixelBuffer {
        geometry::flip(self)
    }

    fn bordered(&self, thickness: i32, color: Color) -> OpsResult<PixelBuffer> {
        geometry::border(self, thickness, color)
    }

    fn bordered_sides(&self, top: i32, right: i32, bottom: i32, left: i32, color: Color) -> OpsResult<PixelBuffer> {
        geometry::border_sides(self, top, right, bottom, left, color)
    }

    fn paint_to(&self, dst: &mut PixelBuffer, x: i32, y: i32) {
        geometry::paint(dst, self, x, y, Color::WHITE);
    }

    fn overwrite_to(&self, dst: &mut PixelBuffer, x: i32, y: i32) {
        geometry::overwrite(dst, self, x, y);
    }

    fn scale(&mut self, width: u32, height: u32, interp: Interpolation) -> OpsResult<&mut Self> {
        *self = resize::scale(self, width, height, interp)?;
        Ok(self)
    }

    fn scaled(&self, width: u32, height: u32, interp: Interpolation) -> OpsResult<PixelBuffer> {
        resize::scale(self, width, height, interp)
    }

    fn scaled_by(&self, factor: f64, interp: Interpolation) -> OpsResult<PixelBuffer> {
        resize::scale_by(self, factor, interp)
    }

    fn fit(&mut self, width: u32, height: u32, scale_up: bool, interp: Interpolation) -> OpsResult<&mut Self> {
        *self = resize::fit(self, width, height, scale_up, interp)?;
        Ok(self)
    }

    fn fitted(&self, width: u32, height: u32, scale_up: bool, interp: Interpolation) -> OpsResult<PixelBuffer> {
        resize::fit(self, width, height, scale_up, interp)
    }

    fn blur(&mut self, h_radius: u32, v_radius: u32) -> &mut Self {
        *self = filter::box_blur(self, h_radius, v_radius);
        self
    }

    fn blurred(&self, h_radius: u32, v_radius: u32) -> PixelBuffer {
        filter::box_blur(self, h_radius, v_radius)
    }

    fn gaussian_blur(&mut self, h_size: u32, v_size: u32, border: BorderType) -> OpsResult<&mut Self> {
        *self = filter::gaussian_blur(self, h_size, v_size, border)?;
        Ok(self)
    }

    fn gaussian_blurred(&self, h_size: u32, v_size: u32, border: BorderType) -> OpsResult<PixelBuffer> {
        filter::gaussian_blur(self, h_size, v_size, border)
    }

    fn median_blur(&mut self, aperture: u32) -> OpsResult<&mut Self> {
        *self = filter::median_blur(self, aperture)?;
        Ok(self)
    }

    fn median_blurred(&self, aperture: u32) -> OpsResult<PixelBuffer> {
        filter::median_blur(self, aperture)
    }

    fn dilate(&mut self, iterations: u32) -> &mut Self {
        *self = filter::dilate(self, iterations);
        self
    }

    fn dilated(&self, iterations: u32) -> PixelBuffer {
        filter::dilate(self, iterations)
    }

    fn erode(&mut self, iterations: u32) -> &mut Self {
        *self = filter::erode(self, iterations);
        self
    }

    fn eroded(&self, iterations: u32) -> PixelBuffer {
        filter::erode(self, iterations)
    }

    fn adaptive_threshold(&mut self, method: AdaptiveMethod, block_size: u32, c: f64, inverse: bool) -> OpsResult<&mut Self> {
        *self = filter::adaptive_threshold(self, method, block_size, c, inverse)?;
        Ok(self)
    }

    fn adaptive_thresholded(&self, method: AdaptiveMethod, block_size: u32, c: f64, inverse: bool) -> OpsResult<PixelBuffer> {
        filter::adaptive_threshold(self, method, block_size, c, inverse)
    }

    fn mosaic(&mut self, h_cell: u32, v_cell: u32) -> OpsResult<&mut Self> {
        *self = filter::mosaic(self, h_cell, v_cell)?;
        Ok(self)
    }

    fn mosaiced(&self, h_cell: u32, v_cell: u32) -> OpsResult<PixelBuffer> {
        filter::mosaic(self, h_cell, v_cell)
    }

    fn spread(&mut self, h: u32, v: u32) -> &mut Self {
        *self = filter::spread(self, h, v);
        self
    }

    fn spreaded(&self, h: u32, v: u32) -> PixelBuffer {
        filter::spread(self, h, v)
    }

    fn negate(&mut self) -> &mut Self {
        color::negate(self);
        self
    }

    fn negated(&self) -> PixelBuffer {
        copied(self, color::negate)
    }

    fn grayscale(&mut self) -> &mut Self {
        color::grayscale(self);
        self
    }

    fn grayscaled(&self) -> PixelBuffer {
        copied(self, color::grayscale)
    }

    fn sepia(&mut self, level: i32) -> &mut Self {
        color::sepia(self, level);
        self
    }

    fn sepiaed(&self, level: i32) -> PixelBuffer {
        copied(self, |img| color::sepia(img, level))
    }

    fn brighten(&mut self, level: i32) -> &mut Self {
        color::brighten(self, level);
        self
    }

    fn brightened(&self, level: i32) -> PixelBuffer {
        copied(self, |img| color::brighten(img, level))
    }

    fn gamma_correct(&mut self, gamma: f64) -> OpsResult<&mut Self> {
        color::gamma_correct(self, gamma)?;
        Ok(self)
    }

    fn gamma_corrected(&self, gamma: f64) -> OpsResult<PixelBuffer> {
        let mut dst = self.clone();
        color::gamma_correct(&mut dst, gamma)?;
        Ok(dst)
    }

    fn posterize(&mut self, levels: u32) -> OpsResult<&mut Self> {
        color::posterize(self, levels)?;
        Ok(self)
    }

    fn posterized(&self, levels: u32) -> OpsResult<PixelBuffer> {
        let mut dst = self.clone();
        color::posterize(&mut dst, levels)?;
        Ok(dst)
    }

    fn threshold(&mut self, level: u8, inverse: bool) -> &mut Self {
        color::threshold(self, level, inverse);
        self
    }

    fn thresholded(&self, level: u8, inverse: bool) -> PixelBuffer {
        copied(self, |img| color::threshold(img, level, inverse))
    }

    fn flood_fill(&mut self, seed: Point, color: Color, connectivity: Connectivity, lower: u8, upper: u8) -> &mut Self {
        region::flood_fill(self, seed, color, connectivity, lower, upper);
        self
    }

    fn flood_filled(&self, seed: Point, color: Color, connectivity: Connectivity, lower: u8, upper: u8) -> PixelBuffer {
        copied(self, |img| {
            region::flood_fill(img, seed, color, connectivity, lower, upper);
        })
    }

    fn alpha_to_polygon(&self, threshold: u8, allow_holes: bool) -> Option<Polygon> {
        contour::alpha_to_polygon(self, threshold, allow_holes)
    }

    fn alpha_to_polygons(&self, threshold: u8, allow_holes: bool) -> MultiPolygon {
        contour::alpha_to_polygons(self, threshold, allow_holes)
    }

    fn grayscale_to_polygon(&self, threshold: u8, allow_holes: bool) -> Option<Polygon> {
        contour::grayscale_to_polygon(self, threshold, allow_holes)
    }

    fn grayscale_to_polygons(&self, threshold: u8, allow_holes: bool) -> MultiPolygon {
        contour::grayscale_to_polygons(self, threshold, allow_holes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chaining() {
        let mut img = PixelBuffer::filled(3, 2, Color::new(10, 20, 30, 255)).unwrap();
        img.negate().brighten(5).rotate90().flip();
        assert_eq!(img.size(), (2, 3));
        assert_eq!(img.pixel(0, 0), Color::new(250, 240, 230, 255));
    }

    #[test]
    fn test_copying_twins_leave_source() {
        let img = PixelBuffer::generate(
            4,
            3,
            pixmap_core::Generator::Pixel(&mut |p| Color::rgb(p.x as u8 * 60, p.y as u8 * 80, 0)),
        )
        .unwrap();
        let before = img.clone();
        let _ = img.rotated90();
        let _ = img.grayscaled();
        let _ = img.thresholded(128, false);
        let _ = img.blurred(1, 1);
        let _ = img.flood_filled(Point::new(0, 0), Color::WHITE, Connectivity::Four, 0, 0);
        assert_eq!(img, before);
    }

    #[test]
    fn test_in_place_matches_copy() {
        let img = PixelBuffer::generate(
            5,
            4,
            pixmap_core::Generator::Pixel(&mut |p| Color::rgb(p.x as u8 * 40, p.y as u8 * 50, 7)),
        )
        .unwrap();
        let mut a = img.clone();
        a.rotate180();
        assert_eq!(a, img.rotated180());

        let mut b = img.clone();
        b.median_blur(3).unwrap();
        assert_eq!(b, img.median_blurred(3).unwrap());

        let mut c = img.clone();
        assert!(c.posterize(1).is_err());
        assert_eq!(c, img);
    }
}
