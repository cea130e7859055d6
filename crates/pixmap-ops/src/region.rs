//! Flood fill.
//!
//! A neighbour joins the region when every channel `c` satisfies
//! `seed_c - lower <= c <= seed_c + upper`, where `seed_c` is the seed
//! pixel's color before the fill started.
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer, Point};
//! use pixmap_ops::region::{flood_fill, Connectivity};
//!
//! let mut img = PixelBuffer::filled(3, 3, Color::BLACK)?;
//! let filled = flood_fill(&mut img, Point::new(1, 1), Color::WHITE, Connectivity::Four, 0, 0);
//! assert_eq!(filled, 9);
//! assert!(img.pixels().iter().all(|&c| c == Color::WHITE));
//! # Ok::<(), pixmap_core::Error>(())
//! ```

use pixmap_core::{Color, PixelBuffer, Point};
use tracing::trace;

/// Neighbour set used when growing a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// Left, right, up, down.
    #[default]
    Four,
    /// The four edge neighbours plus the diagonals.
    Eight,
}

impl Connectivity {
    /// Neighbour offsets.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        const FOUR: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        const EIGHT: [(i32, i32); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (-1, 1),
            (1, -1),
            (-1, -1),
        ];
        match self {
            Self::Four => &FOUR,
            Self::Eight => &EIGHT,
        }
    }
}

#[inline]
fn within(c: Color, seed: Color, lower: u8, upper: u8) -> bool {
    c.to_array().into_iter().zip(seed.to_array()).all(|(v, s)| {
        let (v, s) = (i16::from(v), i16::from(s));
        v >= s - i16::from(lower) && v <= s + i16::from(upper)
    })
}

/// Fills the connected region around `seed` with `color`.
///
/// Returns the number of pixels painted; an out-of-bounds seed paints
/// nothing.
pub fn flood_fill(
    img: &mut PixelBuffer,
    seed: Point,
    color: Color,
    connectivity: Connectivity,
    lower: u8,
    upper: u8,
) -> usize {
    let Some(seed_color) = img.get(seed.x, seed.y) else {
        trace!(x = seed.x, y = seed.y, "flood_fill seed outside image");
        return 0;
    };
    trace!(x = seed.x, y = seed.y, ?connectivity, lower, upper, "flood_fill");

    let w = img.width() as usize;
    let mut visited = vec![false; img.pixel_count()];
    let mut stack = vec![seed];
    visited[seed.y as usize * w + seed.x as usize] = true;
    let mut count = 0;

    // Painted pixels are always visited, so unvisited ones still hold
    // their original color.
    while let Some(p) = stack.pop() {
        *img.pixel_mut(p.x as u32, p.y as u32) = color;
        count += 1;
        for &(dx, dy) in connectivity.offsets() {
            let (nx, ny) = (p.x + dx, p.y + dy);
            let Some(c) = img.get(nx, ny) else { continue };
            let i = ny as usize * w + nx as usize;
            if !visited[i] && within(c, seed_color, lower, upper) {
                visited[i] = true;
                stack.push(Point::new(nx, ny));
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_black_square() {
        let mut img = PixelBuffer::filled(3, 3, Color::BLACK).unwrap();
        let n = flood_fill(&mut img, Point::new(1, 1), Color::WHITE, Connectivity::Four, 0, 0);
        assert_eq!(n, 9);
        assert!(img.pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_seed_out_of_bounds_is_noop() {
        let mut img = PixelBuffer::filled(3, 3, Color::BLACK).unwrap();
        let before = img.clone();
        assert_eq!(flood_fill(&mut img, Point::new(3, 0), Color::WHITE, Connectivity::Eight, 0, 0), 0);
        assert_eq!(flood_fill(&mut img, Point::new(-1, 1), Color::WHITE, Connectivity::Four, 9, 9), 0);
        assert_eq!(img, before);
    }

    fn diagonal() -> PixelBuffer {
        // B W
        // W B
        PixelBuffer::from_pixels(2, 2, vec![Color::BLACK, Color::WHITE, Color::WHITE, Color::BLACK]).unwrap()
    }

    #[test]
    fn test_connectivity() {
        let red = Color::rgb(255, 0, 0);
        let mut four = diagonal();
        assert_eq!(flood_fill(&mut four, Point::new(0, 0), red, Connectivity::Four, 0, 0), 1);
        assert_eq!(four.pixel(1, 1), Color::BLACK);

        let mut eight = diagonal();
        assert_eq!(flood_fill(&mut eight, Point::new(0, 0), red, Connectivity::Eight, 0, 0), 2);
        assert_eq!(eight.pixel(1, 1), red);
    }

    #[test]
    fn test_asymmetric_tolerance() {
        let mut img = PixelBuffer::from_pixels(
            4,
            1,
            vec![Color::gray(95), Color::gray(100), Color::gray(108), Color::gray(111)],
        )
        .unwrap();
        let n = flood_fill(&mut img, Point::new(1, 0), Color::WHITE, Connectivity::Four, 5, 10);
        assert_eq!(n, 3);
        assert_eq!(img.pixel(0, 0), Color::WHITE);
        assert_eq!(img.pixel(2, 0), Color::WHITE);
        assert_eq!(img.pixel(3, 0), Color::gray(111));
    }

    #[test]
    fn test_tolerance_relative_to_seed() {
        // a gradient stepping by 4 must stop once it drifts 10 away from the seed
        let pixels = (0..8u8).map(|i| Color::gray(i * 4)).collect();
        let mut img = PixelBuffer::from_pixels(8, 1, pixels).unwrap();
        let n = flood_fill(&mut img, Point::new(0, 0), Color::WHITE, Connectivity::Four, 0, 10);
        assert_eq!(n, 3);
    }

    #[test]
    fn test_fill_with_same_color_terminates() {
        let mut img = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
        assert_eq!(flood_fill(&mut img, Point::new(0, 0), Color::WHITE, Connectivity::Eight, 0, 0), 16);
    }
}
