//! Integer points and rectangles addressing regions of a [`crate::PixelBuffer`].
//!
//! Coordinates are signed so a [`Rect`] may lie partially or entirely
//! outside a buffer; operations intersect it with the buffer bounds first.
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Buffer  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! ```rust
//! use pixmap_core::Rect;
//!
//! let rect = Rect::new(-2, -2, 4, 4);
//! let visible = rect.intersect(&Rect::new(0, 0, 10, 10)).unwrap();
//! assert_eq!(visible, Rect::new(0, 0, 2, 2));
//! ```

/// An integer 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle with signed origin.
///
/// A rectangle with non-positive width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x: i32,
    /// Top edge (inclusive)
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive), widened to avoid overflow.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive), widened to avoid overflow.
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area in pixels; zero for empty rectangles.
    #[inline]
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns `true` if `(px, py)` lies inside.
    #[inline]
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && i64::from(px) < self.right()
            && i64::from(py) < self.bottom()
    }

    /// Intersection with another rectangle, `None` if they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if i64::from(x0) >= x1 || i64::from(y0) >= y1 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - i64::from(x0)) as i32, (y1 - i64::from(y0)) as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let r = Rect::new(10, 20, 5, 5);
        assert!(r.contains(10, 20));
        assert!(r.contains(14, 24));
        assert!(!r.contains(15, 20));
        assert!(!r.contains(9, 20));
    }

    #[test]
    fn test_intersect_partial() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -3, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 0, 5, 7)));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
        assert_eq!(a.intersect(&Rect::new(-20, -20, 5, 5)), None);
        assert_eq!(a.intersect(&Rect::new(2, 2, 0, 5)), None);
    }

    #[test]
    fn test_area_empty() {
        assert_eq!(Rect::new(0, 0, -3, 4).area(), 0);
        assert_eq!(Rect::from_size(3, 4).area(), 12);
    }
}
