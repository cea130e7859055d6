//! Contour extraction: threshold a channel and trace region outlines into
//! polygons.
//!
//! Outlines follow pixel edges, so vertices sit on integer pixel corners.
//! Foreground regions are 4-connected; two pixels touching only at a
//! corner become separate polygons.
//!
//! # Orientation
//!
//! With y pointing down, outer rings run clockwise on screen and have a
//! positive shoelace area; holes run the other way. Collinear vertices are
//! dropped.
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_ops::contour::alpha_to_polygon;
//!
//! let mut img = PixelBuffer::new(4, 4)?;
//! for y in 1..3 {
//!     for x in 1..3 {
//!         img.set_pixel(x, y, Color::WHITE);
//!     }
//! }
//! let poly = alpha_to_polygon(&img, 160, true).unwrap();
//! assert_eq!(poly.outer().len(), 4);
//! assert_eq!(poly.area(), 4.0);
//! # Ok::<(), pixmap_core::Error>(())
//! ```

use pixmap_core::PixelBuffer;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Threshold used by callers that have no better value.
pub const DEFAULT_THRESHOLD: u8 = 160;

/// A 2D vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Vec2 {
    /// Creates a vertex.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Signed shoelace area of a closed ring.
pub fn signed_area(ring: &[Vec2]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// A simple polygon with optional holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    outer: Vec<Vec2>,
    holes: Vec<Vec<Vec2>>,
}

impl Polygon {
    /// Creates a polygon from an outer ring and holes.
    pub fn new(outer: Vec<Vec2>, holes: Vec<Vec<Vec2>>) -> Self {
        Self { outer, holes }
    }

    /// Outer ring.
    pub fn outer(&self) -> &[Vec2] {
        &self.outer
    }

    /// Hole rings.
    pub fn holes(&self) -> &[Vec<Vec2>] {
        &self.holes
    }

    /// Area enclosed by the outer ring minus the holes.
    pub fn area(&self) -> f64 {
        signed_area(&self.outer).abs() - self.holes.iter().map(|h| signed_area(h).abs()).sum::<f64>()
    }

    /// Returns `true` if the outer ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }

    /// Offsets every vertex.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for v in self.outer.iter_mut().chain(self.holes.iter_mut().flatten()) {
            v.x += dx;
            v.y += dy;
        }
    }
}

/// A set of disjoint polygons.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    /// Number of polygons.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no polygons.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the polygons.
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.0.iter()
    }

    /// The polygon with the largest outer ring.
    pub fn into_largest(self) -> Option<Polygon> {
        self.0
            .into_iter()
            .max_by(|a, b| signed_area(&a.outer).total_cmp(&signed_area(&b.outer)))
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.0.iter_mut().for_each(|p| p.translate(dx, dy));
    }
}

impl IntoIterator for MultiPolygon {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Outline of the largest region whose alpha is `>= threshold`.
pub fn alpha_to_polygon(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> Option<Polygon> {
    alpha_to_polygons(img, threshold, allow_holes).into_largest()
}

/// Outlines of every region whose alpha is `>= threshold`.
pub fn alpha_to_polygons(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> MultiPolygon {
    let mask: Vec<bool> = img.pixels().iter().map(|p| p.a >= threshold).collect();
    trace_mask(&mask, img.width() as usize, img.height() as usize, allow_holes)
}

/// Outline of the largest region whose luminance is `>= threshold`.
pub fn grayscale_to_polygon(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> Option<Polygon> {
    grayscale_to_polygons(img, threshold, allow_holes).into_largest()
}

/// Outlines of every region whose luminance is `>= threshold`.
pub fn grayscale_to_polygons(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> MultiPolygon {
    let mask: Vec<bool> = img.pixels().iter().map(|p| p.luminance() >= threshold).collect();
    trace_mask(&mask, img.width() as usize, img.height() as usize, allow_holes)
}

/// [`alpha_to_polygon`] with the image center at the origin.
pub fn alpha_to_polygon_centered(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> Option<Polygon> {
    alpha_to_polygons_centered(img, threshold, allow_holes).into_largest()
}

/// [`alpha_to_polygons`] with the image center at the origin.
pub fn alpha_to_polygons_centered(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> MultiPolygon {
    centered(img, alpha_to_polygons(img, threshold, allow_holes))
}

/// [`grayscale_to_polygon`] with the image center at the origin.
pub fn grayscale_to_polygon_centered(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> Option<Polygon> {
    grayscale_to_polygons_centered(img, threshold, allow_holes).into_largest()
}

/// [`grayscale_to_polygons`] with the image center at the origin.
pub fn grayscale_to_polygons_centered(img: &PixelBuffer, threshold: u8, allow_holes: bool) -> MultiPolygon {
    centered(img, grayscale_to_polygons(img, threshold, allow_holes))
}

fn centered(img: &PixelBuffer, mut polys: MultiPolygon) -> MultiPolygon {
    polys.translate(-f64::from(img.width()) / 2.0, -f64::from(img.height()) / 2.0);
    polys
}

// ============================================================================
// Tracing
// ============================================================================

/// East, south, west, north; clockwise on screen.
const DIRS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: (usize, usize),
    dir: usize,
    label: u32,
}

impl Edge {
    #[inline]
    fn to(&self) -> (usize, usize) {
        let (dx, dy) = DIRS[self.dir];
        ((self.from.0 as i64 + dx) as usize, (self.from.1 as i64 + dy) as usize)
    }
}

/// Labels 4-connected foreground components, starting at 1.
fn label_components(mask: &[bool], w: usize, h: usize) -> (Vec<u32>, u32) {
    let mut labels = vec![0u32; mask.len()];
    let mut next = 0u32;
    let mut stack = Vec::new();
    for start in 0..mask.len() {
        if !mask[start] || labels[start] != 0 {
            continue;
        }
        next += 1;
        labels[start] = next;
        stack.push(start);
        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            let neighbours = [
                (x > 0).then(|| i - 1),
                (x + 1 < w).then(|| i + 1),
                (y > 0).then(|| i - w),
                (y + 1 < h).then(|| i + w),
            ];
            for n in neighbours.into_iter().flatten() {
                if mask[n] && labels[n] == 0 {
                    labels[n] = next;
                    stack.push(n);
                }
            }
        }
    }
    (labels, next)
}

/// Directed boundary edges with the foreground on the right-hand side.
fn boundary_edges(mask: &[bool], labels: &[u32], w: usize, h: usize) -> Vec<Edge> {
    let fg = |x: i64, y: i64| {
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h && mask[y as usize * w + x as usize]
    };
    let mut edges = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if !mask[i] {
                continue;
            }
            let label = labels[i];
            let (xi, yi) = (x as i64, y as i64);
            if !fg(xi, yi - 1) {
                edges.push(Edge { from: (x, y), dir: 0, label });
            }
            if !fg(xi + 1, yi) {
                edges.push(Edge { from: (x + 1, y), dir: 1, label });
            }
            if !fg(xi, yi + 1) {
                edges.push(Edge { from: (x + 1, y + 1), dir: 2, label });
            }
            if !fg(xi - 1, yi) {
                edges.push(Edge { from: (x, y + 1), dir: 3, label });
            }
        }
    }
    edges
}

/// Traces a binary mask into polygons, one per 4-connected region.
pub fn trace_mask(mask: &[bool], w: usize, h: usize, allow_holes: bool) -> MultiPolygon {
    if w == 0 || h == 0 || mask.len() != w * h {
        return MultiPolygon::default();
    }
    let (labels, count) = label_components(mask, w, h);
    if count == 0 {
        return MultiPolygon::default();
    }
    let edges = boundary_edges(mask, &labels, w, h);
    trace!(w, h, regions = count, edges = edges.len(), "trace_mask");

    let mut outgoing: HashMap<(usize, usize), [usize; 4]> = HashMap::with_capacity(edges.len());
    for (i, e) in edges.iter().enumerate() {
        outgoing.entry(e.from).or_insert([usize::MAX; 4])[e.dir] = i;
    }

    let mut outers: Vec<Option<Vec<Vec2>>> = vec![None; count as usize];
    let mut holes: Vec<Vec<Vec<Vec2>>> = vec![Vec::new(); count as usize];
    let mut used = vec![false; edges.len()];

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut ring_edges = Vec::new();
        let mut cur = start;
        loop {
            used[cur] = true;
            ring_edges.push(cur);
            let e = edges[cur];
            let Some(out) = outgoing.get(&e.to()) else { break };
            // right turn first keeps diagonal neighbours in separate rings
            let next = [(e.dir + 1) % 4, e.dir, (e.dir + 3) % 4]
                .into_iter()
                .map(|d| out[d])
                .find(|&n| n != usize::MAX);
            match next {
                Some(n) if n != start && !used[n] => cur = n,
                _ => break,
            }
        }

        let ring = simplify(&ring_edges, &edges);
        let label = edges[start].label as usize - 1;
        if signed_area(&ring) > 0.0 {
            outers[label] = Some(ring);
        } else if allow_holes {
            holes[label].push(ring);
        }
    }

    let polygons: Vec<Polygon> = outers
        .into_iter()
        .zip(holes)
        .filter_map(|(outer, holes)| outer.map(|o| Polygon::new(o, holes)))
        .collect();
    debug!(polygons = polygons.len(), "contours traced");
    MultiPolygon(polygons)
}

/// Keeps only the corners of a ring of unit edges.
fn simplify(ring_edges: &[usize], edges: &[Edge]) -> Vec<Vec2> {
    let n = ring_edges.len();
    (0..n)
        .filter(|&k| edges[ring_edges[(k + n - 1) % n]].dir != edges[ring_edges[k]].dir)
        .map(|k| {
            let (x, y) = edges[ring_edges[k]].from;
            Vec2::new(x as f64, y as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pixmap_core::Color;

    fn mask_from(rows: &[&str]) -> (Vec<bool>, usize, usize) {
        let h = rows.len();
        let w = rows[0].len();
        let mask = rows.iter().flat_map(|r| r.chars().map(|c| c == '#')).collect();
        (mask, w, h)
    }

    #[test]
    fn test_single_pixel() {
        let (m, w, h) = mask_from(&["...", ".#.", "..."]);
        let polys = trace_mask(&m, w, h, true);
        assert_eq!(polys.len(), 1);
        let p = &polys.0[0];
        assert_eq!(
            p.outer(),
            &[Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0), Vec2::new(2.0, 2.0), Vec2::new(1.0, 2.0)]
        );
        assert_relative_eq!(signed_area(p.outer()), 1.0);
    }

    #[test]
    fn test_ring_with_hole() {
        let (m, w, h) = mask_from(&["###", "#.#", "###"]);
        let polys = trace_mask(&m, w, h, true);
        assert_eq!(polys.len(), 1);
        let p = &polys.0[0];
        assert_eq!(p.outer().len(), 4);
        assert_eq!(p.holes().len(), 1);
        assert!(signed_area(&p.holes()[0]) < 0.0);
        assert_relative_eq!(p.area(), 8.0);

        let solid = trace_mask(&m, w, h, false);
        assert!(solid.0[0].holes().is_empty());
        assert_relative_eq!(solid.0[0].area(), 9.0);
    }

    #[test]
    fn test_diagonal_pixels_are_separate() {
        let (m, w, h) = mask_from(&["#.", ".#"]);
        let polys = trace_mask(&m, w, h, true);
        assert_eq!(polys.len(), 2);
        for p in polys.iter() {
            assert_eq!(p.outer().len(), 4);
            assert_relative_eq!(p.area(), 1.0);
        }
    }

    #[test]
    fn test_l_shape_corners() {
        let (m, w, h) = mask_from(&["#..", "#..", "###"]);
        let p = trace_mask(&m, w, h, true).into_largest().unwrap();
        assert_eq!(p.outer().len(), 6);
        assert_relative_eq!(p.area(), 5.0);
    }

    #[test]
    fn test_alpha_threshold_and_largest() {
        let mut img = PixelBuffer::new(6, 3).unwrap();
        img.set_pixel(0, 0, Color::WHITE);
        for x in 3..6 {
            img.set_pixel(x, 1, Color::WHITE);
        }
        img.set_pixel(0, 2, Color::new(255, 255, 255, 100));
        let all = alpha_to_polygons(&img, DEFAULT_THRESHOLD, true);
        assert_eq!(all.len(), 2);
        let big = alpha_to_polygon(&img, DEFAULT_THRESHOLD, true).unwrap();
        assert_relative_eq!(big.area(), 3.0);
        assert_eq!(alpha_to_polygons(&img, 50, true).len(), 3);
        assert!(alpha_to_polygon(&PixelBuffer::new(3, 3).unwrap(), 1, true).is_none());
    }

    #[test]
    fn test_grayscale_centered() {
        let mut img = PixelBuffer::filled(4, 2, Color::BLACK).unwrap();
        img.set_pixel(0, 0, Color::WHITE);
        let p = grayscale_to_polygon_centered(&img, 128, true).unwrap();
        assert_eq!(p.outer()[0], Vec2::new(-2.0, -1.0));
        let q = grayscale_to_polygon(&img, 128, true).unwrap();
        assert_eq!(q.outer()[0], Vec2::new(0.0, 0.0));
        assert_eq!(alpha_to_polygons_centered(&img, 128, true).len(), 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(alpha_to_polygons(&PixelBuffer::empty(), 1, true).is_empty());
        assert!(trace_mask(&[true, false], 3, 1, true).is_empty());
    }
}
