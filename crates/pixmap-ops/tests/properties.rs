//! Cross-module laws and end-to-end scenarios.

use pixmap_core::{Color, Generator, PixelBuffer, Point, Rect};
use pixmap_ops::filter::{self, BorderType};
use pixmap_ops::geometry;
use pixmap_ops::resize::{self, Interpolation};
use pixmap_ops::{Connectivity, MemoryTextureStore, PixelBufferExt, TextureDesc, TextureUploader};

fn pattern(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::generate(
        w,
        h,
        Generator::Pixel(&mut |p| {
            Color::new(
                (p.x * 37 % 256) as u8,
                (p.y * 53 % 256) as u8,
                ((p.x + p.y) * 11 % 256) as u8,
                255 - (p.x % 7) as u8,
            )
        }),
    )
    .unwrap()
}

// ============================================================================
// Geometry laws
// ============================================================================

#[test]
fn test_four_quarter_turns_are_identity() {
    let img = pattern(7, 4);
    let mut r = img.clone();
    r.rotate90().rotate90().rotate90().rotate90();
    assert_eq!(r, img);
}

#[test]
fn test_rotate90_then_270_is_identity() {
    let img = pattern(5, 9);
    assert_eq!(geometry::rotate270(&geometry::rotate90(&img)), img);
    assert_eq!(img.rotated90().rotated90(), img.rotated180());
}

#[test]
fn test_mirror_and_flip() {
    let img = pattern(6, 3);
    assert_eq!(img.mirrored().mirrored(), img);
    assert_eq!(img.flipped().flipped(), img);
    assert_eq!(img.mirrored().flipped(), img.rotated180());
}

#[test]
fn test_rotation_pixel_mapping() {
    let img = pattern(3, 2);
    let r = img.rotated90();
    assert_eq!(r.size(), (2, 3));
    // the bottom-left source pixel lands top-left
    assert_eq!(r.pixel(0, 0), img.pixel(0, 1));
    assert_eq!(r.pixel(1, 0), img.pixel(0, 0));
}

#[test]
fn test_border_then_clip_restores() {
    let img = pattern(4, 5);
    let framed = img.bordered(3, Color::rgb(0, 255, 0)).unwrap();
    assert_eq!(framed.size(), (10, 11));
    assert_eq!(framed.pixel(0, 0), Color::rgb(0, 255, 0));
    assert_eq!(framed.clipped(Rect::new(3, 3, 4, 5)), img);
}

#[test]
fn test_clone_is_independent() {
    let img = pattern(4, 4);
    let mut copy = img.clone();
    copy.negate().set_pixel(0, 0, Color::BLACK);
    assert_ne!(copy, img);
    assert_eq!(img, pattern(4, 4));
}

// ============================================================================
// Resampling
// ============================================================================

#[test]
fn test_nearest_downscale_of_solid_red() {
    let red = PixelBuffer::filled(4, 4, Color::rgb(255, 0, 0)).unwrap();
    let small = red.scaled(2, 2, Interpolation::Nearest).unwrap();
    assert_eq!(small.size(), (2, 2));
    assert!(small.pixels().iter().all(|&c| c == Color::rgb(255, 0, 0)));
}

#[test]
fn test_constant_image_survives_every_kernel() {
    let c = Color::new(10, 200, 30, 255);
    let img = PixelBuffer::filled(9, 7, c).unwrap();
    for interp in [
        Interpolation::Nearest,
        Interpolation::Linear,
        Interpolation::Cubic,
        Interpolation::Area,
        Interpolation::Lanczos,
        Interpolation::Auto,
    ] {
        for (w, h) in [(4, 3), (20, 15), (9, 2)] {
            let out = img.scaled(w, h, interp).unwrap();
            assert_eq!(out.size(), (w, h));
            assert!(out.pixels().iter().all(|&p| p == c), "{interp:?} {w}x{h}");
        }
    }
}

#[test]
fn test_auto_downscale_averages_checker() {
    let checker = PixelBuffer::generate(
        8,
        8,
        Generator::Pixel(&mut |p| if (p.x + p.y) % 2 == 0 { Color::WHITE } else { Color::BLACK }),
    )
    .unwrap();
    let out = checker.scaled(2, 2, Interpolation::Auto).unwrap();
    assert!(out.pixels().iter().all(|p| (127..=128).contains(&p.r) && p.a == 255));
}

#[test]
fn test_fit_keeps_aspect() {
    let img = pattern(40, 20);
    let out = img.fitted(10, 10, false, Interpolation::Area).unwrap();
    assert_eq!(out.size(), (10, 5));
    let same = img.fitted(100, 100, false, Interpolation::Area).unwrap();
    assert_eq!(same, img);
    let up = img.fitted(100, 100, true, Interpolation::Linear).unwrap();
    assert_eq!(up.size(), (100, 50));
}

#[test]
fn test_scale_rejects_oversize() {
    let img = pattern(2, 2);
    assert!(resize::scale(&img, 8193, 2, Interpolation::Nearest).is_err());
    assert!(resize::scale(&img, 0, 5, Interpolation::Nearest).unwrap().is_empty());
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_blurs_preserve_constant_image() {
    let c = Color::new(90, 91, 92, 93);
    let img = PixelBuffer::filled(6, 5, c).unwrap();
    assert_eq!(img.blurred(2, 1), img);
    assert_eq!(img.gaussian_blurred(5, 3, BorderType::Reflect101).unwrap(), img);
    assert_eq!(img.median_blurred(3).unwrap(), img);
    assert_eq!(img.mosaiced(4, 4).unwrap(), img);
}

#[test]
fn test_results_do_not_depend_on_thread_count() {
    let img = pattern(33, 21);
    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        pool.install(|| {
            (
                img.blurred(3, 2),
                img.gaussian_blurred(5, 5, BorderType::Reflect).unwrap(),
                img.scaled(12, 40, Interpolation::Lanczos).unwrap(),
                img.grayscaled().thresholded(100, false),
            )
        })
    };
    assert_eq!(run(1), run(4));
}

#[test]
fn test_spread_seeded_is_reproducible() {
    let img = pattern(10, 10);
    let a = filter::spread_seeded(&img, 2, 2, 42);
    let b = filter::spread_seeded(&img, 2, 2, 42);
    assert_eq!(a, b);
    assert_eq!(filter::spread_seeded(&img, 0, 0, 7), img);
    assert_eq!(img.spreaded(0, 0), img);
}

#[test]
fn test_dilate_then_erode_single_dot() {
    let mut img = PixelBuffer::filled(5, 5, Color::BLACK).unwrap();
    img.set_pixel(2, 2, Color::WHITE);
    let grown = img.dilated(1);
    assert_eq!(grown.pixels().iter().filter(|&&p| p == Color::WHITE).count(), 9);
    assert_eq!(grown.eroded(1), img);
}

// ============================================================================
// Color
// ============================================================================

#[test]
fn test_threshold_and_grayscale_are_idempotent() {
    let img = pattern(16, 8);
    let g = img.grayscaled();
    assert_eq!(g.grayscaled(), g);
    let t = img.thresholded(128, false);
    assert_eq!(t.thresholded(128, false), t);
}

#[test]
fn test_posterize_two_levels_is_binary() {
    let img = pattern(16, 16).posterized(2).unwrap();
    assert!(img.pixels().iter().all(|p| [p.r, p.g, p.b].iter().all(|&c| c == 0 || c == 255)));
}

// ============================================================================
// Regions
// ============================================================================

#[test]
fn test_flood_fill_stops_at_wall() {
    // left half black, one white column, right half black
    let mut img = PixelBuffer::generate(
        5,
        3,
        Generator::Pixel(&mut |p| if p.x == 2 { Color::WHITE } else { Color::BLACK }),
    )
    .unwrap();
    img.flood_fill(Point::new(0, 0), Color::rgb(255, 0, 0), Connectivity::Eight, 0, 0);
    assert_eq!(img.pixel(1, 2), Color::rgb(255, 0, 0));
    assert_eq!(img.pixel(2, 1), Color::WHITE);
    assert_eq!(img.pixel(3, 0), Color::BLACK);
}

#[test]
fn test_ring_with_hole() {
    let mut img = PixelBuffer::filled(5, 5, Color::WHITE).unwrap();
    img.set_pixel(2, 2, Color::TRANSPARENT);

    let poly = img.alpha_to_polygon(1, true).unwrap();
    assert_eq!(poly.outer().len(), 4);
    assert_eq!(poly.holes().len(), 1);
    assert_eq!(poly.holes()[0].len(), 4);
    assert_eq!(poly.area(), 24.0);

    let solid = img.alpha_to_polygon(1, false).unwrap();
    assert!(solid.holes().is_empty());
    assert_eq!(solid.area(), 25.0);
}

#[test]
fn test_diagonal_pixels_are_separate_regions() {
    let img = PixelBuffer::from_pixels(2, 2, vec![Color::WHITE, Color::BLACK, Color::BLACK, Color::WHITE]).unwrap();
    let polys = img.grayscale_to_polygons(128, true);
    assert_eq!(polys.len(), 2);
    assert!(polys.iter().all(|p| p.area() == 1.0));
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn test_texture_store_lifecycle() {
    let mut store = MemoryTextureStore::new();
    let img = pattern(8, 8);
    let tex = store.create(&img, TextureDesc::Mipped).unwrap();
    assert_eq!(store.level_count(tex), 4);
    assert_eq!(store.size(tex), Some((8, 8)));

    let patch = PixelBuffer::filled(2, 2, Color::rgb(1, 2, 3)).unwrap();
    assert!(store.fill_region(tex, pixmap_ops::RegionSource::Pixels(&patch), Rect::new(6, 6, 2, 2)));
    assert_eq!(store.level(tex, 0).unwrap().pixel(7, 7), Color::rgb(1, 2, 3));
    assert!(!store.fill_region(tex, pixmap_ops::RegionSource::Color(Color::BLACK), Rect::new(7, 7, 2, 2)));

    assert!(store.release(tex));
    assert!(!store.release(tex));
    assert_eq!(store.size(tex), None);
}
