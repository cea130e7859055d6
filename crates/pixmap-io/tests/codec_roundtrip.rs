//! Round-trips through memory and the filesystem.

use pixmap_core::{Color, Generator, PixelBuffer};
use pixmap_io::jpeg::JpegOptions;
use pixmap_io::ppm::{PpmOptions, PpmType};
use pixmap_io::{EncodeOptions, ImageFormat, IoError, decode, encode, encode_with, image_size};

fn test_image() -> PixelBuffer {
    PixelBuffer::generate(
        24,
        16,
        Generator::Pixel(&mut |p| Color::new((p.x * 10) as u8, (p.y * 15) as u8, ((p.x + p.y) * 5) as u8, 255)),
    )
    .unwrap()
}

fn mean_abs_error(a: &PixelBuffer, b: &PixelBuffer) -> f64 {
    let total: u64 = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .flat_map(|(p, q)| [p.r.abs_diff(q.r), p.g.abs_diff(q.g), p.b.abs_diff(q.b)])
        .map(u64::from)
        .sum();
    total as f64 / (a.pixel_count() * 3) as f64
}

// ============================================================================
// In-memory
// ============================================================================

#[test]
fn test_lossless_formats_roundtrip_exactly() {
    let mut img = test_image();
    img.set_pixel(3, 3, Color::new(9, 8, 7, 128));
    for format in [ImageFormat::Png, ImageFormat::WebP] {
        let bytes = encode(&img, format).unwrap();
        assert_eq!(ImageFormat::from_bytes(&bytes), format);
        assert_eq!(decode(&bytes, ImageFormat::Unspecified).unwrap(), img, "{format}");
    }
}

#[test]
fn test_ppm_roundtrip_every_variant() {
    let img = test_image();
    for kind in [PpmType::AsciiRgb, PpmType::BinaryRgb] {
        let bytes = encode_with(&img, &EncodeOptions::Ppm(PpmOptions { kind })).unwrap();
        assert_eq!(decode(&bytes, ImageFormat::Unspecified).unwrap(), img);
    }
    for kind in [PpmType::AsciiGray, PpmType::BinaryGray] {
        let bytes = encode_with(&img, &EncodeOptions::Ppm(PpmOptions { kind })).unwrap();
        let back = decode(&bytes, ImageFormat::Ppm).unwrap();
        assert_eq!(back.size(), img.size());
        assert!(back.pixels().iter().zip(img.pixels()).all(|(b, o)| b.r == o.luminance()));
    }
}

#[test]
fn test_jpeg_error_bound() {
    let img = test_image();
    for quality in [90, 95, 100] {
        let bytes = encode_with(&img, &EncodeOptions::Jpeg(JpegOptions { quality })).unwrap();
        let back = decode(&bytes, ImageFormat::Unspecified).unwrap();
        assert_eq!(back.size(), img.size());
        let mae = mean_abs_error(&img, &back);
        assert!(mae < 10.0, "quality {quality}: mae {mae}");
    }
}

#[test]
fn test_size_without_decode() {
    let img = test_image();
    for format in ImageFormat::ALL {
        let bytes = encode(&img, format).unwrap();
        assert_eq!(image_size(&bytes, ImageFormat::Unspecified).unwrap(), (24, 16), "{format}");
    }
}

#[test]
fn test_undetectable_input() {
    assert!(matches!(
        decode(b"hello world", ImageFormat::Unspecified),
        Err(IoError::UnsupportedFormat(_))
    ));
    assert!(matches!(decode(b"hello world", ImageFormat::Png), Err(IoError::DecodeError(_))));
}

// ============================================================================
// Filesystem
// ============================================================================

#[test]
fn test_save_and_read() {
    let dir = tempfile::tempdir().unwrap();
    let img = test_image();
    for format in ImageFormat::ALL {
        let path = dir.path().join(format!("out.{}", format.extension()));
        assert!(pixmap_io::save(&img, &path, ImageFormat::Unspecified));
        let back = pixmap_io::read(&path).unwrap();
        assert_eq!(back.size(), img.size());
    }
    // only the saved images remain; no stray temporaries
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), ImageFormat::ALL.len());
}

#[test]
fn test_read_trusts_content_over_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actually_png.jpg");
    let img = test_image();
    pixmap_io::try_save(&img, &path, ImageFormat::Png).unwrap();
    assert_eq!(pixmap_io::read(&path).unwrap(), img);
}

#[test]
fn test_save_failure_reports_false() {
    let dir = tempfile::tempdir().unwrap();
    let img = test_image();
    assert!(!pixmap_io::save(&img, dir.path().join("missing/sub/out.png"), ImageFormat::Png));
    assert!(!pixmap_io::save(&img, dir.path().join("out.bmp"), ImageFormat::Unspecified));
    assert!(!pixmap_io::save(&PixelBuffer::empty(), dir.path().join("e.png"), ImageFormat::Png));
    assert!(matches!(
        pixmap_io::try_save(&img, dir.path().join("out.bmp"), ImageFormat::Unspecified),
        Err(IoError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_failed_save_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.png");
    let img = test_image();
    pixmap_io::try_save(&img, &path, ImageFormat::Png).unwrap();
    let bad = EncodeOptions::Jpeg(JpegOptions { quality: 0 });
    assert!(pixmap_io::try_save_with(&img, &path, &bad).is_err());
    assert_eq!(pixmap_io::read(&path).unwrap(), img);
}

#[test]
fn test_read_with_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let rgb_path = dir.path().join("rgb.png");
    let alpha_path = dir.path().join("alpha.pgm");
    let img = test_image();
    let mask = PixelBuffer::generate(24, 16, Generator::Pixel(&mut |p| Color::gray((p.x * 10) as u8))).unwrap();
    pixmap_io::try_save(&img, &rgb_path, ImageFormat::Unspecified).unwrap();
    pixmap_io::try_save_with(&mask, &alpha_path, &EncodeOptions::Ppm(PpmOptions { kind: PpmType::BinaryGray }))
        .unwrap();

    let combined = pixmap_io::read_with_alpha(&rgb_path, &alpha_path).unwrap();
    assert_eq!(combined.pixel(5, 2).a, 50);
    assert_eq!(combined.pixel(5, 2).r, img.pixel(5, 2).r);

    let small_path = dir.path().join("small.ppm");
    pixmap_io::try_save(&PixelBuffer::filled(2, 2, Color::WHITE).unwrap(), &small_path, ImageFormat::Unspecified)
        .unwrap();
    assert!(matches!(
        pixmap_io::read_with_alpha(&rgb_path, &small_path),
        Err(IoError::Core(_))
    ));
}
