//! Image info command.
//!
//! Reads only the header unless `--stats` asks for pixel statistics.

use crate::InfoArgs;
use anyhow::{Context, Result};
use pixmap_core::PixelBuffer;
use pixmap_io::ImageFormat;
use std::fs;
use tracing::trace;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        trace!(path = %path.display(), "info::run");
        let bytes = fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
        let format = ImageFormat::detect(&bytes, Some(path.as_path()));
        let (w, h) = pixmap_io::image_size(&bytes, format)
            .with_context(|| format!("Failed to read header: {}", path.display()))?;

        println!("{}", path.display());
        println!("  Format:     {format} ({})", format.mime_type());
        println!("  Resolution: {w}x{h}");
        println!("  Pixels:     {}", u64::from(w) * u64::from(h));
        println!("  File size:  {}", super::format_size(bytes.len() as u64));

        if args.stats || verbose {
            let image = pixmap_io::decode(&bytes, format)
                .with_context(|| format!("Failed to decode: {}", path.display()))?;
            print_stats(&image);
        }

        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}

fn print_stats(image: &PixelBuffer) {
    let n = image.pixel_count().max(1) as f64;
    let mut sum = [0u64; 4];
    let (mut opaque, mut transparent) = (0usize, 0usize);
    for p in image.pixels() {
        for (s, v) in sum.iter_mut().zip(p.to_array()) {
            *s += u64::from(v);
        }
        match p.a {
            255 => opaque += 1,
            0 => transparent += 1,
            _ => {}
        }
    }
    let mean = sum.map(|s| s as f64 / n);
    println!(
        "  Mean RGBA:  {:.1}, {:.1}, {:.1}, {:.1}",
        mean[0], mean[1], mean[2], mean[3]
    );
    println!("  Opaque:     {opaque}");
    println!("  Clear:      {transparent}");
}
