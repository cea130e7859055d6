//! CLI command implementations

pub mod adjust;
pub mod blur;
pub mod convert;
pub mod fill;
pub mod info;
pub mod resize;
pub mod trace;
pub mod transform;

use anyhow::{Context, Result};
use pixmap_core::{Color, PixelBuffer, Rect};
use pixmap_io::ImageFormat;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    pixmap_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path, format from extension
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    pixmap_io::try_save(image, path, ImageFormat::Unspecified)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn parse_list<const N: usize, T: std::str::FromStr>(s: &str, what: &str) -> Result<Vec<T>, String> {
    let parts: Vec<T> = s
        .split(',')
        .map(|p| p.trim().parse::<T>().map_err(|_| format!("invalid {what} component '{p}'")))
        .collect::<Result<_, _>>()?;
    if parts.len() > N {
        return Err(format!("{what} takes at most {N} components"));
    }
    Ok(parts)
}

/// Parses `r,g,b` or `r,g,b,a`.
pub fn parse_color(s: &str) -> Result<Color, String> {
    match parse_list::<4, u8>(s, "color")?.as_slice() {
        &[r, g, b] => Ok(Color::rgb(r, g, b)),
        &[r, g, b, a] => Ok(Color::new(r, g, b, a)),
        _ => Err("expected r,g,b or r,g,b,a".into()),
    }
}

/// Parses `x,y,width,height`.
pub fn parse_rect(s: &str) -> Result<Rect, String> {
    match parse_list::<4, i32>(s, "rect")?.as_slice() {
        &[x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err("expected x,y,width,height".into()),
    }
}
