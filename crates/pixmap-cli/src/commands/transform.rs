//! Transform command
//!
//! Applied in order: crop, rotate, mirror, flip, border.

use crate::TransformArgs;
use anyhow::{Result, bail};
use pixmap_ops::PixelBufferExt;
use tracing::{info, trace};

pub fn run(args: TransformArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), "transform::run");
    let mut image = super::load_image(&args.input)?;
    let mut applied = Vec::new();

    if let Some(rect) = args.crop {
        image = image.clipped(rect);
        if image.is_empty() {
            bail!("Crop rectangle lies outside the image");
        }
        applied.push("crop");
    }

    match args.rotate.as_deref() {
        Some("90") => {
            image.rotate90();
            applied.push("rotate 90");
        }
        Some("180") => {
            image.rotate180();
            applied.push("rotate 180");
        }
        Some("270") => {
            image.rotate270();
            applied.push("rotate 270");
        }
        _ => {}
    }

    if args.mirror {
        image.mirror();
        applied.push("mirror");
    }
    if args.flip {
        image.flip();
        applied.push("flip");
    }
    if let Some(thickness) = args.border {
        image = image.bordered(thickness, args.border_color)?;
        applied.push("border");
    }

    if applied.is_empty() {
        bail!("No transform specified. Use --crop, --rotate, --mirror, --flip or --border");
    }

    info!(ops = ?applied, w = image.width(), h = image.height(), "Transformed");
    super::save_image(&args.output, &image)?;
    if verbose {
        println!("Applied: {}", applied.join(", "));
    }
    Ok(())
}
