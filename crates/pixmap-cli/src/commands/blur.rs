//! Blur command
//!
//! Box, gaussian or median blur.

use crate::{BlurArgs, BlurType, BorderArg};
use anyhow::{Result, bail};
use pixmap_ops::{BorderType, PixelBufferExt};
use tracing::{info, trace};

pub fn run(args: BlurArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), radius = args.radius, "blur::run");
    let Some(size) = kernel_size(args.radius) else {
        bail!("Blur radius {} is too large", args.radius);
    };
    let mut image = super::load_image(&args.input)?;

    info!(radius = args.radius, w = image.width(), h = image.height(), "Applying blur");
    if verbose {
        println!("Applying blur (radius={}) to {}", args.radius, args.input.display());
    }

    match args.blur_type {
        BlurType::Box => {
            image.blur(args.radius, args.radius);
        }
        BlurType::Gaussian => {
            image.gaussian_blur(size, size, border(args.border))?;
        }
        BlurType::Median => {
            image.median_blur(size.max(3))?;
        }
    }

    super::save_image(&args.output, &image)?;
    if verbose {
        println!("Done.");
    }
    Ok(())
}

/// `2 * radius + 1`, or `None` when it does not fit in `u32`.
fn kernel_size(radius: u32) -> Option<u32> {
    radius.checked_mul(2)?.checked_add(1)
}

fn border(b: BorderArg) -> BorderType {
    match b {
        BorderArg::Replicate => BorderType::Replicate,
        BorderArg::Reflect => BorderType::Reflect,
        BorderArg::Reflect101 => BorderType::Reflect101,
    }
}
