//! Resize command.
//!
//! Exact size, scale factor, or aspect-preserving fit.

use crate::{FilterArg, ResizeArgs};
use anyhow::{Result, bail};
use pixmap_ops::{Interpolation, PixelBufferExt};
use tracing::{info, trace};

pub fn run(args: ResizeArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), "resize::run");
    let mut image = super::load_image(&args.input)?;
    let (src_w, src_h) = image.size();
    let interp = interpolation(args.filter);

    if let Some(factor) = args.scale {
        image = image.scaled_by(factor, interp)?;
    } else if args.fit {
        let (Some(w), Some(h)) = (args.width, args.height) else {
            bail!("--fit needs both --width and --height");
        };
        image.fit(w, h, args.scale_up, interp)?;
    } else {
        let (w, h) = match (args.width, args.height) {
            (Some(w), Some(h)) => (w, h),
            // keep aspect from one side
            (Some(w), None) => (w, aspect(src_h, w, src_w)),
            (None, Some(h)) => (aspect(src_w, h, src_h), h),
            (None, None) => bail!("Must specify --width, --height, or --scale"),
        };
        image.scale(w, h, interp)?;
    }

    info!(src_w, src_h, dst_w = image.width(), dst_h = image.height(), "Resized");
    super::save_image(&args.output, &image)?;

    if verbose {
        println!(
            "Resized {}x{} -> {}x{}",
            src_w,
            src_h,
            image.width(),
            image.height()
        );
    }
    Ok(())
}

/// `other * target / side`, at least 1.
fn aspect(other: u32, target: u32, side: u32) -> u32 {
    ((u64::from(other) * u64::from(target) + u64::from(side) / 2) / u64::from(side.max(1))).max(1) as u32
}

pub(crate) fn interpolation(f: FilterArg) -> Interpolation {
    match f {
        FilterArg::Nearest => Interpolation::Nearest,
        FilterArg::Linear => Interpolation::Linear,
        FilterArg::Cubic => Interpolation::Cubic,
        FilterArg::Area => Interpolation::Area,
        FilterArg::Lanczos => Interpolation::Lanczos,
        FilterArg::Auto => Interpolation::Auto,
    }
}
