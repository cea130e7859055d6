//! Flood fill command.

use crate::FillArgs;
use anyhow::{Result, bail};
use pixmap_core::Point;
use pixmap_ops::Connectivity;
use pixmap_ops::region::flood_fill;
use tracing::{info, trace};

pub fn run(args: FillArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), x = args.x, y = args.y, "fill::run");
    let mut image = super::load_image(&args.input)?;
    let seed = Point::new(args.x, args.y);
    if image.get(seed.x, seed.y).is_none() {
        bail!(
            "Seed ({}, {}) is outside the {}x{} image",
            seed.x,
            seed.y,
            image.width(),
            image.height()
        );
    }

    let connectivity = if args.eight { Connectivity::Eight } else { Connectivity::Four };
    let filled = flood_fill(&mut image, seed, args.color, connectivity, args.lower, args.upper);
    info!(filled, "Flood fill");

    super::save_image(&args.output, &image)?;
    if verbose {
        println!("Filled {filled} pixels");
    }
    Ok(())
}
