//! Adjust command.
//!
//! Runs every requested adjustment in a fixed order: morphology, color
//! transforms, thresholds, then mosaic and spread.

use crate::AdjustArgs;
use anyhow::{Result, bail};
use pixmap_ops::filter;
use pixmap_ops::{AdaptiveMethod, PixelBufferExt};
use tracing::{info, trace};

pub fn run(args: AdjustArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), "adjust::run");
    let mut image = super::load_image(&args.input)?;
    let mut applied: Vec<String> = Vec::new();

    if let Some(n) = args.dilate {
        image.dilate(n);
        applied.push(format!("dilate {n}"));
    }
    if let Some(n) = args.erode {
        image.erode(n);
        applied.push(format!("erode {n}"));
    }
    if args.negate {
        image.negate();
        applied.push("negate".into());
    }
    if args.grayscale {
        image.grayscale();
        applied.push("grayscale".into());
    }
    if let Some(level) = args.sepia {
        image.sepia(level);
        applied.push(format!("sepia {level}"));
    }
    if let Some(level) = args.brighten {
        image.brighten(level);
        applied.push(format!("brighten {level}"));
    }
    if let Some(gamma) = args.gamma {
        image.gamma_correct(gamma)?;
        applied.push(format!("gamma {gamma}"));
    }
    if let Some(levels) = args.posterize {
        image.posterize(levels)?;
        applied.push(format!("posterize {levels}"));
    }
    if let Some(level) = args.threshold {
        image.threshold(level, args.inverse);
        applied.push(format!("threshold {level}"));
    }
    if let Some(block) = args.adaptive {
        image.adaptive_threshold(AdaptiveMethod::Mean, block, 0.0, args.inverse)?;
        applied.push(format!("adaptive threshold {block}"));
    }
    if let Some(cell) = args.mosaic {
        image.mosaic(cell, cell)?;
        applied.push(format!("mosaic {cell}"));
    }
    if let Some(radius) = args.spread {
        image = match args.seed {
            Some(seed) => filter::spread_seeded(&image, radius, radius, seed),
            None => image.spreaded(radius, radius),
        };
        applied.push(format!("spread {radius}"));
    }

    if applied.is_empty() {
        bail!("No adjustment specified");
    }

    info!(ops = ?applied, "Adjusted");
    super::save_image(&args.output, &image)?;
    if verbose {
        println!("Applied: {}", applied.join(", "));
    }
    Ok(())
}
