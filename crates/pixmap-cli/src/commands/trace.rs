//! Trace command
//!
//! Prints one block per polygon: the outer ring, then each hole.

use crate::TraceArgs;
use anyhow::Result;
use pixmap_ops::contour::{self, MultiPolygon};
use pixmap_ops::Vec2;
use tracing::{info, trace};

pub fn run(args: TraceArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), threshold = args.threshold, "trace::run");
    let image = super::load_image(&args.input)?;

    let polygons: MultiPolygon = match (args.luma, args.centered) {
        (false, false) => contour::alpha_to_polygons(&image, args.threshold, args.holes),
        (false, true) => contour::alpha_to_polygons_centered(&image, args.threshold, args.holes),
        (true, false) => contour::grayscale_to_polygons(&image, args.threshold, args.holes),
        (true, true) => contour::grayscale_to_polygons_centered(&image, args.threshold, args.holes),
    };
    info!(count = polygons.len(), "Traced");

    for (i, poly) in polygons.iter().enumerate() {
        println!("polygon {i} area={}", poly.area());
        println!("  outer: {}", ring(poly.outer()));
        for hole in poly.holes() {
            println!("  hole:  {}", ring(hole));
        }
    }
    if verbose {
        println!("{} polygon(s)", polygons.len());
    }
    Ok(())
}

fn ring(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|p| format!("({},{})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
