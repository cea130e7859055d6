//! Convert command.
//!
//! The output format comes from the output extension; format options not
//! relevant to it are ignored.

use crate::{CompressionArg, ConvertArgs, PpmArg};
use anyhow::{Context, Result, bail};
use pixmap_io::jpeg::JpegOptions;
use pixmap_io::png::{PngCompression, PngOptions};
use pixmap_io::ppm::{PpmOptions, PpmType};
use pixmap_io::webp::WebpOptions;
use pixmap_io::{EncodeOptions, ImageFormat};
use tracing::{info, trace};

pub fn run(args: ConvertArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "convert::run");
    let image = super::load_image(&args.input)?;

    let format = ImageFormat::from_extension(&args.output);
    let options = match format {
        ImageFormat::Png => EncodeOptions::Png(PngOptions {
            compression: args.compression.map(compression).unwrap_or_default(),
            ..Default::default()
        }),
        ImageFormat::Jpeg => EncodeOptions::Jpeg(JpegOptions {
            quality: args.quality.unwrap_or(JpegOptions::default().quality),
        }),
        ImageFormat::Ppm => EncodeOptions::Ppm(PpmOptions { kind: ppm_type(args.ppm) }),
        ImageFormat::WebP => {
            let defaults = WebpOptions::default();
            EncodeOptions::WebP(WebpOptions {
                quality: args.quality.map_or(defaults.quality, f32::from),
                ..defaults
            })
        }
        ImageFormat::Unspecified => bail!("Unknown output format: {}", args.output.display()),
    };

    info!(%format, w = image.width(), h = image.height(), "Converting");
    pixmap_io::try_save_with(&image, &args.output, &options)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose {
        println!("{} -> {} ({format})", args.input.display(), args.output.display());
    }
    Ok(())
}

fn compression(c: CompressionArg) -> PngCompression {
    match c {
        CompressionArg::None => PngCompression::None,
        CompressionArg::Fastest => PngCompression::Fastest,
        CompressionArg::Fast => PngCompression::Fast,
        CompressionArg::Balanced => PngCompression::Balanced,
        CompressionArg::High => PngCompression::High,
    }
}

fn ppm_type(p: PpmArg) -> PpmType {
    match p {
        PpmArg::AsciiRgb => PpmType::AsciiRgb,
        PpmArg::BinaryRgb => PpmType::BinaryRgb,
        PpmArg::AsciiGray => PpmType::AsciiGray,
        PpmArg::BinaryGray => PpmType::BinaryGray,
    }
}
