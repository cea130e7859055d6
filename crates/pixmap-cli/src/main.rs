//! pixmap - bitmap processing from the command line
//!
//! Thin front end over pixmap-io (load/save) and pixmap-ops (processing).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pixmap_core::Color;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixmap")]
#[command(author, version, about = "RGBA8 bitmap processing")]
#[command(long_about = "
Load, transform and save PNG, JPEG, PPM and WebP images.

Examples:
  pixmap info photo.jpg                       # Show size and format
  pixmap convert in.png out.webp              # Convert formats
  pixmap convert in.png out.jpg -q 80
  pixmap resize in.png -o out.png -w 640 -f lanczos
  pixmap blur in.png -o out.png -t gaussian -r 2
  pixmap transform in.png -o out.png --rotate 90 --mirror
  pixmap adjust in.png -o out.png --grayscale --gamma 2.2
  pixmap fill in.png -o out.png -x 10 -y 10 --color 255,0,0
  pixmap trace sprite.png --holes             # Print outline polygons
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convert image format
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Resize/scale image
    #[command(visible_alias = "r")]
    Resize(ResizeArgs),

    /// Apply blur filter
    Blur(BlurArgs),

    /// Rotate, flip, crop or frame an image
    Transform(TransformArgs),

    /// Pointwise color adjustments and neighbourhood effects
    Adjust(AdjustArgs),

    /// Flood fill from a seed pixel
    Fill(FillArgs),

    /// Trace region outlines into polygons
    Trace(TraceArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Decode and show pixel statistics
    #[arg(short, long)]
    stats: bool,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input image
    input: PathBuf,

    /// Output image (format from extension)
    output: PathBuf,

    /// Quality (JPEG 1-100, WebP 0-100)
    #[arg(short = 'q', long)]
    quality: Option<u8>,

    /// PNG compression
    #[arg(short = 'c', long, value_enum)]
    compression: Option<CompressionArg>,

    /// PPM variant
    #[arg(long, value_enum, default_value = "binary-rgb")]
    ppm: PpmArg,
}

#[derive(Args)]
struct ResizeArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Target width
    #[arg(short, long)]
    width: Option<u32>,

    /// Target height
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Scale factor (e.g., 0.5, 2.0)
    #[arg(short, long)]
    scale: Option<f64>,

    /// Interpolation
    #[arg(short, long, value_enum, default_value = "auto")]
    filter: FilterArg,

    /// Keep aspect ratio inside width x height
    #[arg(long)]
    fit: bool,

    /// With --fit, also enlarge images smaller than the box
    #[arg(long)]
    scale_up: bool,
}

#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Blur type
    #[arg(short = 't', long = "type", value_enum, default_value = "box")]
    blur_type: BlurType,

    /// Radius in pixels (box), or half the kernel size (gaussian, median)
    #[arg(short, long, default_value = "1")]
    radius: u32,

    /// Edge handling for gaussian blur
    #[arg(long, value_enum, default_value = "reflect101")]
    border: BorderArg,
}

#[derive(Args)]
struct TransformArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Crop first: x,y,width,height
    #[arg(long, value_parser = commands::parse_rect)]
    crop: Option<pixmap_core::Rect>,

    /// Clockwise rotation in degrees (90, 180, 270)
    #[arg(long, value_parser = ["90", "180", "270"])]
    rotate: Option<String>,

    /// Flip horizontally
    #[arg(long)]
    mirror: bool,

    /// Flip vertically
    #[arg(long)]
    flip: bool,

    /// Add a border this many pixels wide
    #[arg(long)]
    border: Option<i32>,

    /// Border color r,g,b[,a]
    #[arg(long, value_parser = commands::parse_color, default_value = "0,0,0,255")]
    border_color: Color,
}

#[derive(Args)]
struct AdjustArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Invert RGB
    #[arg(long)]
    negate: bool,

    /// Convert to BT.601 luminance
    #[arg(long)]
    grayscale: bool,

    /// Sepia tone strength
    #[arg(long)]
    sepia: Option<i32>,

    /// Add to every RGB channel
    #[arg(long, allow_hyphen_values = true)]
    brighten: Option<i32>,

    /// Gamma correction
    #[arg(long)]
    gamma: Option<f64>,

    /// Quantize to this many levels per channel
    #[arg(long)]
    posterize: Option<u32>,

    /// Binarize at this luminance
    #[arg(long)]
    threshold: Option<u8>,

    /// Binarize against the local mean of this odd block size
    #[arg(long)]
    adaptive: Option<u32>,

    /// Swap black and white for --threshold / --adaptive
    #[arg(long)]
    inverse: bool,

    /// Average NxN blocks
    #[arg(long)]
    mosaic: Option<u32>,

    /// Scatter pixels within this radius
    #[arg(long)]
    spread: Option<u32>,

    /// Seed for --spread
    #[arg(long)]
    seed: Option<u64>,

    /// Morphological dilation iterations
    #[arg(long)]
    dilate: Option<u32>,

    /// Morphological erosion iterations
    #[arg(long)]
    erode: Option<u32>,
}

#[derive(Args)]
struct FillArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Seed x
    #[arg(short)]
    x: i32,

    /// Seed y
    #[arg(short)]
    y: i32,

    /// Fill color r,g,b[,a]
    #[arg(long, value_parser = commands::parse_color)]
    color: Color,

    /// Allowed decrease per channel relative to the seed
    #[arg(long, default_value = "0")]
    lower: u8,

    /// Allowed increase per channel relative to the seed
    #[arg(long, default_value = "0")]
    upper: u8,

    /// Grow through diagonal neighbours too
    #[arg(long)]
    eight: bool,
}

#[derive(Args)]
struct TraceArgs {
    /// Input image
    input: PathBuf,

    /// Foreground threshold
    #[arg(short, long, default_value_t = pixmap_ops::contour::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Threshold luminance instead of alpha
    #[arg(long)]
    luma: bool,

    /// Report interior holes
    #[arg(long)]
    holes: bool,

    /// Put the image center at the origin
    #[arg(long)]
    centered: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    Nearest,
    Linear,
    Cubic,
    Area,
    Lanczos,
    Auto,
}

#[derive(Clone, Copy, ValueEnum)]
enum BlurType {
    Box,
    Gaussian,
    Median,
}

#[derive(Clone, Copy, ValueEnum)]
enum BorderArg {
    Replicate,
    Reflect,
    Reflect101,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Fastest,
    Fast,
    Balanced,
    High,
}

#[derive(Clone, Copy, ValueEnum)]
enum PpmArg {
    AsciiRgb,
    BinaryRgb,
    AsciiGray,
    BinaryGray,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Resize(args) => commands::resize::run(args, cli.verbose),
        Commands::Blur(args) => commands::blur::run(args, cli.verbose),
        Commands::Transform(args) => commands::transform::run(args, cli.verbose),
        Commands::Adjust(args) => commands::adjust::run(args, cli.verbose),
        Commands::Fill(args) => commands::fill::run(args, cli.verbose),
        Commands::Trace(args) => commands::trace::run(args, cli.verbose),
    }
}
