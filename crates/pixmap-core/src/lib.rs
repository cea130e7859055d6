//! # pixmap-core
//!
//! Core types of the pixmap bitmap engine.
//!
//! - [`PixelBuffer`] - Dense row-major RGBA8 bitmap with checked and
//!   unchecked access tiers
//! - [`Color`], [`ColorF`] - 8-bit and floating-point RGBA pixels
//! - [`Rect`], [`Point`] - Signed integer geometry for addressing regions
//! - [`sampling`] - Repeat / Clamp / Mirror boundary policies and bilinear
//!   sampling
//! - [`Error`] - Construction and access failures
//!
//! ## Crate Structure
//!
//! ```text
//! pixmap-core (this crate)
//!    ^
//!    |
//!    +-- pixmap-ops (geometry, resampling, filters, regions, textures)
//!    +-- pixmap-io  (PNG / JPEG / PPM / WebP codecs)
//!    +-- pixmap-cli
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pixmap_core::prelude::*;
//!
//! let mut img = PixelBuffer::filled(16, 16, Color::WHITE)?;
//! img.set_pixel(0, 0, Color::BLACK);
//! assert_eq!(img.pixel_repeat(16, 16), Color::BLACK);
//! # Ok::<(), pixmap_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;
pub mod sampling;

pub use error::{Error, Result};
pub use image::{Generator, MAX_HEIGHT, MAX_WIDTH, PixelBuffer, validate_size};
pub use pixel::{Color, ColorF, LUMA_B, LUMA_G, LUMA_R, quantize};
pub use rect::{Point, Rect};
pub use sampling::BoundaryMode;

/// Prelude module for convenient imports.
///
/// ```
/// use pixmap_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Generator, PixelBuffer};
    pub use crate::pixel::{Color, ColorF};
    pub use crate::rect::{Point, Rect};
    pub use crate::sampling::BoundaryMode;
}
