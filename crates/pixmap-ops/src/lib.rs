//! # pixmap-ops
//!
//! Operations over [`pixmap_core::PixelBuffer`].
//!
//! # Modules
//!
//! - [`geometry`] - Clipping, quarter-turn rotation, flips, borders and
//!   compositing one buffer onto another
//! - [`resize`] - Nearest / bilinear / bicubic / area / Lanczos resampling
//! - [`filter`] - Box, Gaussian and median blur, morphology, adaptive
//!   threshold, mosaic and spread
//! - [`color`] - Pointwise transforms (negate, grayscale, gamma, ...)
//! - [`region`] - Flood fill
//! - [`contour`] - Polygon extraction from alpha or luminance masks
//! - [`texture`] - GPU texture upload boundary with an in-memory store
//!
//! Every function is also reachable as a method through [`PixelBufferExt`].
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_ops::{Interpolation, PixelBufferExt};
//!
//! let img = PixelBuffer::filled(4, 4, Color::rgb(255, 0, 0))?;
//! let small = img.scaled(2, 2, Interpolation::Nearest)?;
//! assert!(small.pixels().iter().all(|&c| c == Color::rgb(255, 0, 0)));
//! # Ok::<(), pixmap_ops::OpsError>(())
//! ```
//!
//! # Parallelism
//!
//! With the default `parallel` feature, row-independent passes run on the
//! global rayon pool. Results do not depend on the thread count.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod ext;
mod parallel;

pub mod color;
pub mod contour;
pub mod filter;
pub mod geometry;
pub mod region;
pub mod resize;
pub mod texture;

pub use contour::{MultiPolygon, Polygon, Vec2};
pub use error::{OpsError, OpsResult};
pub use ext::PixelBufferExt;
pub use filter::{AdaptiveMethod, BorderType};
pub use region::Connectivity;
pub use resize::Interpolation;
pub use texture::{MemoryTextureStore, RegionSource, TextureDesc, TextureError, TextureHandle, TextureUploader};
