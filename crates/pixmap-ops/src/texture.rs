//! Texture upload boundary.
//!
//! Renderers implement [`TextureUploader`] to receive a [`PixelBuffer`],
//! its mip chain and a [`TextureDesc`], and hand back an opaque
//! [`TextureHandle`]. [`MemoryTextureStore`] keeps textures in CPU memory
//! and serves headless tools and tests.
//!
//! # Mip chains
//!
//! Level `n + 1` is level `n` halved in each dimension (rounded down,
//! never below 1) with area averaging, down to `1x1`. The base image is
//! level 0 and is not part of the `mips` slice.
//!
//! ```rust
//! use pixmap_core::{Color, PixelBuffer};
//! use pixmap_ops::texture::{generate_mips, MemoryTextureStore, TextureDesc, TextureUploader};
//!
//! let img = PixelBuffer::filled(8, 2, Color::WHITE)?;
//! let mips = generate_mips(&img);
//! assert_eq!(mips.iter().map(|m| m.size()).collect::<Vec<_>>(), vec![(4, 1), (2, 1), (1, 1)]);
//!
//! let mut store = MemoryTextureStore::new();
//! let handle = store.create(&img, TextureDesc::Mipped).unwrap();
//! assert_eq!(store.size(handle), Some((8, 2)));
//! # Ok::<(), pixmap_core::Error>(())
//! ```

use crate::resize::{Interpolation, scale};
use pixmap_core::{Color, PixelBuffer, Rect};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// How a texture is sampled on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureDesc {
    /// Single level, linear color.
    #[default]
    Unmipped,
    /// Full mip chain, linear color.
    Mipped,
    /// Single level, sRGB color.
    UnmippedSrgb,
    /// Full mip chain, sRGB color.
    MippedSrgb,
}

impl TextureDesc {
    /// Whether the descriptor asks for a mip chain.
    pub fn has_mipmaps(self) -> bool {
        matches!(self, Self::Mipped | Self::MippedSrgb)
    }

    /// Whether texels are sRGB encoded.
    pub fn is_srgb(self) -> bool {
        matches!(self, Self::UnmippedSrgb | Self::MippedSrgb)
    }
}

/// Opaque texture identifier issued by an uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    /// Wraps a backend-specific id.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Backend-specific id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Pixels written by [`TextureUploader::fill_region`].
#[derive(Debug, Clone, Copy)]
pub enum RegionSource<'a> {
    /// A solid color.
    Color(Color),
    /// A buffer exactly the size of the region.
    Pixels(&'a PixelBuffer),
}

/// Upload failures.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Textures need at least one pixel.
    #[error("cannot upload an empty image")]
    EmptyImage,

    /// A mip level does not have the expected size.
    #[error("mip level {level} is {got:?}, expected {expected:?}")]
    MipSizeMismatch {
        /// Level index (1 = first level below the base)
        level: usize,
        /// Size implied by the level above
        expected: (u32, u32),
        /// Size supplied
        got: (u32, u32),
    },

    /// Backend-specific failure.
    #[error("texture backend error: {0}")]
    Backend(String),
}

/// Size of the level below `size`.
#[inline]
pub fn next_mip_size((w, h): (u32, u32)) -> (u32, u32) {
    ((w / 2).max(1), (h / 2).max(1))
}

/// Number of levels in a full chain, including the base.
pub fn mip_level_count(width: u32, height: u32) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    (32 - width.max(height).leading_zeros()) as usize
}

/// Builds levels 1.. of the mip chain for `image`.
pub fn generate_mips(image: &PixelBuffer) -> Vec<PixelBuffer> {
    let levels = mip_level_count(image.width(), image.height()).saturating_sub(1);
    let mut mips: Vec<PixelBuffer> = Vec::with_capacity(levels);
    for _ in 0..levels {
        let prev = mips.last().unwrap_or(image);
        let (w, h) = next_mip_size(prev.size());
        match scale(prev, w, h, Interpolation::Area) {
            Ok(level) => mips.push(level),
            Err(err) => {
                warn!(%err, "mip generation stopped");
                break;
            }
        }
    }
    debug!(levels = mips.len(), "generated mips");
    mips
}

/// Checks that `mips` follows the halving rule from `image`.
pub fn validate_mips(image: &PixelBuffer, mips: &[PixelBuffer]) -> Result<(), TextureError> {
    let mut expected = image.size();
    for (i, mip) in mips.iter().enumerate() {
        expected = next_mip_size(expected);
        if mip.size() != expected {
            return Err(TextureError::MipSizeMismatch {
                level: i + 1,
                expected,
                got: mip.size(),
            });
        }
    }
    Ok(())
}

/// The external renderer's texture interface.
pub trait TextureUploader {
    /// Uploads a base image plus explicit mip levels.
    fn upload(
        &mut self,
        image: &PixelBuffer,
        mips: &[PixelBuffer],
        desc: TextureDesc,
    ) -> Result<TextureHandle, TextureError>;

    /// Overwrites `rect` of level 0. Returns `false` on an unknown handle,
    /// a rect outside the texture, or a source of the wrong size.
    fn fill_region(&mut self, handle: TextureHandle, source: RegionSource<'_>, rect: Rect) -> bool;

    /// Frees a texture. Returns `false` if the handle was unknown.
    fn release(&mut self, handle: TextureHandle) -> bool;

    /// Size of level 0.
    fn size(&self, handle: TextureHandle) -> Option<(u32, u32)>;

    /// Uploads `image`, generating mips when `desc` asks for them.
    fn create(&mut self, image: &PixelBuffer, desc: TextureDesc) -> Result<TextureHandle, TextureError> {
        let mips = if desc.has_mipmaps() { generate_mips(image) } else { Vec::new() };
        self.upload(image, &mips, desc)
    }
}

#[derive(Debug)]
struct StoredTexture {
    desc: TextureDesc,
    levels: Vec<PixelBuffer>,
}

/// CPU-resident [`TextureUploader`].
#[derive(Debug, Default)]
pub struct MemoryTextureStore {
    next_id: u64,
    textures: HashMap<u64, StoredTexture>,
}

impl MemoryTextureStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Returns `true` if no textures are live.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Descriptor of a texture.
    pub fn desc(&self, handle: TextureHandle) -> Option<TextureDesc> {
        self.textures.get(&handle.0).map(|t| t.desc)
    }

    /// Stored level `level` (0 = base).
    pub fn level(&self, handle: TextureHandle, level: usize) -> Option<&PixelBuffer> {
        self.textures.get(&handle.0)?.levels.get(level)
    }

    /// Number of stored levels including the base.
    pub fn level_count(&self, handle: TextureHandle) -> usize {
        self.textures.get(&handle.0).map_or(0, |t| t.levels.len())
    }
}

impl TextureUploader for MemoryTextureStore {
    fn upload(
        &mut self,
        image: &PixelBuffer,
        mips: &[PixelBuffer],
        desc: TextureDesc,
    ) -> Result<TextureHandle, TextureError> {
        if image.is_empty() {
            return Err(TextureError::EmptyImage);
        }
        validate_mips(image, mips)?;
        self.next_id += 1;
        let mut levels = Vec::with_capacity(mips.len() + 1);
        levels.push(image.clone());
        levels.extend(mips.iter().cloned());
        debug!(id = self.next_id, levels = levels.len(), ?desc, "texture uploaded");
        self.textures.insert(self.next_id, StoredTexture { desc, levels });
        Ok(TextureHandle(self.next_id))
    }

    fn fill_region(&mut self, handle: TextureHandle, source: RegionSource<'_>, rect: Rect) -> bool {
        let Some(tex) = self.textures.get_mut(&handle.0) else {
            return false;
        };
        let Some(base) = tex.levels.first_mut() else {
            return false;
        };
        if rect.is_empty() || rect.intersect(&base.bounds()) != Some(rect) {
            return false;
        }
        match source {
            RegionSource::Color(color) => {
                for y in rect.y..rect.y + rect.height {
                    base.row_mut(y as u32)[rect.x as usize..(rect.x + rect.width) as usize].fill(color);
                }
            }
            RegionSource::Pixels(pixels) => {
                if pixels.size() != (rect.width as u32, rect.height as u32) {
                    return false;
                }
                crate::geometry::overwrite(base, pixels, rect.x, rect.y);
            }
        }
        true
    }

    fn release(&mut self, handle: TextureHandle) -> bool {
        self.textures.remove(&handle.0).is_some()
    }

    fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle.0)?.levels.first().map(PixelBuffer::size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(8, 2), 4);
        assert_eq!(mip_level_count(9, 3), 4);
        assert_eq!(mip_level_count(0, 0), 0);
    }

    #[test]
    fn test_generate_mips_average() {
        let mut img = PixelBuffer::filled(2, 2, Color::BLACK).unwrap();
        img.set_pixel(0, 0, Color::WHITE);
        img.set_pixel(1, 1, Color::WHITE);
        let mips = generate_mips(&img);
        assert_eq!(mips.len(), 1);
        assert_eq!(mips[0].pixel(0, 0), Color::new(128, 128, 128, 255));
    }

    #[test]
    fn test_upload_rejects_bad_chain() {
        let mut store = MemoryTextureStore::new();
        let img = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
        let bad = vec![PixelBuffer::filled(3, 2, Color::WHITE).unwrap()];
        assert!(matches!(
            store.upload(&img, &bad, TextureDesc::Mipped),
            Err(TextureError::MipSizeMismatch { level: 1, .. })
        ));
        assert!(matches!(
            store.upload(&PixelBuffer::empty(), &[], TextureDesc::Unmipped),
            Err(TextureError::EmptyImage)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_and_release() {
        let mut store = MemoryTextureStore::new();
        let img = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
        let a = store.create(&img, TextureDesc::MippedSrgb).unwrap();
        let b = store.create(&img, TextureDesc::Unmipped).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.level_count(a), 3);
        assert_eq!(store.level_count(b), 1);
        assert!(store.desc(a).unwrap().is_srgb());
        assert!(store.release(a));
        assert!(!store.release(a));
        assert_eq!(store.size(a), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fill_region() {
        let mut store = MemoryTextureStore::new();
        let img = PixelBuffer::filled(4, 4, Color::BLACK).unwrap();
        let h = store.create(&img, TextureDesc::Unmipped).unwrap();

        assert!(store.fill_region(h, RegionSource::Color(Color::WHITE), Rect::new(1, 1, 2, 2)));
        let base = store.level(h, 0).unwrap();
        assert_eq!(base.pixel(1, 1), Color::WHITE);
        assert_eq!(base.pixel(3, 3), Color::BLACK);

        let patch = PixelBuffer::filled(2, 1, Color::rgb(0, 0, 255)).unwrap();
        assert!(store.fill_region(h, RegionSource::Pixels(&patch), Rect::new(2, 3, 2, 1)));
        assert_eq!(store.level(h, 0).unwrap().pixel(3, 3), Color::rgb(0, 0, 255));

        assert!(!store.fill_region(h, RegionSource::Pixels(&patch), Rect::new(0, 0, 1, 1)));
        assert!(!store.fill_region(h, RegionSource::Color(Color::WHITE), Rect::new(3, 3, 2, 2)));
        assert!(!store.fill_region(TextureHandle::from_raw(99), RegionSource::Color(Color::WHITE), Rect::new(0, 0, 1, 1)));
    }
}
