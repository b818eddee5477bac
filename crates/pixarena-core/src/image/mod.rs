//! Image - the pixel container
//!
//! An [`Image`] pairs a source path with an optional [`PixelBuffer`] and the
//! [`AllocStrategy`] every buffer it ever holds is allocated with.
//!
//! # Lifecycle
//!
//! ```text
//! Empty --load ok--> Loaded --(invert | scale | rotate)*--> Loaded --(save)*
//!   ^  |
//!   +--+ load failed
//! ```
//!
//! # Ownership model
//!
//! Heap-backed images own their buffer and free it when it is replaced or
//! when the image is dropped. Arena-backed images borrow the [`Arena`] for
//! `'a`, so an image can never outlive the arena its samples live in;
//! replaced arena buffers are handed back to [`Arena::release`] and stay
//! reserved until the arena is dropped.
//!
//! Buffer replacement is always allocate-new, compute, swap, release-old:
//! a failed allocation leaves the current buffer untouched.

mod buffer;
mod invert;

pub use buffer::{AllocStrategy, MAX_CHANNELS, PixelBuffer, buffer_len};

use crate::arena::Arena;
use crate::codec::{Codec, DecodedImage, RawImage};
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image geometry as reported by [`Image::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {}, {} channels",
            self.width, self.height, self.channels
        )
    }
}

/// A raster image bound to an allocation strategy.
#[derive(Debug)]
pub struct Image<'a> {
    source: PathBuf,
    strategy: AllocStrategy<'a>,
    pixels: Option<PixelBuffer<'a>>,
}

impl<'a> Image<'a> {
    /// Create an empty, heap-backed image for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_strategy(path, AllocStrategy::Heap)
    }

    /// Create an empty image whose buffers are carved out of `arena`.
    pub fn with_arena(path: impl Into<PathBuf>, arena: &'a Arena) -> Self {
        Self::with_strategy(path, AllocStrategy::Arena(arena))
    }

    /// Create an empty image with an explicit allocation strategy.
    pub fn with_strategy(path: impl Into<PathBuf>, strategy: AllocStrategy<'a>) -> Self {
        Self {
            source: path.into(),
            strategy,
            pixels: None,
        }
    }

    /// Build a loaded image directly from flat samples.
    ///
    /// The samples are copied into a buffer allocated with `strategy`, just
    /// as [`Image::load`] does with decoder output.
    pub fn from_samples(
        strategy: AllocStrategy<'a>,
        width: u32,
        height: u32,
        channels: u32,
        samples: &[u8],
    ) -> Result<Self> {
        let mut image = Self::with_strategy(PathBuf::new(), strategy);
        image.install_samples(width, height, channels, samples)?;
        Ok(image)
    }

    /// Decode the source file through `codec` and load its samples.
    ///
    /// # Errors
    ///
    /// Decoder failures, malformed decoder output, or arena exhaustion.
    /// On any error the image keeps its previous state.
    pub fn load<C: Codec + ?Sized>(&mut self, codec: &C) -> Result<()> {
        let DecodedImage {
            width,
            height,
            channels,
            data,
        } = codec.decode(&self.source)?;
        self.install_samples(width, height, channels, &data)?;
        info!(path = %self.source.display(), "image loaded");
        Ok(())
    }

    fn install_samples(
        &mut self,
        width: u32,
        height: u32,
        channels: u32,
        samples: &[u8],
    ) -> Result<()> {
        let expected = buffer_len(width, height, channels)?;
        if samples.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        let mut buffer = self.allocate_buffer(width, height, channels)?;
        buffer.as_bytes_mut().copy_from_slice(samples);
        self.replace_pixels(buffer);
        Ok(())
    }

    /// Path the image is loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Allocation strategy used for every buffer of this image.
    pub fn strategy(&self) -> AllocStrategy<'a> {
        self.strategy
    }

    /// True once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.pixels.is_some()
    }

    /// Width in pixels (0 when empty).
    pub fn width(&self) -> u32 {
        self.pixels.as_ref().map_or(0, PixelBuffer::width)
    }

    /// Height in pixels (0 when empty).
    pub fn height(&self) -> u32 {
        self.pixels.as_ref().map_or(0, PixelBuffer::height)
    }

    /// Samples per pixel (0 when empty).
    pub fn channels(&self) -> u32 {
        self.pixels.as_ref().map_or(0, PixelBuffer::channels)
    }

    /// Current geometry.
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width(),
            height: self.height(),
            channels: self.channels(),
        }
    }

    /// The pixel buffer, if loaded.
    pub fn pixels(&self) -> Option<&PixelBuffer<'a>> {
        self.pixels.as_ref()
    }

    /// The pixel buffer, mutably, if loaded.
    pub fn pixels_mut(&mut self) -> Option<&mut PixelBuffer<'a>> {
        self.pixels.as_mut()
    }

    /// Allocate a fresh buffer with this image's strategy.
    ///
    /// The image itself is not modified; install the result with
    /// [`Image::replace_pixels`].
    pub fn allocate_buffer(
        &self,
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<PixelBuffer<'a>> {
        PixelBuffer::allocate(self.strategy, width, height, channels)
    }

    /// Install `buffer` as the image's pixels and release the old buffer.
    ///
    /// Geometry and samples change together since they travel in one
    /// [`PixelBuffer`].
    pub fn replace_pixels(&mut self, buffer: PixelBuffer<'a>) {
        debug!(
            width = buffer.width(),
            height = buffer.height(),
            channels = buffer.channels(),
            strategy = self.strategy.name(),
            "pixel buffer installed"
        );
        if let Some(old) = self.pixels.replace(buffer) {
            old.release();
        }
    }

    /// Encode the current pixels to `path` through `codec`.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] for an empty image, or the codec's error.
    pub fn save<C: Codec + ?Sized>(&self, codec: &C, path: impl AsRef<Path>) -> Result<()> {
        let pixels = self.pixels.as_ref().ok_or(Error::NotLoaded)?;
        let path = path.as_ref();
        codec.encode(
            path,
            RawImage {
                width: pixels.width(),
                height: pixels.height(),
                channels: pixels.channels(),
                data: pixels.as_bytes(),
            },
        )?;
        info!(path = %path.display(), "image saved");
        Ok(())
    }
}
