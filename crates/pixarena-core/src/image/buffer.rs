//! Flat pixel storage
//!
//! A [`PixelBuffer`] holds `height` rows of `width` pixels of `channels`
//! one-byte samples in a single allocation. Sample `(x, y, c)` lives at
//! `(y * width + x) * channels + c`. Where that allocation comes from is the
//! only difference between the two allocation strategies.

use crate::arena::{Arena, ArenaBlock};
use crate::error::{Error, Result};
use std::fmt;
use tracing::trace;

/// Maximum number of samples per pixel.
pub const MAX_CHANNELS: u32 = 4;

/// Where pixel buffers are allocated from.
#[derive(Debug, Clone, Copy, Default)]
pub enum AllocStrategy<'a> {
    /// Ordinary per-object heap allocation, released when replaced
    #[default]
    Heap,
    /// Sub-allocation of a shared arena, never individually reclaimed
    Arena(&'a Arena),
}

impl AllocStrategy<'_> {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            AllocStrategy::Heap => "heap",
            AllocStrategy::Arena(_) => "arena",
        }
    }
}

enum Storage<'a> {
    Heap(Vec<u8>),
    Arena {
        block: ArenaBlock<'a>,
        arena: &'a Arena,
    },
}

/// Interleaved 8-bit pixel samples with their geometry.
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    channels: u32,
    storage: Storage<'a>,
}

/// Number of bytes needed for a `width x height x channels` buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidChannels`] when `channels` is not in `1..=4` and
/// [`Error::InvalidDimension`] when the size overflows `usize`.
pub fn buffer_len(width: u32, height: u32, channels: u32) -> Result<usize> {
    if channels == 0 || channels > MAX_CHANNELS {
        return Err(Error::InvalidChannels(channels));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or(Error::InvalidDimension { width, height })
}

impl<'a> PixelBuffer<'a> {
    /// Allocate a buffer using `strategy`.
    ///
    /// Heap buffers start zeroed; arena buffers hold whatever the region
    /// contained.
    ///
    /// # Errors
    ///
    /// Geometry errors from [`buffer_len`], or [`Error::ArenaExhausted`]
    /// when the arena cannot hold the buffer.
    pub fn allocate(
        strategy: AllocStrategy<'a>,
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<Self> {
        let len = buffer_len(width, height, channels)?;
        let storage = match strategy {
            AllocStrategy::Heap => Storage::Heap(vec![0u8; len]),
            AllocStrategy::Arena(arena) => Storage::Arena {
                block: arena.allocate(len)?,
                arena,
            },
        };
        trace!(
            width,
            height,
            channels,
            strategy = strategy.name(),
            "pixel buffer allocated"
        );
        Ok(Self {
            width,
            height,
            channels,
            storage,
        })
    }

    /// Give the storage back to where it came from.
    ///
    /// Heap storage is freed; arena storage is handed to
    /// [`Arena::release`], which keeps it reserved.
    pub fn release(self) {
        match self.storage {
            Storage::Heap(data) => drop(data),
            Storage::Arena { block, arena } => arena.release(block),
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// True when the storage is an arena sub-allocation.
    pub fn is_arena_backed(&self) -> bool {
        matches!(self.storage, Storage::Arena { .. })
    }

    /// Offset of sample `(x, y, c)` in the flat buffer.
    #[inline]
    pub fn index(&self, x: u32, y: u32, c: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize + c as usize
    }

    /// Read sample `c` of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32, c: u32) -> u8 {
        self.as_bytes()[self.index(x, y, c)]
    }

    /// Write sample `c` of pixel `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, c: u32, value: u8) {
        let idx = self.index(x, y, c);
        self.as_bytes_mut()[idx] = value;
    }

    /// All samples of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.index(x, y, 0);
        &self.as_bytes()[start..start + self.channels as usize]
    }

    /// Mutable samples of pixel `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let start = self.index(x, y, 0);
        let end = start + self.channels as usize;
        &mut self.as_bytes_mut()[start..end]
    }

    /// Samples of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels as usize;
        let start = y as usize * stride;
        &self.as_bytes()[start..start + stride]
    }

    /// The whole flat sample sequence.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Heap(data) => data.as_slice(),
            Storage::Arena { block, .. } => &block[..],
        }
    }

    /// The whole flat sample sequence, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Heap(data) => data.as_mut_slice(),
            Storage::Arena { block, .. } => &mut block[..],
        }
    }

    /// Set every sample to `value`.
    pub fn fill(&mut self, value: u8) {
        self.as_bytes_mut().fill(value);
    }
}

impl fmt::Debug for PixelBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("arena", &self.is_arena_backed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        let buf = PixelBuffer::allocate(AllocStrategy::Heap, 4, 3, 3).unwrap();
        assert_eq!(buf.index(0, 0, 0), 0);
        assert_eq!(buf.index(1, 0, 2), 5);
        assert_eq!(buf.index(0, 1, 0), 12);
        assert_eq!(buf.index(3, 2, 2), 35);
        assert_eq!(buf.as_bytes().len(), 36);
    }

    #[test]
    fn test_invalid_channels() {
        assert!(matches!(
            PixelBuffer::allocate(AllocStrategy::Heap, 2, 2, 0),
            Err(Error::InvalidChannels(0))
        ));
        assert!(matches!(
            PixelBuffer::allocate(AllocStrategy::Heap, 2, 2, 5),
            Err(Error::InvalidChannels(5))
        ));
    }

    #[test]
    fn test_arena_backed_allocation() {
        let arena = Arena::new(64);
        let mut buf = PixelBuffer::allocate(AllocStrategy::Arena(&arena), 2, 2, 4).unwrap();
        assert!(buf.is_arena_backed());
        assert_eq!(arena.used(), 16);

        buf.set(1, 1, 3, 200);
        assert_eq!(buf.get(1, 1, 3), 200);
        assert_eq!(buf.pixel(1, 1)[3], 200);

        buf.release();
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn test_arena_too_small() {
        let arena = Arena::new(10);
        assert!(matches!(
            PixelBuffer::allocate(AllocStrategy::Arena(&arena), 2, 2, 3),
            Err(Error::ArenaExhausted {
                requested: 12,
                available: 10
            })
        ));
    }

    #[test]
    fn test_row_and_fill() {
        let mut buf = PixelBuffer::allocate(AllocStrategy::Heap, 3, 2, 1).unwrap();
        buf.fill(7);
        buf.pixel_mut(2, 1)[0] = 9;
        assert_eq!(buf.row(0), &[7, 7, 7]);
        assert_eq!(buf.row(1), &[7, 7, 9]);
    }
}
