//! Codec collaborator boundary
//!
//! Decoding and encoding image files is delegated to an implementation of
//! [`Codec`]. Both directions use the same flat layout: row-major,
//! pixel-major, channel-minor, one byte per sample.

use crate::error::Result;
use std::path::Path;

/// Flat pixel data produced by a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// `width * height * channels` interleaved samples
    pub data: Vec<u8>,
}

/// Borrowed flat pixel data handed to an encoder.
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub data: &'a [u8],
}

/// Turns files into flat sample sequences and back.
pub trait Codec {
    /// Decode the file at `path`.
    fn decode(&self, path: &Path) -> Result<DecodedImage>;

    /// Encode `image` into a file at `path`.
    fn encode(&self, path: &Path, image: RawImage<'_>) -> Result<()>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        (**self).decode(path)
    }

    fn encode(&self, path: &Path, image: RawImage<'_>) -> Result<()> {
        (**self).encode(path, image)
    }
}
