//! pixarena-core - Memory model for pixarena
//!
//! This crate provides the data structures every pixarena operation works
//! on:
//!
//! - [`Arena`] - Fixed-capacity linear (bump) allocator
//! - [`Image`] - Source path plus an optional [`PixelBuffer`], bound to an
//!   [`AllocStrategy`]
//! - [`PixelBuffer`] - Flat interleaved 8-bit samples with their geometry
//! - [`Codec`] - Boundary to the file decoder/encoder collaborator
//!
//! # Example
//!
//! ```
//! use pixarena_core::{AllocStrategy, Arena, Image};
//!
//! let arena = Arena::new(1024);
//! let mut image =
//!     Image::from_samples(AllocStrategy::Arena(&arena), 2, 1, 1, &[0, 200]).unwrap();
//! image.invert();
//! assert_eq!(image.pixels().unwrap().as_bytes(), &[255, 55]);
//! assert_eq!(arena.used(), 2);
//! ```

pub mod arena;
pub mod codec;
pub mod error;
pub mod image;

pub use arena::{Arena, ArenaBlock, DEFAULT_ARENA_CAPACITY};
pub use codec::{Codec, DecodedImage, RawImage};
pub use error::{Error, Result};
pub use image::{AllocStrategy, Image, ImageInfo, MAX_CHANNELS, PixelBuffer, buffer_len};
