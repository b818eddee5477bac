//! pixarena - Image transforms over a linear arena allocator or the heap
//!
//! Decodes an image, applies one pixel-level transform (inversion,
//! bilinear scaling or bilinear rotation) and encodes the result, with all
//! pixel buffers drawn either from a single pre-reserved [`Arena`] or from
//! the heap.
//!
//! # Example
//!
//! ```
//! use pixarena::{AllocStrategy, Arena, Image};
//! use pixarena::transform::scale;
//!
//! let arena = Arena::new(4096);
//! let samples = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
//! let mut image = Image::from_samples(AllocStrategy::Arena(&arena), 2, 2, 3, &samples).unwrap();
//!
//! scale(&mut image, 2.0).unwrap();
//! assert_eq!(image.info().to_string(), "4 x 4, 3 channels");
//! assert_eq!(image.pixels().unwrap().pixel(1, 1), &[55, 65, 75]);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixarena_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixarena_io as io;
pub use pixarena_transform as transform;

pub mod pipeline;

pub use pipeline::{
    AllocMode, ArenaUsage, Operation, RunConfig, RunError, RunReport, run, run_with_codec,
};
