//! Error types for pixarena-core
//!
//! Provides a unified error type for arena allocation, pixel buffer
//! management and the codec collaborator boundary. Each variant captures
//! enough context for diagnostics without exposing internal details.

use thiserror::Error;

/// pixarena error type
#[derive(Error, Debug)]
pub enum Error {
    /// The arena cannot satisfy an allocation request
    #[error("arena out of memory: {requested} bytes requested, {available} bytes available")]
    ArenaExhausted { requested: usize, available: usize },

    /// Invalid image dimensions (zero-sized or overflowing the address space)
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Unsupported channel count
    #[error("invalid channel count: {0} (expected 1..=4)")]
    InvalidChannels(u32),

    /// Sample data does not match the declared geometry
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Operation requires a loaded image
    #[error("image has not been loaded")]
    NotLoaded,

    /// The codec collaborator failed to decode or encode
    #[error("codec error: {0}")]
    Codec(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pixarena core operations
pub type Result<T> = std::result::Result<T, Error>;
