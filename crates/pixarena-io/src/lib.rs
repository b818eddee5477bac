//! pixarena-io - Image file codec for pixarena
//!
//! Decodes image files into the flat 8-bit layout used by
//! [`pixarena_core::Image`] and encodes them back.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG    | 1-4 channels | 1-4 channels | `png-format` |
//! | JPEG   | gray, RGB | gray, RGB, RGBA (alpha dropped) | `jpeg` |
//! | PNM    | P5, P6 | P5, P6 | `pnm` |
//!
//! All three are enabled by default.
//!
//! # Example
//!
//! ```no_run
//! use pixarena_core::Image;
//! use pixarena_io::FileCodec;
//!
//! let codec = FileCodec::new();
//! let mut image = Image::new("input.png");
//! image.load(&codec).unwrap();
//! image.invert();
//! image.save(&codec, "output.png").unwrap();
//! ```

mod codec;
mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use codec::{
    CodecOptions, DEFAULT_JPEG_QUALITY, FileCodec, read_image, read_image_from_bytes, write_image,
    write_image_to,
};
pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
