//! pixarena-transform - Geometric transformations for pixarena
//!
//! This crate provides the resampling operations on [`pixarena_core::Image`]:
//!
//! - Uniform scaling with bilinear interpolation and edge clamping
//! - Arbitrary-angle rotation with bilinear interpolation, bounding-box
//!   growth and a fill value for uncovered pixels
//!
//! Both replace the image's pixel buffer with one allocated from the same
//! strategy (heap or arena) the image was created with.

mod error;
mod interpolate;
pub mod rotate;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use rotate::{RotationGeometry, rotate, rotated_dimensions};
pub use scale::{scale, scaled_dimensions, validate_scale_factor};
