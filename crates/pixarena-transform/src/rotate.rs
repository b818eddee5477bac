//! Arbitrary-angle bilinear rotation
//!
//! The canvas grows to the axis-aligned bounding box of the rotated image:
//!
//! ```text
//! new_width  = ceil(w·|cos θ| + h·|sin θ|)
//! new_height = ceil(w·|sin θ| + h·|cos θ|)
//! ```
//!
//! Each destination pixel is taken relative to the new canvas centre,
//! rotated back by `-θ` about the source centre, and blended from its four
//! source neighbours when the mapped point lies inside
//! `[0, w-1) x [0, h-1)`. Everything else keeps the fill value. Unlike
//! scaling, rotated samples are rounded to the nearest value.
//!
//! Angles are in degrees and reduced modulo 360. With the y axis pointing
//! down, a positive angle turns the image clockwise on screen.

use crate::interpolate::Taps;
use crate::{TransformError, TransformResult};
use pixarena_core::{Error, Image, PixelBuffer};
use tracing::debug;

/// Trig terms smaller than this are treated as exactly zero.
const TRIG_EPSILON: f64 = 1e-12;

/// Geometry of one rotation: source and destination sizes plus the
/// inverse mapping between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationGeometry {
    /// Source width
    pub src_width: u32,
    /// Source height
    pub src_height: u32,
    /// Bounding-box width
    pub width: u32,
    /// Bounding-box height
    pub height: u32,
    cos: f64,
    sin: f64,
}

impl RotationGeometry {
    /// Compute the geometry for rotating a `src_width x src_height` image by
    /// `angle` degrees.
    ///
    /// # Errors
    ///
    /// [`TransformError::InvalidParameters`] when `angle` is not finite.
    pub fn new(src_width: u32, src_height: u32, angle: f64) -> TransformResult<Self> {
        if !angle.is_finite() {
            return Err(TransformError::InvalidParameters(format!(
                "rotation angle must be finite, got {}",
                angle
            )));
        }
        let theta = angle.rem_euclid(360.0).to_radians();
        let cos = snap(theta.cos());
        let sin = snap(theta.sin());

        let (w, h) = (f64::from(src_width), f64::from(src_height));
        let width = (w * cos.abs() + h * sin.abs()).ceil() as u32;
        let height = (w * sin.abs() + h * cos.abs()).ceil() as u32;

        Ok(Self {
            src_width,
            src_height,
            width,
            height,
            cos,
            sin,
        })
    }

    /// Source coordinates that destination pixel `(x, y)` maps back to.
    pub fn source_coordinates(&self, x: u32, y: u32) -> (f64, f64) {
        let dx = f64::from(x) - f64::from(self.width) / 2.0;
        let dy = f64::from(y) - f64::from(self.height) / 2.0;
        let cx = f64::from(self.src_width) / 2.0;
        let cy = f64::from(self.src_height) / 2.0;
        (
            self.cos * dx + self.sin * dy + cx,
            -self.sin * dx + self.cos * dy + cy,
        )
    }

    /// True when a mapped source point has all four bilinear neighbours
    /// inside the source image.
    pub fn in_source(&self, sx: f64, sy: f64) -> bool {
        sx >= 0.0
            && sx < f64::from(self.src_width) - 1.0
            && sy >= 0.0
            && sy < f64::from(self.src_height) - 1.0
    }
}

fn snap(v: f64) -> f64 {
    if v.abs() < TRIG_EPSILON { 0.0 } else { v }
}

/// Bounding-box dimensions of a `width x height` image rotated by `angle`
/// degrees.
pub fn rotated_dimensions(width: u32, height: u32, angle: f64) -> TransformResult<(u32, u32)> {
    let g = RotationGeometry::new(width, height, angle)?;
    Ok((g.width, g.height))
}

/// Rotate an image in place by `angle` degrees.
///
/// Destination pixels with no source pixel under the inverse mapping are
/// set to `fill` in every channel.
///
/// # Errors
///
/// * [`TransformError::InvalidParameters`] for a non-finite angle
/// * [`Error::NotLoaded`] (wrapped) for an empty image
/// * [`Error::ArenaExhausted`] (wrapped) when the arena cannot hold the
///   result; the image is left unchanged
pub fn rotate(image: &mut Image<'_>, angle: f64, fill: u8) -> TransformResult<()> {
    let src = image.pixels().ok_or(Error::NotLoaded)?;
    let geometry = RotationGeometry::new(src.width(), src.height(), angle)?;

    let mut dst = image.allocate_buffer(geometry.width, geometry.height, src.channels())?;
    dst.fill(fill);
    rotate_into(src, &mut dst, &geometry);
    image.replace_pixels(dst);

    debug!(
        angle,
        fill,
        from_width = geometry.src_width,
        from_height = geometry.src_height,
        to_width = geometry.width,
        to_height = geometry.height,
        "rotated image"
    );
    Ok(())
}

fn rotate_into(src: &PixelBuffer<'_>, dst: &mut PixelBuffer<'_>, geometry: &RotationGeometry) {
    let channels = src.channels();

    for y in 0..geometry.height {
        for x in 0..geometry.width {
            let (sx, sy) = geometry.source_coordinates(x, y);
            if !geometry.in_source(sx, sy) {
                continue;
            }

            let (fx, fy) = (sx.floor(), sy.floor());
            let x1 = fx as u32;
            let y1 = fy as u32;
            let taps = Taps {
                x1,
                y1,
                x2: x1 + 1,
                y2: y1 + 1,
                dx: (sx - fx) as f32,
                dy: (sy - fy) as f32,
            };

            let out = dst.pixel_mut(x, y);
            for c in 0..channels {
                out[c as usize] = taps.blend(src, c).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
