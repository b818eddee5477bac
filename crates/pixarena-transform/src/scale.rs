//! Uniform bilinear scaling
//!
//! Every destination pixel `(nx, ny)` is mapped back to the source point
//! `(nx / factor, ny / factor)` and blended from its four neighbours. The
//! bottom and right neighbours are clamped to the last row and column, so
//! edge pixels are reproduced rather than extrapolated. Samples are
//! truncated, not rounded.
//!
//! The image is always resampled, even at `factor == 1.0`. A factor small
//! enough to truncate a dimension to zero yields an image with no pixels.

use crate::interpolate::Taps;
use crate::{TransformError, TransformResult};
use pixarena_core::{Error, Image, PixelBuffer};
use tracing::debug;

/// Check that `factor` is a usable scale factor.
pub fn validate_scale_factor(factor: f32) -> TransformResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TransformError::InvalidScaleFactor(format!(
            "scale factor must be a positive finite number, got {}",
            factor
        )));
    }
    Ok(())
}

/// Output dimensions of scaling a `width x height` image by `factor`.
///
/// Both dimensions are truncated: `floor(width * factor)`.
pub fn scaled_dimensions(width: u32, height: u32, factor: f32) -> (u32, u32) {
    (
        (width as f32 * factor).floor() as u32,
        (height as f32 * factor).floor() as u32,
    )
}

/// Scale an image in place by `factor` using bilinear interpolation.
///
/// The new buffer is allocated with the image's own strategy and fully
/// computed before it replaces the old one.
///
/// # Errors
///
/// * [`TransformError::InvalidScaleFactor`] for a non-positive or
///   non-finite factor
/// * [`Error::NotLoaded`] (wrapped) for an empty image
/// * [`Error::ArenaExhausted`] (wrapped) when the arena cannot hold the
///   result; the image is left unchanged
pub fn scale(image: &mut Image<'_>, factor: f32) -> TransformResult<()> {
    validate_scale_factor(factor)?;
    let src = image.pixels().ok_or(Error::NotLoaded)?;
    let (width, height, channels) = (src.width(), src.height(), src.channels());

    let (new_width, new_height) = scaled_dimensions(width, height, factor);
    let mut dst = image.allocate_buffer(new_width, new_height, channels)?;
    scale_into(src, &mut dst, factor);
    image.replace_pixels(dst);

    debug!(
        factor,
        from_width = width,
        from_height = height,
        to_width = new_width,
        to_height = new_height,
        "scaled image"
    );
    Ok(())
}

fn scale_into(src: &PixelBuffer<'_>, dst: &mut PixelBuffer<'_>, factor: f32) {
    // A degenerate result has no pixels to sample for
    if dst.width() == 0 || dst.height() == 0 {
        return;
    }
    let last_x = src.width() - 1;
    let last_y = src.height() - 1;
    let channels = src.channels();

    for ny in 0..dst.height() {
        let orig_y = ny as f32 / factor;
        let fy = orig_y.floor();
        let y1 = (fy as u32).min(last_y);
        let y2 = (y1 + 1).min(last_y);
        let dy = orig_y - fy;

        for nx in 0..dst.width() {
            let orig_x = nx as f32 / factor;
            let fx = orig_x.floor();
            let x1 = (fx as u32).min(last_x);
            let x2 = (x1 + 1).min(last_x);
            let taps = Taps {
                x1,
                y1,
                x2,
                y2,
                dx: orig_x - fx,
                dy,
            };

            let out = dst.pixel_mut(nx, ny);
            for c in 0..channels {
                out[c as usize] = taps.blend(src, c) as u8;
            }
        }
    }
}
