//! Four-tap bilinear sampling shared by scaling and rotation

use pixarena_core::PixelBuffer;

/// The four source pixels and weights for one destination pixel.
///
/// `(x1, y1)` is the top-left tap and `(x2, y2)` the bottom-right one; the
/// caller decides how `x2`/`y2` are clamped at the image edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Taps {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub dx: f32,
    pub dy: f32,
}

impl Taps {
    /// Bilinear blend of channel `c`, unrounded.
    #[inline]
    pub fn blend(&self, src: &PixelBuffer<'_>, c: u32) -> f32 {
        let p11 = f32::from(src.get(self.x1, self.y1, c));
        let p21 = f32::from(src.get(self.x2, self.y1, c));
        let p12 = f32::from(src.get(self.x1, self.y2, c));
        let p22 = f32::from(src.get(self.x2, self.y2, c));
        let (dx, dy) = (self.dx, self.dy);

        p11 * (1.0 - dx) * (1.0 - dy)
            + p21 * dx * (1.0 - dy)
            + p12 * (1.0 - dx) * dy
            + p22 * dx * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixarena_core::AllocStrategy;

    fn square() -> PixelBuffer<'static> {
        let mut buf = PixelBuffer::allocate(AllocStrategy::Heap, 2, 2, 1).unwrap();
        buf.as_bytes_mut().copy_from_slice(&[10, 40, 70, 100]);
        buf
    }

    fn taps(dx: f32, dy: f32) -> Taps {
        Taps {
            x1: 0,
            y1: 0,
            x2: 1,
            y2: 1,
            dx,
            dy,
        }
    }

    #[test]
    fn test_blend_corners_are_exact() {
        let src = square();
        assert_eq!(taps(0.0, 0.0).blend(&src, 0), 10.0);
        assert_eq!(taps(1.0, 0.0).blend(&src, 0), 40.0);
        assert_eq!(taps(0.0, 1.0).blend(&src, 0), 70.0);
        assert_eq!(taps(1.0, 1.0).blend(&src, 0), 100.0);
    }

    #[test]
    fn test_blend_center_is_average() {
        let src = square();
        assert_eq!(taps(0.5, 0.5).blend(&src, 0), 55.0);
        assert_eq!(taps(0.5, 0.0).blend(&src, 0), 25.0);
    }
}
