//! Color inversion

use super::Image;

impl Image<'_> {
    /// Replace every sample `v` with `255 - v`, in place.
    ///
    /// All channels are inverted, alpha included. Does nothing on an
    /// empty image; no allocation takes place.
    pub fn invert(&mut self) {
        if let Some(pixels) = self.pixels_mut() {
            for v in pixels.as_bytes_mut() {
                *v = 255 - *v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{AllocStrategy, Image};
    use proptest::prelude::*;

    #[test]
    fn test_invert_two_by_two() {
        let samples = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
        let mut image = Image::from_samples(AllocStrategy::Heap, 2, 2, 3, &samples).unwrap();
        image.invert();
        assert_eq!(
            image.pixels().unwrap().as_bytes(),
            &[245, 235, 225, 215, 205, 195, 185, 175, 165, 155, 145, 135]
        );
    }

    #[test]
    fn test_invert_extremes() {
        let mut image = Image::from_samples(AllocStrategy::Heap, 2, 1, 1, &[0, 255]).unwrap();
        image.invert();
        assert_eq!(image.pixels().unwrap().as_bytes(), &[255, 0]);
    }

    #[test]
    fn test_invert_empty_is_noop() {
        let mut image = Image::new("nothing.png");
        image.invert();
        assert!(!image.is_loaded());
    }

    fn image_and_samples() -> impl Strategy<Value = (u32, u32, u32, Vec<u8>)> {
        (1u32..8, 1u32..8, 1u32..=4).prop_flat_map(|(width, height, channels)| {
            let len = (width * height * channels) as usize;
            (
                Just(width),
                Just(height),
                Just(channels),
                proptest::collection::vec(any::<u8>(), len),
            )
        })
    }

    proptest! {
        #[test]
        fn invert_is_self_inverse((width, height, channels, samples) in image_and_samples()) {
            let mut image =
                Image::from_samples(AllocStrategy::Heap, width, height, channels, &samples)
                    .unwrap();
            image.invert();
            image.invert();
            prop_assert_eq!(image.pixels().unwrap().as_bytes(), samples.as_slice());
        }
    }
}
