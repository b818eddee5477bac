//! Rotate regression test
//!
//! Checks bounding-box growth, fill coverage and identity rotations, and
//! that arena-backed and heap-backed images rotate identically.

use pixarena_core::{AllocStrategy, Arena, Image};
use pixarena_io::ImageFormat;
use pixarena_test::{RegParams, gradient, uniform};
use pixarena_transform::{RotationGeometry, rotate, rotated_dimensions};

#[test]
fn rotate_reg_bounding_boxes() {
    let mut rp = RegParams::new("rotate_bbox");

    let cases: [(f64, u32, u32); 6] = [
        (0.0, 40, 30),
        (90.0, 30, 40),
        (180.0, 40, 30),
        (-90.0, 30, 40),
        (30.0, 50, 46),
        (45.0, 50, 50),
    ];
    for (angle, w, h) in cases {
        let (nw, nh) = rotated_dimensions(40, 30, angle).unwrap();
        rp.compare_values(w as f64, nw as f64, 0.0);
        rp.compare_values(h as f64, nh as f64, 0.0);
    }

    assert!(rp.cleanup());
}

#[test]
fn rotate_reg_fill_coverage() {
    let mut rp = RegParams::new("rotate_fill");

    // A uniform image rotated with a distinct fill: every pixel is either
    // the image value (inside) or the fill (outside), never a mix.
    let src = uniform(20, 12, 3, 90);
    let mut image = Image::from_samples(AllocStrategy::Heap, 20, 12, 3, &src.data).unwrap();
    rotate(&mut image, 33.0, 250).unwrap();

    let geometry = RotationGeometry::new(20, 12, 33.0).unwrap();
    let px = image.pixels().unwrap();
    let mut inside = 0usize;
    let mut outside = 0usize;
    for y in 0..px.height() {
        for x in 0..px.width() {
            let (sx, sy) = geometry.source_coordinates(x, y);
            if geometry.in_source(sx, sy) {
                inside += 1;
                rp.compare_bytes(&[90, 90, 90], px.pixel(x, y));
            } else {
                outside += 1;
                rp.compare_bytes(&[250, 250, 250], px.pixel(x, y));
            }
        }
    }
    rp.compare_values(1.0, (inside > 0 && outside > 0) as u8 as f64, 0.0);
    rp.write_image_and_check(&image, ImageFormat::Png).unwrap();

    assert!(rp.cleanup());
}

#[test]
fn rotate_reg_identity_angles() {
    let mut rp = RegParams::new("rotate_identity");
    let src = gradient(16, 9, 3);
    let original = Image::from_samples(AllocStrategy::Heap, 16, 9, 3, &src.data).unwrap();

    for angle in [0.0, 360.0, -360.0, 720.0] {
        let mut image = Image::from_samples(AllocStrategy::Heap, 16, 9, 3, &src.data).unwrap();
        rotate(&mut image, angle, 0).unwrap();
        rp.compare_values(16.0, image.width() as f64, 0.0);
        rp.compare_values(9.0, image.height() as f64, 0.0);

        // Interior pixels map onto themselves; the last row and column
        // fall outside [0, w-1) x [0, h-1) and take the fill.
        let (a, b) = (original.pixels().unwrap(), image.pixels().unwrap());
        for y in 0..8 {
            rp.compare_bytes(&a.row(y)[..15 * 3], &b.row(y)[..15 * 3]);
        }
        rp.compare_bytes(&[0u8; 16 * 3], b.row(8));
    }

    assert!(rp.cleanup());
}

#[test]
fn rotate_reg_arena_matches_heap() {
    let mut rp = RegParams::new("rotate_strategies");
    let arena = Arena::new(1 << 20);
    let src = gradient(21, 14, 4);

    for angle in [15.0, 90.0, 137.5, 200.0, -45.0] {
        let mut heap = Image::from_samples(AllocStrategy::Heap, 21, 14, 4, &src.data).unwrap();
        let mut backed =
            Image::from_samples(AllocStrategy::Arena(&arena), 21, 14, 4, &src.data).unwrap();
        rotate(&mut heap, angle, 17).unwrap();
        rotate(&mut backed, angle, 17).unwrap();
        rp.compare_images(&heap, &backed);
    }

    assert!(rp.cleanup());
}
