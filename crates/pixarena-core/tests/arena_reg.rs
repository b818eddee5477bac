//! Arena regression test
//!
//! Exercises the arena through whole image lifecycles: load, repeated
//! buffer replacement and exhaustion part way through.

use pixarena_core::{AllocStrategy, Arena, Error, Image, PixelBuffer};
use pixarena_test::{MemoryCodec, RegParams, two_by_two_rgb, uniform};

#[test]
fn arena_reg_cursor_accounting() {
    let mut rp = RegParams::new("arena_cursor");
    let arena = Arena::new(100);

    let sizes = [10usize, 25, 0, 40, 25];
    let mut offsets = Vec::new();
    for size in &sizes[..4] {
        let block = arena.allocate(*size).unwrap();
        offsets.push(block.offset() as f64);
    }
    rp.compare_values(0.0, offsets[0], 0.0);
    rp.compare_values(10.0, offsets[1], 0.0);
    rp.compare_values(35.0, offsets[2], 0.0);
    rp.compare_values(35.0, offsets[3], 0.0);
    rp.compare_values(75.0, arena.used() as f64, 0.0);

    // 75 + 25 == 100 fits exactly; one more byte does not
    let last = arena.allocate(sizes[4]);
    rp.compare_values(1.0, last.is_ok() as u8 as f64, 0.0);
    rp.compare_values(0.0, arena.remaining() as f64, 0.0);
    rp.compare_values(1.0, arena.allocate(1).is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn arena_reg_buffers_do_not_alias() {
    let mut rp = RegParams::new("arena_alias");
    let arena = Arena::new(1024);

    let mut a = PixelBuffer::allocate(AllocStrategy::Arena(&arena), 4, 4, 3).unwrap();
    let mut b = PixelBuffer::allocate(AllocStrategy::Arena(&arena), 4, 4, 3).unwrap();
    a.fill(1);
    b.fill(2);
    a.set(3, 3, 2, 9);

    rp.compare_bytes(&[2u8; 48], b.as_bytes());
    rp.compare_values(9.0, a.get(3, 3, 2) as f64, 0.0);
    rp.compare_values(96.0, arena.used() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn arena_reg_load_save_cycle() {
    let mut rp = RegParams::new("arena_load_save");
    let arena = Arena::new(4096);
    let codec = MemoryCodec::new();
    codec.insert("a.png", two_by_two_rgb());
    codec.insert("b.png", uniform(8, 8, 4, 77));

    let mut first = Image::with_arena("a.png", &arena);
    let mut second = Image::with_arena("b.png", &arena);
    first.load(&codec).unwrap();
    second.load(&codec).unwrap();
    rp.compare_values((12 + 256) as f64, arena.used() as f64, 0.0);

    first.invert();
    second.invert();
    first.save(&codec, "a_out.png").unwrap();
    second.save(&codec, "b_out.png").unwrap();

    rp.compare_bytes(
        &[245, 235, 225, 215, 205, 195, 185, 175, 165, 155, 145, 135],
        &codec.get("a_out.png").unwrap().data,
    );
    rp.compare_bytes(&[178u8; 256], &codec.get("b_out.png").unwrap().data);
    // Invert works in place
    rp.compare_values(2.0, arena.allocation_count() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn arena_reg_reload_keeps_old_block_reserved() {
    let arena = Arena::new(30);
    let codec = MemoryCodec::new();
    codec.insert("in.png", two_by_two_rgb());

    let mut image = Image::with_arena("in.png", &arena);
    image.load(&codec).unwrap();
    image.load(&codec).unwrap();
    assert_eq!(arena.used(), 24);

    // Third load needs 12 more bytes but only 6 remain
    assert!(matches!(
        image.load(&codec),
        Err(Error::ArenaExhausted {
            requested: 12,
            available: 6
        })
    ));
    assert_eq!(image.info().width, 2);
    assert!(image.pixels().unwrap().is_arena_backed());
}
