//! pixarena-test - Regression test framework for pixarena
//!
//! Provides [`RegParams`], which records numbered comparisons and reports
//! all failures at the end of a test, an in-memory [`MemoryCodec`], and a
//! few synthetic images.
//!
//! # Usage
//!
//! ```ignore
//! use pixarena_test::RegParams;
//!
//! let mut rp = RegParams::new("scale");
//! rp.compare_values(4.0, image.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod memory;
mod params;

pub use error::{TestError, TestResult};
pub use memory::MemoryCodec;
pub use params::{RegParams, RegTestMode};

use pixarena_core::DecodedImage;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // pixarena-test is at crates/pixarena-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// The 2x2 RGB image used throughout the examples:
///
/// ```text
/// (10,20,30)    (40,50,60)
/// (70,80,90)    (100,110,120)
/// ```
pub fn two_by_two_rgb() -> DecodedImage {
    DecodedImage {
        width: 2,
        height: 2,
        channels: 3,
        data: vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
    }
}

/// A smooth gradient with distinct per-channel ramps.
pub fn gradient(width: u32, height: u32, channels: u32) -> DecodedImage {
    let mut data = Vec::with_capacity((width * height * channels) as usize);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let v = (x * 255 / width.saturating_sub(1).max(1) + y * 3 + c * 40) % 256;
                data.push(v as u8);
            }
        }
    }
    DecodedImage {
        width,
        height,
        channels,
        data,
    }
}

/// An image where every sample equals `value`.
pub fn uniform(width: u32, height: u32, channels: u32, value: u8) -> DecodedImage {
    DecodedImage {
        width,
        height,
        channels,
        data: vec![value; (width * height * channels) as usize],
    }
}
