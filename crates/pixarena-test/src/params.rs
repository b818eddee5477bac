//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use pixarena_core::{Image, RawImage};
use pixarena_io::{CodecOptions, ImageFormat};
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results with expectations (default)
    #[default]
    Compare,
    /// Display mode - write outputs but skip comparisons
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index, the mode and every
/// failure seen so far. Comparisons never panic; call [`RegParams::cleanup`]
/// at the end of the test and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "scale")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if self.display() {
            return true;
        }
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two byte sequences for exact equality
    pub fn compare_bytes(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.index += 1;
        if self.display() {
            return true;
        }

        if expected != actual {
            let first = expected
                .iter()
                .zip(actual)
                .position(|(a, b)| a != b)
                .unwrap_or(expected.len().min(actual.len()));
            let msg = format!(
                "Failure in {}_reg: byte comparison for index {}\n\
                 sizes: {} vs {}, first difference at {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len(),
                first
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two images for exact equality (geometry and samples)
    pub fn compare_images(&mut self, expected: &Image<'_>, actual: &Image<'_>) -> bool {
        self.compare_images_within(expected, actual, 0)
    }

    /// Compare two images, allowing each sample to differ by `tolerance`
    pub fn compare_images_within(
        &mut self,
        expected: &Image<'_>,
        actual: &Image<'_>,
        tolerance: u8,
    ) -> bool {
        self.index += 1;
        if self.display() {
            return true;
        }

        if expected.info() != actual.info() {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - geometry mismatch\n\
                 expected {}, actual {}",
                self.test_name,
                self.index,
                expected.info(),
                actual.info()
            );
            return self.fail(msg);
        }

        let (Some(p1), Some(p2)) = (expected.pixels(), actual.pixels()) else {
            return true;
        };

        let mismatch = p1
            .as_bytes()
            .iter()
            .zip(p2.as_bytes())
            .position(|(a, b)| a.abs_diff(*b) > tolerance);

        if let Some(pos) = mismatch {
            let channels = p1.channels() as usize;
            let width = p1.width() as usize;
            let pixel = pos / channels;
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - sample mismatch at \
                 ({}, {}) channel {}: {} vs {} (tolerance {})",
                self.test_name,
                self.index,
                pixel % width,
                pixel / width,
                pos % channels,
                p1.as_bytes()[pos],
                p2.as_bytes()[pos],
                tolerance
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Write an image to the regout directory and read it back
    ///
    /// For lossless formats the re-read samples must match the image
    /// exactly; for lossy formats only the geometry is checked. In display
    /// mode the file is written and nothing is compared.
    ///
    /// # Returns
    ///
    /// The path the image was written to.
    pub fn write_image_and_check(
        &mut self,
        image: &Image<'_>,
        format: ImageFormat,
    ) -> TestResult<String> {
        self.index += 1;

        let pixels = image.pixels().ok_or(TestError::NotLoaded)?;
        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );

        pixarena_io::write_image(
            &local_path,
            RawImage {
                width: pixels.width(),
                height: pixels.height(),
                channels: pixels.channels(),
                data: pixels.as_bytes(),
            },
            format,
            &CodecOptions::default(),
        )
        .map_err(|e| TestError::ImageWrite {
            path: local_path.clone(),
            message: e.to_string(),
        })?;

        if self.display() {
            return Ok(local_path);
        }

        let decoded = pixarena_io::read_image(&local_path).map_err(|e| TestError::ImageLoad {
            path: local_path.clone(),
            message: e.to_string(),
        })?;

        if (decoded.width, decoded.height) != (pixels.width(), pixels.height()) {
            let msg = format!(
                "Failure in {}_reg: {} read back as {}x{}, wrote {}x{}",
                self.test_name,
                local_path,
                decoded.width,
                decoded.height,
                pixels.width(),
                pixels.height()
            );
            self.fail(msg);
        } else if format.is_lossless()
            && (decoded.channels != pixels.channels() || decoded.data != pixels.as_bytes())
        {
            let msg = format!(
                "Failure in {}_reg: {} does not read back identically",
                self.test_name, local_path
            );
            self.fail(msg);
        }

        Ok(local_path)
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixarena_core::AllocStrategy;

    fn params() -> RegParams {
        let mut rp = RegParams::new("params_selftest");
        rp.mode = RegTestMode::Compare;
        rp
    }

    #[test]
    fn test_compare_values() {
        let mut rp = params();
        assert!(rp.compare_values(1.0, 1.05, 0.1));
        assert!(!rp.compare_values(1.0, 2.0, 0.1));
        assert_eq!(rp.index(), 2);
        assert_eq!(rp.failures().len(), 1);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_images_tolerance() {
        let mut rp = params();
        let a = Image::from_samples(AllocStrategy::Heap, 2, 1, 1, &[10, 20]).unwrap();
        let b = Image::from_samples(AllocStrategy::Heap, 2, 1, 1, &[11, 20]).unwrap();
        assert!(!rp.compare_images(&a, &b));
        assert!(rp.compare_images_within(&a, &b, 1));
        assert!(rp.failures()[0].contains("(0, 0) channel 0"));
    }

    #[test]
    fn test_compare_images_geometry() {
        let mut rp = params();
        let a = Image::from_samples(AllocStrategy::Heap, 2, 1, 1, &[10, 20]).unwrap();
        let b = Image::from_samples(AllocStrategy::Heap, 1, 2, 1, &[10, 20]).unwrap();
        assert!(!rp.compare_images(&a, &b));
        assert!(rp.failures()[0].contains("geometry mismatch"));
    }
}
