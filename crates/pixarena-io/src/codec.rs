//! File-level read/write dispatch
//!
//! Reading sniffs the format from the file's magic bytes; writing picks it
//! from the caller (usually [`ImageFormat::from_path`]).

use crate::format::{ImageFormat, detect_format_from_bytes};
use crate::{IoError, IoResult};
use pixarena_core::{Codec, DecodedImage, RawImage};
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use tracing::debug;

/// Default JPEG encoder quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CodecOptions {
    /// Set the JPEG quality, clamped to 1-100.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Read an image file, detecting its format from the header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<DecodedImage> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let image = read_image_from_bytes(&bytes)?;
    debug!(
        path = %path.display(),
        width = image.width,
        height = image.height,
        channels = image.channels,
        "decoded image file"
    );
    Ok(image)
}

/// Decode an in-memory image file.
pub fn read_image_from_bytes(bytes: &[u8]) -> IoResult<DecodedImage> {
    let format = detect_format_from_bytes(bytes)?;
    let cursor = Cursor::new(bytes);
    let image = match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => crate::png::read_png(cursor)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => crate::jpeg::read_jpeg(cursor)?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => crate::pnm::read_pnm(cursor)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                other
            )));
        }
    };
    check_geometry(&image)?;
    Ok(image)
}

/// Write an image file in `format`, creating parent directories as needed.
pub fn write_image<P: AsRef<Path>>(
    path: P,
    image: RawImage<'_>,
    format: ImageFormat,
    options: &CodecOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_to(&mut writer, image, format, options)?;
    writer.flush()?;
    debug!(path = %path.display(), ?format, "encoded image file");
    Ok(())
}

/// Encode an image in `format` into any writer.
pub fn write_image_to<W: Write>(
    writer: W,
    image: RawImage<'_>,
    format: ImageFormat,
    options: &CodecOptions,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => crate::png::write_png(image, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => crate::jpeg::write_jpeg(image, writer, options.jpeg_quality),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => crate::pnm::write_pnm(image, writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

fn check_geometry(image: &DecodedImage) -> IoResult<()> {
    let expected = pixarena_core::buffer_len(image.width, image.height, image.channels)?;
    if image.data.len() != expected {
        return Err(IoError::InvalidData(format!(
            "decoder produced {} samples, expected {}",
            image.data.len(),
            expected
        )));
    }
    Ok(())
}

/// [`Codec`] backed by real files.
///
/// The output format follows the destination's extension; paths without a
/// recognised extension are written as PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec {
    options: CodecOptions,
}

impl FileCodec {
    /// Create a file codec with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file codec with explicit encoder options.
    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Encoder options in use.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }
}

impl Codec for FileCodec {
    fn decode(&self, path: &Path) -> pixarena_core::Result<DecodedImage> {
        Ok(read_image(path)?)
    }

    fn encode(&self, path: &Path, image: RawImage<'_>) -> pixarena_core::Result<()> {
        let format = ImageFormat::from_path(path).unwrap_or_default();
        Ok(write_image(path, image, format, &self.options)?)
    }
}
