//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Supports 8-bit grayscale (1 channel) and RGB
//! (3 channels); RGBA input is written without its alpha channel.
//!
//! JPEG is lossy: a save/load round-trip reproduces the geometry but only
//! approximates the samples.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use pixarena_core::{DecodedImage, RawImage};
use std::io::{Read, Write};

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// One channel for grayscale files, three for color files.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<DecodedImage> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let channels = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::RGB24 => 3,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    Ok(DecodedImage {
        width: info.width as u32,
        height: info.height as u32,
        channels,
        data,
    })
}

/// Write a JPEG image
///
/// # Arguments
/// * `image`   - Samples to encode (1, 3 or 4 channels)
/// * `writer`  - Destination writer
/// * `quality` - Encoder quality, 1-100
pub fn write_jpeg<W: Write>(image: RawImage<'_>, writer: W, quality: u8) -> IoResult<()> {
    let color_type = match image.channels {
        1 => ColorType::Luma,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        n => {
            return Err(IoError::UnsupportedFormat(format!(
                "JPEG cannot store {} channels",
                n
            )));
        }
    };
    let width = u16::try_from(image.width)
        .map_err(|_| IoError::EncodeError(format!("JPEG width too large: {}", image.width)))?;
    let height = u16::try_from(image.height)
        .map_err(|_| IoError::EncodeError(format!("JPEG height too large: {}", image.height)))?;

    Encoder::new(writer, quality.clamp(1, 100))
        .encode(image.data, width, height, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}
