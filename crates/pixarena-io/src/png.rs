//! PNG image format support
//!
//! Every PNG is normalised to 8-bit samples on read: palettes are expanded
//! to RGB(A), sub-byte grayscale is widened and 16-bit samples are
//! stripped to their high byte. The channel count (1-4) is preserved, so an
//! 8-bit PNG written by [`write_png`] reads back byte-for-byte.

use crate::{IoError, IoResult};
use pixarena_core::{DecodedImage, RawImage};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<DecodedImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (color_type, _) = reader.output_color_type();
    let channels: usize = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG output color type: {:?}",
                other
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let row_len = width as usize * channels;
    let bytes_per_row = output_info.line_size;
    let frame = &buf[..output_info.buffer_size()];

    // Copy row by row: the decoder's line size may exceed the packed width.
    let mut data = Vec::with_capacity(row_len * height as usize);
    for y in 0..height as usize {
        let row_start = y * bytes_per_row;
        data.extend_from_slice(&frame[row_start..row_start + row_len]);
    }

    Ok(DecodedImage {
        width,
        height,
        channels: channels as u32,
        data,
    })
}

/// Write a PNG image
///
/// Channels map to grayscale, grayscale+alpha, RGB and RGBA respectively;
/// samples are always 8-bit.
pub fn write_png<W: Write>(image: RawImage<'_>, writer: W) -> IoResult<()> {
    let color_type = match image.channels {
        1 => ColorType::Grayscale,
        2 => ColorType::GrayscaleAlpha,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        n => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNG cannot store {} channels",
                n
            )));
        }
    };

    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(image.data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
