//! PNM (Portable Any Map) format support
//!
//! Reads and writes PGM (P5 binary) and PPM (P6 binary). Maxval below 255
//! is rescaled to the full 8-bit range on read; 16-bit maxval is rejected.
//! ASCII variants (P1/P2/P3) and PBM are not supported.

use crate::{IoError, IoResult};
use pixarena_core::{DecodedImage, RawImage};
use std::io::{BufRead, Read, Write};

/// Read a PNM image (P5/P6) from a reader.
///
/// # Arguments
/// * `reader` - A buffered reader positioned at the `P5`/`P6` magic
///
/// # Returns
/// One channel for PGM, three for PPM.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<DecodedImage> {
    let magic = read_token(&mut reader)?;
    let channels = match magic.as_str() {
        "P5" => 1,
        "P6" => 3,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM variant: {}",
                other
            )));
        }
    };

    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid PNM dimensions: {}x{}",
            width, height
        )));
    }
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNM maxval: {}",
            maxval
        )));
    }

    let len = pixarena_core::buffer_len(width, height, channels)?;
    // Grow with the bytes actually present instead of trusting the header
    let mut data = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut data)
        .map_err(|e| IoError::DecodeError(format!("PNM raster read error: {}", e)))?;
    if data.len() != len {
        return Err(IoError::DecodeError(format!(
            "truncated PNM raster: expected {} bytes, got {}",
            len,
            data.len()
        )));
    }

    if maxval < 255 {
        for v in &mut data {
            let clamped = u32::from(*v).min(maxval);
            *v = ((clamped * 255 + maxval / 2) / maxval) as u8;
        }
    }

    Ok(DecodedImage {
        width,
        height,
        channels,
        data,
    })
}

/// Write binary PNM to a writer.
///
/// One channel is written as P5, three as P6; other channel counts are
/// rejected.
pub fn write_pnm<W: Write>(image: RawImage<'_>, mut writer: W) -> IoResult<()> {
    let magic = match image.channels {
        1 => "P5",
        3 => "P6",
        n => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM cannot store {} channels",
                n
            )));
        }
    };
    write!(writer, "{}\n{} {}\n255\n", magic, image.width, image.height)?;
    writer.write_all(image.data)?;
    writer.flush()?;
    Ok(())
}

/// Read one whitespace-separated header token, skipping `#` comments.
///
/// Consumes exactly one whitespace byte after the token so the raster
/// starts right after the maxval field.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        let b = byte[0];
        if b == b'#' && token.is_empty() {
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
            continue;
        }
        if b.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(b as char);
    }
    if token.is_empty() {
        return Err(IoError::InvalidData("truncated PNM header".to_string()));
    }
    Ok(token)
}

fn read_number<R: BufRead>(reader: &mut R, field: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("invalid PNM {}: {:?}", field, token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_pnm_roundtrip_rgb() {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
        let raw = RawImage {
            width: 4,
            height: 3,
            channels: 3,
            data: &data,
        };
        let mut buffer = Vec::new();
        write_pnm(raw, &mut buffer).unwrap();
        assert!(buffer.starts_with(b"P6\n4 3\n255\n"));

        let decoded = read_pnm(Cursor::new(buffer)).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (4, 3, 3));
        assert_eq!(decoded.data, data);
    }

    #[test]
    fn test_pnm_header_comments_and_raster_whitespace() {
        // Raster bytes that look like whitespace must not be skipped.
        let mut file = b"P5\n# created by hand\n2 # width then height\n1\n255\n".to_vec();
        file.extend_from_slice(&[b' ', b'\n']);
        let decoded = read_pnm(Cursor::new(file)).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.data, vec![b' ', b'\n']);
    }

    #[test]
    fn test_pnm_rescales_small_maxval() {
        let mut file = b"P5 3 1 15\n".to_vec();
        file.extend_from_slice(&[0, 15, 7]);
        let decoded = read_pnm(Cursor::new(file)).unwrap();
        assert_eq!(decoded.data, vec![0, 255, 119]);
    }

    #[test]
    fn test_pnm_rejects_ascii_and_16_bit() {
        assert!(matches!(
            read_pnm(Cursor::new(b"P2\n1 1\n255\n0\n".to_vec())),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            read_pnm(Cursor::new(b"P5\n1 1\n65535\n\0\0".to_vec())),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_pnm_truncated_raster() {
        let result = read_pnm(Cursor::new(b"P6\n2 2\n255\n\x01\x02".to_vec()));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }

    #[test]
    fn test_pnm_oversized_header_is_an_error() {
        // Dimensions whose sample count overflows
        let result = read_pnm(Cursor::new(
            b"P6\n4294967295 4294967295\n255\n\x00\x00".to_vec(),
        ));
        assert!(matches!(
            result,
            Err(IoError::Core(pixarena_core::Error::InvalidDimension { .. }))
        ));

        // Representable but far larger than the data that follows
        let result = read_pnm(Cursor::new(b"P5\n65535 65535\n255\n\x00\x00".to_vec()));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }

    #[test]
    fn test_pnm_rejects_alpha() {
        let data = [0u8; 4];
        let raw = RawImage {
            width: 1,
            height: 1,
            channels: 4,
            data: &data,
        };
        assert!(write_pnm(raw, Vec::new()).is_err());
    }
}
