use std::io::{self, Write};

use rayon::prelude::*;

use crate::core::actions::render_band::ports::output_device::DeviceError;
use crate::core::data::colour::Colour;

pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const COLOUR_SPACE_HEADER_SIZE: u32 = 84;
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE + COLOUR_SPACE_HEADER_SIZE;

const BYTES_PER_PIXEL: usize = 4;
const BITS_PER_PIXEL: u16 = 32;
const BI_BITFIELDS: u32 = 3;
const LCS_SRGB: u32 = 0x7352_4742;

const RED_MASK: u32 = 0x00FF_0000;
const GREEN_MASK: u32 = 0x0000_FF00;
const BLUE_MASK: u32 = 0x0000_00FF;
const ALPHA_MASK: u32 = 0xFF00_0000;

/// Total file size for a `width` x `height` image, or `None` if it does not
/// fit the 32-bit size fields.
#[must_use]
pub fn bmp_file_size(width: u32, height: u32) -> Option<u32> {
    i32::try_from(width).ok()?;
    i32::try_from(height).ok()?;

    width
        .checked_mul(height)?
        .checked_mul(BYTES_PER_PIXEL as u32)?
        .checked_add(PIXEL_DATA_OFFSET)
}

/// Headers for a 32-bit BI_BITFIELDS bitmap with an sRGB colour-space block.
pub fn encode_bmp_header(width: u32, height: u32) -> Result<Vec<u8>, DeviceError> {
    let file_size = bmp_file_size(width, height).ok_or(DeviceError::TooLarge { width, height })?;
    let mut header = Vec::with_capacity(PIXEL_DATA_OFFSET as usize);

    // file header
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&file_size.to_le_bytes());
    header.extend_from_slice(&[0; 4]);
    header.extend_from_slice(&PIXEL_DATA_OFFSET.to_le_bytes());

    // info header
    header.extend_from_slice(&(INFO_HEADER_SIZE + COLOUR_SPACE_HEADER_SIZE).to_le_bytes());
    header.extend_from_slice(&(width as i32).to_le_bytes());
    header.extend_from_slice(&(height as i32).to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes());
    header.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    header.extend_from_slice(&BI_BITFIELDS.to_le_bytes());
    // image size, x/y resolution, colours used, important colours
    header.extend_from_slice(&[0; 20]);

    // colour space block
    for mask in [RED_MASK, GREEN_MASK, BLUE_MASK, ALPHA_MASK] {
        header.extend_from_slice(&mask.to_le_bytes());
    }
    header.extend_from_slice(&LCS_SRGB.to_le_bytes());
    header.extend_from_slice(&[0; 64]);

    Ok(header)
}

/// Packs `pixels` as little-endian ARGB words, one row per rayon task.
#[must_use]
pub fn encode_bmp_pixels(pixels: &[Colour], width: u32) -> Vec<u8> {
    let row_len = (width as usize).max(1);
    let mut bytes = vec![0u8; pixels.len() * BYTES_PER_PIXEL];

    bytes
        .par_chunks_mut(row_len * BYTES_PER_PIXEL)
        .zip(pixels.par_chunks(row_len))
        .for_each(|(out, row)| {
            for (dst, colour) in out.chunks_exact_mut(BYTES_PER_PIXEL).zip(row) {
                dst.copy_from_slice(&colour.to_le_bytes());
            }
        });

    bytes
}

/// Writes a complete bitmap. Rows are stored in the order given, row 0 first.
pub fn write_bmp<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[Colour],
) -> Result<(), DeviceError> {
    if pixels.len() != width as usize * height as usize {
        return Err(DeviceError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "expected {} pixels for a {}x{} image, got {}",
                width as usize * height as usize,
                width,
                height,
                pixels.len()
            ),
        )));
    }

    writer.write_all(&encode_bmp_header(width, height)?)?;
    writer.write_all(&encode_bmp_pixels(pixels, width))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_layout() {
        let header = encode_bmp_header(2, 5).unwrap();

        assert_eq!(header.len(), 138);
        assert_eq!(&header[0..2], b"BM");
        assert_eq!(u32_at(&header, 2), 138 + 2 * 5 * 4);
        assert_eq!(u32_at(&header, 6), 0);
        assert_eq!(u32_at(&header, 10), 138);

        assert_eq!(u32_at(&header, 14), 124);
        assert_eq!(u32_at(&header, 18), 2);
        assert_eq!(u32_at(&header, 22), 5);
        assert_eq!(u16_at(&header, 26), 1);
        assert_eq!(u16_at(&header, 28), 32);
        assert_eq!(u32_at(&header, 30), 3);
        assert!(header[34..54].iter().all(|&b| b == 0));

        assert_eq!(u32_at(&header, 54), 0x00FF_0000);
        assert_eq!(u32_at(&header, 58), 0x0000_FF00);
        assert_eq!(u32_at(&header, 62), 0x0000_00FF);
        assert_eq!(u32_at(&header, 66), 0xFF00_0000);
        assert_eq!(&header[70..74], b"BGRs");
        assert!(header[74..138].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pixels_are_bgra() {
        let pixels = [Colour::rgb(1, 2, 3), Colour::rgb(4, 5, 6)];

        assert_eq!(
            encode_bmp_pixels(&pixels, 2),
            vec![3, 2, 1, 0xFF, 6, 5, 4, 0xFF]
        );
    }

    #[test]
    fn test_parallel_rows_keep_order() {
        let width = 7u32;
        let pixels: Vec<Colour> = (0..7 * 9).map(|i| Colour::rgb(i as u8, 0, 0)).collect();

        let bytes = encode_bmp_pixels(&pixels, width);

        for (i, chunk) in bytes.chunks_exact(4).enumerate() {
            assert_eq!(chunk[2], i as u8);
        }
    }

    #[test]
    fn test_write_bmp_emits_header_then_pixels() {
        let pixels = vec![Colour::BLACK; 3 * 5];
        let mut out = Vec::new();

        write_bmp(&mut out, 3, 5, &pixels).unwrap();

        assert_eq!(out.len(), 138 + 3 * 5 * 4);
        assert_eq!(u32_at(&out, 2) as usize, out.len());
        assert_eq!(&out[138..142], &[0, 0, 0, 0xFF]);
    }

    #[test]
    fn test_pixel_count_mismatch_is_an_error() {
        let mut out = Vec::new();

        assert!(matches!(
            write_bmp(&mut out, 3, 5, &[Colour::BLACK; 4]),
            Err(DeviceError::Io(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        assert_eq!(bmp_file_size(65_536, 65_536), None);
        assert_eq!(bmp_file_size(u32::MAX, 1), None);
        assert!(matches!(
            encode_bmp_header(65_536, 65_536),
            Err(DeviceError::TooLarge { .. })
        ));
    }
}
