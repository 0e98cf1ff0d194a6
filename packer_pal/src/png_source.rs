use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use lib_sprdat::{ColorMode, IndexedImage};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open image: {0}")]
    Io(#[from] io::Error),
    #[error("invalid PNG: {0}")]
    Png(#[from] png::DecodingError),
}

fn color_mode(color_type: png::ColorType) -> ColorMode {
    match color_type {
        png::ColorType::Indexed => ColorMode::Indexed,
        png::ColorType::Grayscale => ColorMode::Grayscale,
        png::ColorType::GrayscaleAlpha => ColorMode::GrayscaleAlpha,
        png::ColorType::Rgb => ColorMode::Rgb,
        png::ColorType::Rgba => ColorMode::Rgba,
    }
}

/// Spreads 1, 2 or 4-bit indices to one byte each, dropping the padding bits
/// at the end of every row.
fn expand_indices(data: &[u8], width: usize, line_size: usize, bits: u8) -> Vec<u8> {
    if bits == 8 {
        return data.to_vec();
    }

    let per_byte = (8 / bits) as usize;
    let mask = (1u8 << bits) - 1;
    let rows = data.len() / line_size.max(1);
    let mut pixels = Vec::with_capacity(width * rows);

    for row in data.chunks(line_size.max(1)) {
        let indices = row.iter().flat_map(|&byte| {
            (0..per_byte).map(move |i| (byte >> (8 - bits as usize * (i + 1))) & mask)
        });
        pixels.extend(indices.take(width));
    }
    pixels
}

/// Decodes a PNG without color transformations, so indexed images keep their
/// index data and their own `PLTE` chunk.
pub fn decode<R: Read>(source: R) -> Result<IndexedImage, DecodeError> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(png::Transformations::IDENTITY);

    let mut reader = decoder.read_info()?;
    let mut buffer = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buffer)?;
    buffer.truncate(frame.buffer_size());

    let mode = color_mode(frame.color_type);
    let bits = frame.bit_depth as u8;
    let palette = reader
        .info()
        .palette
        .as_ref()
        .map(|palette| palette.to_vec())
        .unwrap_or_default();
    debug!(
        "Decoded {}x{} {} image, {}-bit, {} palette entries",
        frame.width,
        frame.height,
        mode,
        bits,
        palette.len() / 3
    );

    let pixels = match mode {
        ColorMode::Indexed => expand_indices(&buffer, frame.width as usize, frame.line_size, bits),
        _ => buffer,
    };

    Ok(IndexedImage {
        width: frame.width,
        height: frame.height,
        mode,
        palette,
        pixels,
    })
}

pub fn decode_file(path: &Path) -> Result<IndexedImage, DecodeError> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}


#[cfg(test)]
mod tests {
    use super::fixtures::{indexed_png, rgb_png};
    use super::*;

    #[test]
    fn test_decode_indexed_keeps_indices_and_palette() {
        let palette = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];
        let data = indexed_png(2, 2, &palette, &[0, 1, 2, 3]);

        let image = decode(data.as_slice()).unwrap();
        assert_eq!(image.mode, ColorMode::Indexed);
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.pixels, vec![0, 1, 2, 3]);
        assert_eq!(image.palette, palette.to_vec());
    }

    #[test]
    fn test_decode_rgb_reports_mode() {
        let image = decode(rgb_png(3, 1).as_slice()).unwrap();
        assert_eq!(image.mode, ColorMode::Rgb);
        assert!(image.palette.is_empty());
    }

    #[test]
    fn test_decode_four_bit_indexed() {
        let mut data = Vec::new();
        let mut encoder = png::Encoder::new(&mut data, 3, 2);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Four);
        encoder.set_palette(vec![0u8; 16 * 3]);
        let mut writer = encoder.write_header().unwrap();
        // Rows of 3 nibbles, each padded to 2 bytes
        writer.write_image_data(&[0x12, 0x30, 0xFE, 0xD0]).unwrap();
        writer.finish().unwrap();

        let image = decode(data.as_slice()).unwrap();
        assert_eq!(image.pixels, vec![1, 2, 3, 15, 14, 13]);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode(&b"not a png"[..]);
        assert!(matches!(result, Err(DecodeError::Png(_))));
    }

    #[test]
    fn test_expand_one_bit_rows() {
        // width 10: two bytes per row, six padding bits
        let data = [0b1010_1010, 0b1100_0000, 0b0000_0001, 0b0100_0000];
        let pixels = expand_indices(&data, 10, 2, 1);
        assert_eq!(
            pixels,
            vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1]
        );
    }
}
