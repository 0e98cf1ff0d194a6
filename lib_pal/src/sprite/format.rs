use std::fmt;

use crate::constants::PALETTE_LEN;

/// Pixel representation reported by the image decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Indexed,
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    Rgba,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorMode::Indexed => "indexed",
            ColorMode::Grayscale => "grayscale",
            ColorMode::GrayscaleAlpha => "grayscale+alpha",
            ColorMode::Rgb => "rgb",
            ColorMode::Rgba => "rgba",
        };
        f.write_str(name)
    }
}

/// A decoded image as handed over by the decoding collaborator.
///
/// `pixels` holds one palette index per pixel, row-major with no padding, and
/// `palette` the image's own RGB triples (at most 256 of them).
#[derive(Debug, Clone)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub palette: Vec<u8>,
    pub pixels: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: u32, height: u32, palette: Vec<u8>, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            mode: ColorMode::Indexed,
            palette,
            pixels,
        }
    }

    /// The embedded palette normalized to exactly 768 bytes: cut after 256
    /// entries, zero-padded when the image declares fewer.
    pub fn embedded_palette(&self) -> [u8; PALETTE_LEN] {
        let mut normalized = [0u8; PALETTE_LEN];
        let len = self.palette.len().min(PALETTE_LEN);
        normalized[..len].copy_from_slice(&self.palette[..len]);
        normalized
    }
}

/// Width, height and index buffer that passed validation.
///
/// Only the validator and the unpacker build these, so `pixels.len()` always
/// equals `width * height` and both dimensions are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSprite {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl ValidatedSprite {
    pub(crate) fn new(width: u16, height: u16, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}
