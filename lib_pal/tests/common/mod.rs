#![allow(dead_code)]

use lib_sprdat::constants::PALETTE_LEN;
use lib_sprdat::{IndexedImage, ReferencePalette};

pub const GRADIENT_WIDTH: u32 = 16;
pub const GRADIENT_HEIGHT: u32 = 16;

/// 256 distinct grays, the way most authoring tools export a ramp.
pub fn gray_ramp() -> [u8; PALETTE_LEN] {
    let mut bytes = [0u8; PALETTE_LEN];
    for (i, entry) in bytes.chunks_exact_mut(3).enumerate() {
        entry.fill(i as u8);
    }
    bytes
}

pub fn gray_ramp_reference() -> ReferencePalette {
    ReferencePalette::new(gray_ramp())
}

/// A 16x16 image using every palette index once.
pub fn gradient_image() -> IndexedImage {
    let pixels = (0..=255u8).collect();
    IndexedImage::new(GRADIENT_WIDTH, GRADIENT_HEIGHT, gray_ramp().to_vec(), pixels)
}

pub fn small_image() -> IndexedImage {
    IndexedImage::new(2, 2, vec![0; PALETTE_LEN], vec![0, 1, 2, 3])
}
