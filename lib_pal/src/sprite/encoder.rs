use log::debug;

use super::format::ValidatedSprite;
use crate::constants::SPRITE_HEADER_SIZE;

/// Serializes a validated sprite into the packed record
/// `[width: u16 LE][height: u16 LE][pixels]`.
///
/// There is no magic, version, padding or compression, so the output is always
/// `4 + width * height` bytes and identical input gives identical bytes.
pub fn pack(sprite: &ValidatedSprite) -> Vec<u8> {
    let mut packed = Vec::with_capacity(SPRITE_HEADER_SIZE + sprite.pixels().len());

    packed.extend_from_slice(&sprite.width().to_le_bytes());
    packed.extend_from_slice(&sprite.height().to_le_bytes());
    packed.extend_from_slice(sprite.pixels());

    debug!(
        "Packed {}x{} sprite into {} bytes",
        sprite.width(),
        sprite.height(),
        packed.len()
    );
    packed
}
