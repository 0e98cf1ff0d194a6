use log::{debug, error};
use thiserror::Error;

use super::format::ValidatedSprite;
use crate::constants::SPRITE_HEADER_SIZE;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnpackError {
    #[error("sprite data too short for a header: {len} bytes")]
    TooShort { len: usize },
    #[error("sprite has a zero dimension: {width}x{height}")]
    ZeroDimension { width: u16, height: u16 },
    #[error("sprite data is {actual} bytes, header implies {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Reads a packed sprite record back into width, height and pixels.
///
/// The record must be exactly `4 + width * height` bytes long.
pub fn unpack(packed: &[u8]) -> Result<ValidatedSprite, UnpackError> {
    if packed.len() < SPRITE_HEADER_SIZE {
        error!("Sprite data too short: {} bytes", packed.len());
        return Err(UnpackError::TooShort { len: packed.len() });
    }

    let width = u16::from_le_bytes([packed[0], packed[1]]);
    let height = u16::from_le_bytes([packed[2], packed[3]]);
    debug!("Sprite dimensions read: width={} height={}", width, height);

    if width == 0 || height == 0 {
        return Err(UnpackError::ZeroDimension { width, height });
    }

    let expected = SPRITE_HEADER_SIZE + width as usize * height as usize;
    if packed.len() != expected {
        error!(
            "Sprite length {} does not match {}x{} header",
            packed.len(),
            width,
            height
        );
        return Err(UnpackError::LengthMismatch {
            expected,
            actual: packed.len(),
        });
    }

    Ok(ValidatedSprite::new(
        width,
        height,
        packed[SPRITE_HEADER_SIZE..].to_vec(),
    ))
}
