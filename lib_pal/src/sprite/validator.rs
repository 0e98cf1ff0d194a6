use log::{debug, error};
use thiserror::Error;

use super::format::{ColorMode, IndexedImage, ValidatedSprite};
use crate::constants::MAX_DIMENSION;
use crate::palette::Reference;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("image is not indexed, actual mode: {actual_mode}")]
    NotIndexed { actual_mode: ColorMode },
    #[error("embedded palette differs from the reference palette (first difference at entry {entry})")]
    PaletteMismatch { entry: usize },
    #[error("invalid sprite size {width}x{height} (must be 1..={} on each side)", MAX_DIMENSION)]
    InvalidDimensions { width: u32, height: u32 },
    #[error("unexpected pixel data: {actual} bytes, expected {expected}")]
    PixelCountMismatch { actual: usize, expected: usize },
}

impl ValidationError {
    /// `true` for errors that mean the decoder broke its own contract rather
    /// than the input file being unusable.
    pub fn is_internal(&self) -> bool {
        matches!(self, ValidationError::PixelCountMismatch { .. })
    }
}

fn dimension_in_range(value: u32) -> bool {
    value >= 1 && value <= MAX_DIMENSION
}

/// Checks a decoded image against the packed sprite invariants.
///
/// Checks run in order: color mode, palette (only with
/// `Reference::Present`), dimensions, pixel count. The first failure wins.
///
/// # Returns
/// The validated sprite; the pixel buffer is moved out of `image`.
pub fn validate(
    image: IndexedImage,
    reference: &Reference,
) -> Result<ValidatedSprite, ValidationError> {
    if image.mode != ColorMode::Indexed {
        return Err(ValidationError::NotIndexed {
            actual_mode: image.mode,
        });
    }

    if let Some(palette) = reference.palette() {
        let embedded = image.embedded_palette();
        if let Some(entry) = palette.first_difference(&embedded) {
            debug!(
                "Palette entry {} is {:?}, reference has {:?}",
                entry,
                &embedded[entry * 3..entry * 3 + 3],
                palette.entry(entry as u8)
            );
            return Err(ValidationError::PaletteMismatch { entry });
        }
        debug!("Embedded palette matches the reference");
    }

    let (width, height) = (image.width, image.height);
    if !dimension_in_range(width) || !dimension_in_range(height) {
        return Err(ValidationError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize;
    if image.pixels.len() != expected {
        error!(
            "Decoder returned {} pixel bytes for a {}x{} image",
            image.pixels.len(),
            width,
            height
        );
        return Err(ValidationError::PixelCountMismatch {
            actual: image.pixels.len(),
            expected,
        });
    }

    Ok(ValidatedSprite::new(width as u16, height as u16, image.pixels))
}
