pub mod loader;
pub mod text;

pub use loader::{find_palette, load_reference, resolve_reference, PaletteError};
pub use text::{convert_text_palette, ParsePolicy, TextPaletteError};

use crate::constants::{PALETTE_ENTRIES, PALETTE_LEN, RGB_SIZE};

/// The canonical 256-entry RGB palette every sprite of a batch must share.
///
/// Always exactly [`PALETTE_LEN`] bytes, laid out as `R, G, B` triples. This is
/// also the on-disk form of `palette.dat`.
#[derive(Clone, PartialEq, Eq)]
pub struct ReferencePalette([u8; PALETTE_LEN]);

impl ReferencePalette {
    pub fn new(bytes: [u8; PALETTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a palette from raw file contents.
    ///
    /// Only the first [`PALETTE_LEN`] bytes are significant; trailing bytes are
    /// ignored.
    ///
    /// # Errors
    /// - Returns `PaletteError::PaletteTooSmall` if fewer than 768 bytes are given
    pub fn from_bytes(data: &[u8]) -> Result<Self, PaletteError> {
        let bytes: [u8; PALETTE_LEN] = data
            .get(..PALETTE_LEN)
            .and_then(|head| head.try_into().ok())
            .ok_or(PaletteError::PaletteTooSmall { len: data.len() })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PALETTE_LEN] {
        &self.0
    }

    pub fn entry(&self, index: u8) -> [u8; RGB_SIZE] {
        let start = index as usize * RGB_SIZE;
        [self.0[start], self.0[start + 1], self.0[start + 2]]
    }

    /// Index of the first color entry that differs from `other`, if any.
    pub fn first_difference(&self, other: &[u8; PALETTE_LEN]) -> Option<usize> {
        self.0
            .chunks_exact(RGB_SIZE)
            .zip(other.chunks_exact(RGB_SIZE))
            .position(|(ours, theirs)| ours != theirs)
    }
}

impl Default for ReferencePalette {
    fn default() -> Self {
        Self([0; PALETTE_LEN])
    }
}

impl std::fmt::Debug for ReferencePalette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReferencePalette({} entries, first {:?})", PALETTE_ENTRIES, self.entry(0))
    }
}

/// Whether palette validation is in effect for a batch.
///
/// With `Absent` only the color mode, dimensions and pixel count are checked;
/// palette correctness is then the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reference {
    Present(ReferencePalette),
    #[default]
    Absent,
}

impl Reference {
    /// The palette to validate against, `None` when validation is skipped.
    pub fn palette(&self) -> Option<&ReferencePalette> {
        match self {
            Reference::Present(palette) => Some(palette),
            Reference::Absent => None,
        }
    }
}

impl From<ReferencePalette> for Reference {
    fn from(palette: ReferencePalette) -> Self {
        Reference::Present(palette)
    }
}
