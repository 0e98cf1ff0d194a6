use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use super::{Reference, ReferencePalette};
use crate::constants::PALETTE_LEN;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("palette is too small: {len} bytes (expected at least {})", PALETTE_LEN)]
    PaletteTooSmall { len: usize },
    #[error("failed to read palette: {0}")]
    Io(#[from] io::Error),
}

/// Reads a binary reference palette.
///
/// The source file is only read. The first 768 bytes become the palette and
/// anything after them is ignored.
pub fn load_reference(path: &Path) -> Result<ReferencePalette, PaletteError> {
    let data = fs::read(path)?;
    debug!("Read {} palette bytes from {}", data.len(), path.display());

    if data.len() > PALETTE_LEN {
        debug!(
            "Ignoring {} trailing bytes in {}",
            data.len() - PALETTE_LEN,
            path.display()
        );
    }

    ReferencePalette::from_bytes(&data)
}

/// Returns `dir/file_name` for the first directory where it is a regular file.
pub fn find_palette<P: AsRef<Path>>(file_name: &str, search_dirs: &[P]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.as_ref().join(file_name))
        .find(|candidate| {
            debug!("Looking for palette at {}", candidate.display());
            candidate.is_file()
        })
}

/// Resolves the reference palette for a batch.
///
/// A palette that cannot be found anywhere yields `Reference::Absent`, which is
/// not an error. A palette that is found but unreadable or too small is.
/// The fallback is logged here as a warning and `sprpack pack` repeats it on
/// stdout before converting anything.
pub fn resolve_reference<P: AsRef<Path>>(
    file_name: &str,
    search_dirs: &[P],
) -> Result<Reference, PaletteError> {
    match find_palette(file_name, search_dirs) {
        Some(path) => {
            let palette = load_reference(&path)?;
            info!("Using reference palette {}", path.display());
            Ok(Reference::Present(palette))
        }
        None => {
            warn!(
                "No '{}' found in the search path, palettes will not be validated",
                file_name
            );
            Ok(Reference::Absent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_reference_too_small() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("palette.dat");
        fs::write(&path, [0u8; 100]).unwrap();

        let result = load_reference(&path);
        assert!(matches!(
            result,
            Err(PaletteError::PaletteTooSmall { len: 100 })
        ));
    }

    #[test]
    fn test_load_reference_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_reference(&dir.path().join("nope.dat"));
        assert!(matches!(result, Err(PaletteError::Io(_))));
    }

    #[test]
    fn test_find_palette_first_match_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("palette.dat"), [1u8; PALETTE_LEN]).unwrap();

        let found = find_palette("palette.dat", &[first.path(), second.path()]);
        assert_eq!(found, Some(second.path().join("palette.dat")));

        fs::write(first.path().join("palette.dat"), [2u8; PALETTE_LEN]).unwrap();
        let found = find_palette("palette.dat", &[first.path(), second.path()]);
        assert_eq!(found, Some(first.path().join("palette.dat")));
    }

    #[test]
    fn test_find_palette_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("palette.dat")).unwrap();
        assert_eq!(find_palette("palette.dat", &[dir.path()]), None);
    }

    #[test]
    fn test_resolve_reference_absent() {
        let dir = TempDir::new().unwrap();
        let reference = resolve_reference("palette.dat", &[dir.path()]).unwrap();
        assert_eq!(reference, Reference::Absent);
    }

    #[test]
    fn test_resolve_reference_present() {
        let dir = TempDir::new().unwrap();
        let mut data = vec![9u8; PALETTE_LEN];
        data.push(0xFF);
        fs::write(dir.path().join("palette.dat"), &data).unwrap();

        let reference = resolve_reference("palette.dat", &[dir.path()]).unwrap();
        assert_eq!(
            reference,
            Reference::Present(ReferencePalette::new([9u8; PALETTE_LEN]))
        );
    }

    #[test]
    fn test_resolve_reference_too_small_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("palette.dat"), [0u8; 10]).unwrap();
        assert!(resolve_reference("palette.dat", &[dir.path()]).is_err());
    }
}
