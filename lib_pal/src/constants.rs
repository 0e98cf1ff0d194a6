pub const FORMAT_NAME: &str = "Packed indexed sprite";
pub const FILE_EXT: &str = "dat";

pub const PALETTE_ENTRIES: usize = 256;
pub const RGB_SIZE: usize = 3;
pub const PALETTE_LEN: usize = PALETTE_ENTRIES * RGB_SIZE;

/// `[width: u16 LE][height: u16 LE]`
pub const SPRITE_HEADER_SIZE: usize = 2 * std::mem::size_of::<u16>();
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

pub const DEFAULT_PALETTE_FILE: &str = "palette.dat";
pub const DEFAULT_TEXT_PALETTE_FILE: &str = "palette.gpl";
