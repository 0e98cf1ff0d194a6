pub mod constants;
pub mod palette;
pub mod sprite;

use log::*;
use std::io::Write;

pub use crate::palette::{
    convert_text_palette, find_palette, load_reference, resolve_reference, ParsePolicy, Reference,
    ReferencePalette,
};
pub use crate::sprite::format::{ColorMode, IndexedImage, ValidatedSprite};
pub use crate::sprite::{pack, unpack, validate};

/// Environment variable holding an `env_logger` filter that overrides the level
/// passed to [`init_logging`].
pub const LOG_ENV: &str = "SPRPACK_LOG";

pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter(Some("lib_sprdat"), level)
        .filter(Some("sprpack"), level)
        .parse_env(LOG_ENV)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
