//! Configuration for the batch packer, read from `sprpack.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command line flags are applied on top of whatever was loaded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lib_sprdat::constants::{DEFAULT_PALETTE_FILE, DEFAULT_TEXT_PALETTE_FILE, FILE_EXT};
use lib_sprdat::ParsePolicy;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "sprpack.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackerConfig {
    /// Directory scanned for input images
    pub input_dir: PathBuf,
    /// Output directory, relative to `input_dir` unless absolute
    pub output_subdir: PathBuf,
    /// Reference palette file name, looked up in the search path
    pub palette_file: String,
    pub input_extension: String,
    pub output_extension: String,
    /// Default source for the `palette` command
    pub text_palette: PathBuf,
    pub text_policy: ParsePolicy,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Raw"),
            output_subdir: PathBuf::from("Completed"),
            palette_file: DEFAULT_PALETTE_FILE.to_string(),
            input_extension: "png".to_string(),
            output_extension: FILE_EXT.to_string(),
            text_palette: PathBuf::from(DEFAULT_TEXT_PALETTE_FILE),
            text_policy: ParsePolicy::Lenient,
        }
    }
}

/// Overrides collected from the command line
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl PackerConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `explicit` if given, otherwise `sprpack.toml` from the working
    /// directory when it exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.is_file() {
                    debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                local
            }
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml(&text)
    }

    pub fn apply(&mut self, overrides: CliOverrides) {
        if let Some(input_dir) = overrides.input_dir {
            self.input_dir = input_dir;
        }
        // Still resolved against input_dir, so relative paths land inside it
        if let Some(output_dir) = overrides.output_dir {
            self.output_subdir = output_dir;
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(&self.output_subdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PackerConfig::default();
        assert_eq!(config.output_dir(), Path::new("Raw").join("Completed"));
        assert_eq!(config.palette_file, "palette.dat");
        assert_eq!(config.output_extension, "dat");
        assert_eq!(config.text_policy, ParsePolicy::Lenient);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = PackerConfig::from_toml(
            r#"
            input_dir = "sprites"
            text_policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.input_dir, PathBuf::from("sprites"));
        assert_eq!(config.output_subdir, PathBuf::from("Completed"));
        assert_eq!(config.text_policy, ParsePolicy::Strict);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = PackerConfig::from_toml("input_directory = \"x\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = PackerConfig::load(Some(dir.path().join("missing.toml").as_path()));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "palette_file = \"game.pal\"\n").unwrap();

        let config = PackerConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.palette_file, "game.pal");
    }

    #[test]
    fn test_overrides() {
        let mut config = PackerConfig::default();
        config.apply(CliOverrides {
            input_dir: Some(PathBuf::from("in")),
            output_dir: Some(PathBuf::from("/tmp/out")),
        });
        assert_eq!(config.input_dir, PathBuf::from("in"));
        // Joining an absolute path replaces the base
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/out"));
    }
}
