use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use super::ReferencePalette;
use crate::constants::{PALETTE_ENTRIES, PALETTE_LEN, RGB_SIZE};

/// Line prefixes of a GIMP-style palette that never carry a color.
pub const HEADER_MARKERS: [&str; 3] = ["GIMP", "Name:", "Columns:"];

/// Editors on Windows like to prefix the first line with one.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Channel quantization divisor, 8-bit to the 6-bit DAC range.
const QUANTIZE_DIVISOR: u8 = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextPaletteError {
    #[error("line {line}: expected at least three color values, got '{content}'")]
    MalformedLine { line: usize, content: String },
    #[error("line {line}: '{token}' is not a color channel in 0..=255")]
    InvalidChannel { line: usize, token: String },
    #[error("palette has {found} colors, expected {}", PALETTE_ENTRIES)]
    TooFewColors { found: usize },
    #[error("palette has {found} colors, only {} fit", PALETTE_ENTRIES)]
    TooManyColors { found: usize },
}

/// How [`convert_text_palette`] treats input that does not describe exactly
/// 256 well-formed colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Skip unusable lines, pad with black and drop colors past 256.
    #[default]
    Lenient,
    /// Reject anything the lenient policy would skip, pad or drop.
    Strict,
}

fn is_skipped(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || HEADER_MARKERS.iter().any(|marker| line.starts_with(marker))
}

fn parse_channel(token: &str, line: usize) -> Result<u8, TextPaletteError> {
    token
        .parse::<u8>()
        .map_err(|_| TextPaletteError::InvalidChannel {
            line,
            token: token.to_string(),
        })
}

/// Parses one data line, `Ok(None)` meaning the line holds no color.
fn parse_line(
    line: &str,
    line_no: usize,
    policy: ParsePolicy,
) -> Result<Option<[u8; RGB_SIZE]>, TextPaletteError> {
    let tokens: Vec<&str> = line.split_whitespace().take(RGB_SIZE).collect();
    if tokens.len() < RGB_SIZE {
        return match policy {
            ParsePolicy::Lenient => {
                debug!("Skipping line {}: fewer than three tokens", line_no);
                Ok(None)
            }
            ParsePolicy::Strict => Err(TextPaletteError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            }),
        };
    }

    let mut color = [0u8; RGB_SIZE];
    for (channel, token) in color.iter_mut().zip(&tokens) {
        match parse_channel(token, line_no) {
            Ok(value) => *channel = value / QUANTIZE_DIVISOR,
            Err(e) if policy == ParsePolicy::Lenient => {
                warn!("Skipping line {}: {}", line_no, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Some(color))
}

/// Converts a human-authored palette (one `R G B` triple per line, 8-bit
/// channels) into the 768-byte binary palette.
///
/// Empty lines, `#` comments and header lines are always skipped. Tokens past
/// the third one on a line are ignored. Every channel is divided by 4.
///
/// # Errors
/// Only with `ParsePolicy::Strict`:
/// - `MalformedLine` for a data line with fewer than three tokens
/// - `InvalidChannel` for a channel that is not an integer in `0..=255`
/// - `TooFewColors` / `TooManyColors` unless exactly 256 colors are parsed
pub fn convert_text_palette<I, S>(
    lines: I,
    policy: ParsePolicy,
) -> Result<ReferencePalette, TextPaletteError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut colors: Vec<[u8; RGB_SIZE]> = Vec::with_capacity(PALETTE_ENTRIES);

    for (index, raw) in lines.into_iter().enumerate() {
        let mut line = raw.as_ref().trim();
        if index == 0 {
            line = line.trim_start_matches(BYTE_ORDER_MARK).trim_start();
        }
        if is_skipped(line) {
            continue;
        }
        if let Some(color) = parse_line(line, index + 1, policy)? {
            colors.push(color);
        }
    }
    debug!("Parsed {} colors", colors.len());

    match colors.len() {
        found if found < PALETTE_ENTRIES => {
            if policy == ParsePolicy::Strict {
                return Err(TextPaletteError::TooFewColors { found });
            }
            info!("Padding {} missing entries with black", PALETTE_ENTRIES - found);
        }
        found if found > PALETTE_ENTRIES => {
            if policy == ParsePolicy::Strict {
                return Err(TextPaletteError::TooManyColors { found });
            }
            info!("Dropping {} colors past entry {}", found - PALETTE_ENTRIES, PALETTE_ENTRIES);
        }
        _ => {}
    }

    let mut bytes = [0u8; PALETTE_LEN];
    for (slot, color) in bytes.chunks_exact_mut(RGB_SIZE).zip(&colors) {
        slot.copy_from_slice(color);
    }

    Ok(ReferencePalette::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_palette_quantizes_channels() {
        let lines = ["GIMP Palette", "Name: test", "#", "255 128 3 white-ish", "4 8 12"];
        let palette = convert_text_palette(lines, ParsePolicy::Lenient).unwrap();
        assert_eq!(palette.entry(0), [63, 32, 0]);
        assert_eq!(palette.entry(1), [1, 2, 3]);
        assert_eq!(palette.entry(2), [0, 0, 0]);
    }

    #[test]
    fn test_text_palette_lenient_skips_short_lines() {
        let lines = ["Columns: 16", "1 2", "", "   40   80   120   "];
        let palette = convert_text_palette(lines, ParsePolicy::Lenient).unwrap();
        assert_eq!(palette.entry(0), [10, 20, 30]);
        assert_eq!(palette.entry(1), [0, 0, 0]);
    }

    #[test]
    fn test_text_palette_lenient_skips_bad_channels() {
        let lines = ["300 0 0", "a b c", "8 8 8"];
        let palette = convert_text_palette(lines, ParsePolicy::Lenient).unwrap();
        assert_eq!(palette.entry(0), [2, 2, 2]);
    }

    #[test]
    fn test_text_palette_strict_rejects_short_line() {
        let result = convert_text_palette(["1 2"], ParsePolicy::Strict);
        assert_eq!(
            result,
            Err(TextPaletteError::MalformedLine {
                line: 1,
                content: "1 2".to_string()
            })
        );
    }

    #[test]
    fn test_text_palette_strict_rejects_bad_channel() {
        let result = convert_text_palette(["# header", "0 256 0"], ParsePolicy::Strict);
        assert_eq!(
            result,
            Err(TextPaletteError::InvalidChannel {
                line: 2,
                token: "256".to_string()
            })
        );
    }

    #[test]
    fn test_text_palette_strict_rejects_padding() {
        let result = convert_text_palette(["1 1 1"], ParsePolicy::Strict);
        assert_eq!(result, Err(TextPaletteError::TooFewColors { found: 1 }));
    }

    #[test]
    fn test_text_palette_strict_rejects_truncation() {
        let lines = vec!["4 4 4"; PALETTE_ENTRIES + 1];
        let result = convert_text_palette(lines, ParsePolicy::Strict);
        assert_eq!(
            result,
            Err(TextPaletteError::TooManyColors {
                found: PALETTE_ENTRIES + 1
            })
        );
    }

    #[test]
    fn test_text_palette_strict_accepts_bom_header() {
        let mut lines = vec!["\u{feff}GIMP Palette".to_string(), "Name: bom".to_string()];
        lines.extend((0..PALETTE_ENTRIES).map(|_| "8 8 8".to_string()));
        let palette = convert_text_palette(&lines, ParsePolicy::Strict).unwrap();
        assert_eq!(palette.entry(0), [2, 2, 2]);
    }

    #[test]
    fn test_text_palette_bom_before_color() {
        let palette = convert_text_palette(["\u{feff}4 8 12"], ParsePolicy::Lenient).unwrap();
        assert_eq!(palette.entry(0), [1, 2, 3]);
    }

    #[test]
    fn test_text_palette_strict_exact() {
        let lines: Vec<String> = (0..PALETTE_ENTRIES)
            .map(|i| format!("{} {} {}", i, 255 - i, 0))
            .collect();
        let palette = convert_text_palette(&lines, ParsePolicy::Strict).unwrap();
        assert_eq!(palette.entry(255), [63, 0, 0]);
        assert_eq!(palette.entry(0), [0, 63, 0]);
    }
}
