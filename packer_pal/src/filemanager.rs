use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

fn part_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn write_part(part: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(part)?);
    file.write_all(data)?;
    file.flush()?;
    file.get_ref().sync_all()
}

/// Writes `data` to `path` through a sibling `.part` file that is renamed into
/// place, so a failed write never leaves a partial output behind.
pub fn write_output(path: &Path, data: &[u8]) -> io::Result<()> {
    let part = part_path(path);

    let result = write_part(&part, data).and_then(|()| fs::rename(&part, path));
    if let Err(e) = &result {
        warn!("Writing {} failed: {}", path.display(), e);
        if part.exists() {
            if let Err(e) = fs::remove_file(&part) {
                warn!("Could not remove {}: {}", part.display(), e);
            }
        }
    } else {
        debug!("Wrote {} bytes to {}", data.len(), path.display());
    }

    result
}

/// Regular files in `dir` whose extension matches `extension` ignoring case,
/// sorted by path.
pub fn list_inputs(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

/// `output_dir/<input stem>.<extension>`
pub fn output_path(output_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}
