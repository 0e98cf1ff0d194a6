use std::io;
use std::path::{Path, PathBuf};

use lib_sprdat::palette::PaletteError;
use lib_sprdat::sprite::ValidationError;
use lib_sprdat::{pack, validate, Reference};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::filemanager::{list_inputs, output_path, write_output};
use crate::png_source::{decode_file, DecodeError};

/// Failures that stop the batch before any file is converted.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("input directory '{}' does not exist", .0.display())]
    MissingInputDir(PathBuf),
    #[error("failed to create output directory '{}': {source}", path.display())]
    CreateOutputDir { path: PathBuf, source: io::Error },
    #[error("failed to list '{}': {source}", path.display())]
    ListInputs { path: PathBuf, source: io::Error },
    #[error("reference palette: {0}")]
    Palette(#[from] PaletteError),
}

/// Failure converting a single file. The batch records it and moves on.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl FileError {
    /// Conditions that point at a bug or the environment rather than at the
    /// input file.
    pub fn is_internal(&self) -> bool {
        match self {
            FileError::Decode(_) => false,
            FileError::Validation(e) => e.is_internal(),
            FileError::Write(_) => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub input_extension: String,
    pub output_extension: String,
    pub reference: Reference,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf, FileError>,
}

impl FileOutcome {
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Decodes, validates and packs one image, then writes the packed sprite.
///
/// Nothing is written unless every check passed.
pub fn convert_file(input: &Path, output: &Path, reference: &Reference) -> Result<(), FileError> {
    let image = decode_file(input)?;
    let sprite = validate(image, reference)?;
    let packed = pack(&sprite);
    write_output(output, &packed).map_err(FileError::Write)
}

fn prepare(options: &BatchOptions) -> Result<Vec<PathBuf>, BatchError> {
    if !options.input_dir.is_dir() {
        return Err(BatchError::MissingInputDir(options.input_dir.clone()));
    }

    std::fs::create_dir_all(&options.output_dir).map_err(|source| BatchError::CreateOutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    list_inputs(&options.input_dir, &options.input_extension).map_err(|source| {
        BatchError::ListInputs {
            path: options.input_dir.clone(),
            source,
        }
    })
}

/// Converts every matching file of the input directory.
///
/// Per-file failures are collected in the report. Only setup problems are
/// returned as errors.
pub fn run(options: &BatchOptions) -> Result<BatchReport, BatchError> {
    let inputs = prepare(options)?;
    info!(
        "Converting {} files from {} into {}",
        inputs.len(),
        options.input_dir.display(),
        options.output_dir.display()
    );

    let mut report = BatchReport::default();
    for input in inputs {
        let output = output_path(&options.output_dir, &input, &options.output_extension);
        debug!("{} -> {}", input.display(), output.display());

        let result = convert_file(&input, &output, &options.reference).map(|()| output);
        let outcome = FileOutcome { input, result };

        match &outcome.result {
            Ok(output) => println!("OK: {} -> {}", outcome.file_name(), output.display()),
            Err(e) => {
                if e.is_internal() {
                    error!("Internal failure on {}: {}", outcome.input.display(), e);
                } else {
                    warn!("Rejected {}: {}", outcome.input.display(), e);
                }
                println!("FAIL: {} -> {}", outcome.file_name(), e);
            }
        }
        report.outcomes.push(outcome);
    }

    Ok(report)
}
