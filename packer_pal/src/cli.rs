//! Command line front end: argument parsing, command dispatch and exit codes.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lib_sprdat::constants::FORMAT_NAME;
use lib_sprdat::palette::TextPaletteError;
use lib_sprdat::sprite::UnpackError;
use lib_sprdat::{
    convert_text_palette, load_reference, resolve_reference, unpack, ParsePolicy, Reference,
};
use log::{info, warn, LevelFilter};
use thiserror::Error;

use crate::batch::{self, BatchError, BatchOptions, BatchReport};
use crate::config::{CliOverrides, ConfigError, PackerConfig};
use crate::filemanager::write_output;

/// Some files failed to convert
const EXIT_PARTIAL_FAILURE: u8 = 2;
/// Nothing was attempted: bad arguments or config, missing input dir, unusable palette...
const EXIT_SETUP_ERROR: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "sprpack", version, about = "Packs indexed PNG sprites into raw .dat sprites")]
struct Cli {
    /// Config file (defaults to ./sprpack.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors, wins over --verbose
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every PNG of the input directory (the default command)
    Pack(PackArgs),
    /// Convert a text palette (.gpl) into a 768-byte binary palette
    Palette(PaletteArgs),
    /// Print the header of a packed sprite
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
struct PackArgs {
    /// Input directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory, relative to the input directory unless absolute
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use this palette instead of searching the working and program directories
    #[arg(short, long, conflicts_with = "no_palette")]
    palette: Option<PathBuf>,

    /// Skip palette validation entirely
    #[arg(long)]
    no_palette: bool,
}

#[derive(Args, Debug)]
struct PaletteArgs {
    /// Text palette to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Binary palette to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on malformed lines or a color count other than 256
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Packed sprite file
    file: PathBuf,
}

#[derive(Error, Debug)]
enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    TextPalette(#[from] TextPaletteError),
    #[error(transparent)]
    Unpack(#[from] UnpackError),
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CommandError + '_ {
    move |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Working directory first, then the directory holding the executable.
fn palette_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Ok(cwd) = env::current_dir() {
        dirs.push(cwd);
    }
    match env::current_exe() {
        Ok(exe) => dirs.extend(exe.parent().map(Path::to_path_buf)),
        Err(e) => warn!("Cannot locate the executable directory: {}", e),
    }
    dirs
}

fn pack_reference(config: &PackerConfig, args: &PackArgs) -> Result<Reference, BatchError> {
    if args.no_palette {
        return Ok(Reference::Absent);
    }
    match &args.palette {
        Some(path) => Ok(Reference::Present(load_reference(path)?)),
        None => Ok(resolve_reference(&config.palette_file, &palette_search_dirs())?),
    }
}

/// First line of a `pack` run, so skipped palette checks never go unnoticed.
fn reference_banner(reference: &Reference) -> &'static str {
    match reference {
        Reference::Present(_) => "Palette: validating sprites against the reference",
        Reference::Absent => "WARNING: no reference palette, only color mode and size are checked",
    }
}

fn run_pack(config: &PackerConfig, args: &PackArgs) -> Result<BatchReport, CommandError> {
    let reference = pack_reference(config, args)?;
    println!("{}", reference_banner(&reference));

    let options = BatchOptions {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir(),
        input_extension: config.input_extension.clone(),
        output_extension: config.output_extension.clone(),
        reference,
    };
    let report = batch::run(&options)?;

    if report.outcomes.is_empty() {
        println!("No .{} files in '{}'", options.input_extension, options.input_dir.display());
    } else {
        println!(
            "\nDone. OK={}  FAIL={}  (input='{}', output='{}')",
            report.succeeded(),
            report.failed(),
            options.input_dir.display(),
            options.output_dir.display()
        );
    }
    Ok(report)
}

fn run_palette(config: &PackerConfig, args: &PaletteArgs) -> Result<(), CommandError> {
    let input = args.input.as_deref().unwrap_or(config.text_palette.as_path());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.palette_file));
    let policy = if args.strict {
        ParsePolicy::Strict
    } else {
        config.text_policy
    };

    let text = fs::read_to_string(input).map_err(io_error(input))?;
    let palette = convert_text_palette(text.lines(), policy)?;
    write_output(&output, palette.as_bytes()).map_err(io_error(&output))?;

    info!("Converted {} with {:?} parsing", input.display(), policy);
    println!("{} written ({} bytes)", output.display(), palette.as_bytes().len());
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), CommandError> {
    let data = fs::read(&args.file).map_err(io_error(&args.file))?;
    let sprite = unpack(&data)?;
    let highest = sprite.pixels().iter().max().copied().unwrap_or(0);

    println!(
        "{}: {} {}x{}, {} pixels, highest index {}",
        args.file.display(),
        FORMAT_NAME,
        sprite.width(),
        sprite.height(),
        sprite.pixels().len(),
        highest
    );
    Ok(())
}

fn dispatch(cli: Cli) -> Result<ExitCode, CommandError> {
    let mut config = PackerConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Pack(PackArgs::default())) {
        Command::Pack(args) => {
            config.apply(CliOverrides {
                input_dir: args.input.clone(),
                output_dir: args.output.clone(),
            });
            let report = run_pack(&config, &args)?;
            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_PARTIAL_FAILURE))
            }
        }
        Command::Palette(args) => run_palette(&config, &args).map(|()| ExitCode::SUCCESS),
        Command::Inspect(args) => run_inspect(&args).map(|()| ExitCode::SUCCESS),
    }
}

/// `--help` and `--version` succeed, every other parse failure is a setup error.
fn usage_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        EXIT_SETUP_ERROR
    } else {
        0
    }
}

pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_code(&e));
        }
    };
    lib_sprdat::init_logging(log_level(cli.verbose, cli.quiet));

    match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::from(EXIT_SETUP_ERROR)
        }
    }
}
