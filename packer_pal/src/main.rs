mod batch;
mod cli;
mod config;
mod filemanager;
mod png_source;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
