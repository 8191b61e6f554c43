//! # Datasets
//!
//! A small tool to discover datasets and to make lightweight copies of
//! them for local analyses. A dataset is any folder with a README file,
//! which starts with a YAML frontmatter block:
//!
//! ```yaml
//! ---
//! dataset: true
//! description: A short one-liner description of the dataset
//! ---
//! ```
//!
//! The README may be followed by anything else. Datasets can be nested;
//! the root datasets are read from the `datasets` key of the config
//! files (`datasets.yml`).
//!
//! A lightweight copy re-creates the folder structure of a dataset in
//! the current directory and links every file to its original location.
//! Only the README is written anew; it records the `source` of the copy
//! and the date it was made (`datecopied`).
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use cli::{Args, Command};
use config::Config;
use env_logger::Env;
use error::{DatasetError, DatasetResult};

mod cli;
mod commands;
mod config;
mod dataset;
mod error;
mod prelude;
mod progress;
mod readme;
mod utils;

/// Returns the config files to read; explicitly given files come last.
fn config_paths(args: &Args) -> Vec<PathBuf> {
    let mut paths = Config::default_paths();
    paths.extend(args.configs.iter().cloned());
    paths
}

fn run(args: Args) -> DatasetResult<()> {
    let paths = config_paths(&args);

    match args.cmd {
        Command::List(cmd) => cmd.execute(&config::load_roots(paths)?),
        Command::Copy(cmd) => cmd.execute(&config::load_roots(paths)?),
        Command::Create(cmd) => cmd.execute(),
        Command::Completions(cmd) => cmd.execute(),
    }
}

fn main() {
    env_logger::Builder::from_env(
        Env::new().filter_or("DATASETS_LOG", "warn"),
    )
    .format_timestamp(None)
    .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => process::exit(0),
        Err(DatasetError::IO(e)) if e.kind() == ErrorKind::BrokenPipe => {
            process::exit(0)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
