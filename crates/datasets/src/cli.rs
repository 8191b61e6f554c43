use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;

/// datasets is a simple utility for discovering datasets and making
/// lightweight copies to use in analyses.
///
/// A dataset is any folder with a README file, which starts with a
/// YAML frontmatter block declaring `dataset: true` (and optionally a
/// short `description`). Datasets can be nested; the root datasets are
/// listed in the `datasets` key of a `datasets.yml` config file.
#[derive(Debug, Parser)]
#[command(version, about, long_about, max_term_width = 72)]
pub(crate) struct Args {
    /// Read root datasets from `filename` in addition to the default
    /// config files (next to the executable, `/etc/datasets.yml`,
    /// `~/.datasets.yml` and `./datasets.yml`).
    #[clap(
        short,
        long = "config",
        value_name = "filename",
        env = "DATASETS_CONFIG",
        value_delimiter = ':',
        hide_env_values = true
    )]
    pub(crate) configs: Vec<PathBuf>,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    List(List),
    #[clap(alias = "get")]
    Copy(Copy),
    Create(Create),
    Completions(Completions),
}
