use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::{env, fs};

use chrono::{Local, SecondsFormat};
use clap::Parser;
use log::{debug, warn};

use crate::prelude::*;
use crate::utils::{realpath, symlink};

const PBAR_COPY: &str = "Copying {msg}: {pos}/{len} ({percent}%) | \
        elapsed: {elapsed_precise}";

/// Make a lightweight copy of a dataset in the current directory.
///
/// The folder structure of the dataset is re-created and every file is
/// linked (symbolic link) to its original location, except for the
/// README, which gets the `source` and `datecopied` keys added to its
/// frontmatter.
#[derive(Debug, Default, Parser)]
pub(crate) struct Copy {
    /// Show what would happen, without touching the file system.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Overwrite existing copies. This option is accepted, but not
    /// supported yet; an existing copy is never touched.
    #[arg(long)]
    clobber: bool,

    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// The datasets to copy, given by absolute path or by name.
    #[arg(value_name = "dataset", required = true)]
    datasets: Vec<String>,
}

/// A single step of a lightweight copy.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    CreateDir(PathBuf),
    Link { original: PathBuf, link: PathBuf },
    WriteReadme { source: PathBuf, target: PathBuf },
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir(path) => write!(f, "mkdir {}", path.display()),
            Self::Link { original, link } => {
                write!(f, "ln -s {} {}", original.display(), link.display())
            }
            Self::WriteReadme { target, .. } => {
                write!(f, "write {}", target.display())
            }
        }
    }
}

/// Collects the steps to mirror the directory `src` into `dst`. The
/// walk is top-down and sorted by file name, so that every directory
/// is created before anything is placed into it.
fn walk(
    src: &Path,
    dst: &Path,
    top: bool,
    actions: &mut Vec<Action>,
) -> DatasetResult<()> {
    let mut entries = fs::read_dir(src)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let target = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            actions.push(Action::CreateDir(target.clone()));
            walk(&path, &target, false, actions)?;
        } else if top && entry.file_name() == Dataset::README {
            actions.push(Action::WriteReadme {
                source: path,
                target,
            });
        } else {
            actions.push(Action::Link {
                original: realpath(&path)?,
                link: target,
            });
        }
    }

    Ok(())
}

fn plan(dataset: &Dataset, target: &Path) -> DatasetResult<Vec<Action>> {
    let mut actions = vec![];
    walk(dataset.path(), target, true, &mut actions)?;
    Ok(actions)
}

fn apply(
    action: &Action,
    dataset: &Dataset,
    copied_at: &str,
) -> DatasetResult<()> {
    match action {
        Action::CreateDir(path) => fs::create_dir(path)?,
        Action::Link { original, link } => symlink(original, link)?,
        Action::WriteReadme { source, target } => {
            let mut readme = Readme::from_path(source)?;
            readme.insert(
                "source",
                dataset.path().to_string_lossy().into_owned(),
            );
            readme.insert("datecopied", copied_at);
            readme.save(target)?;
        }
    }

    Ok(())
}

/// Creates a lightweight copy of `dataset` below `dest_dir` and returns
/// the location of the copy.
///
/// This function fails, if the target directory already exists. If a
/// later step fails, the incomplete copy is removed again, including
/// the parent directories created for it.
fn copy_dataset(
    dataset: &Dataset,
    dest_dir: &Path,
    copied_at: &str,
    quiet: bool,
) -> DatasetResult<PathBuf> {
    let target = dest_dir.join(dataset.name());
    if fs::symlink_metadata(&target).is_ok() {
        bail!("destination '{}' already exists", target.display());
    }

    let actions = plan(dataset, &target)?;

    // The topmost directory this copy creates; removed again on error.
    let created = target
        .ancestors()
        .take_while(|dir| fs::symlink_metadata(dir).is_err())
        .last()
        .unwrap_or(target.as_path())
        .to_path_buf();

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::create_dir(&target)?;

    let pbar = ProgressBarBuilder::new(PBAR_COPY, quiet)
        .len(actions.len() as u64)
        .build();
    pbar.set_message(dataset.name().to_string());

    let result = actions.iter().try_for_each(|action| {
        debug!("{action}");
        apply(action, dataset, copied_at)?;
        pbar.inc(1);
        Ok::<_, DatasetError>(())
    });

    pbar.finish_and_clear();

    if let Err(e) = result {
        warn!("remove incomplete copy {}", created.display());
        if let Err(e) = fs::remove_dir_all(&created) {
            warn!("unable to remove {}: {e}", created.display());
        }

        return Err(e);
    }

    Ok(target)
}

impl Copy {
    pub(crate) fn execute(self, roots: &[Dataset]) -> DatasetResult<()> {
        if self.clobber {
            warn!("--clobber is not supported; existing copies are kept");
        }

        let datasets = self
            .datasets
            .iter()
            .map(|reference| resolve(reference, roots))
            .collect::<DatasetResult<Vec<_>>>()?;

        let dest_dir = env::current_dir()?;
        let copied_at =
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);

        for dataset in datasets.iter() {
            if self.dry_run {
                let target = dest_dir.join(dataset.name());
                println!("{}", Action::CreateDir(target.clone()));
                for action in plan(dataset, &target)? {
                    println!("{action}");
                }

                continue;
            }

            let target =
                copy_dataset(dataset, &dest_dir, &copied_at, self.quiet)?;

            if self.verbose {
                eprintln!(
                    "Created lightweight copy of '{}' in {}.",
                    dataset.name(),
                    target.display()
                );
            }
        }

        Ok(())
    }
}
