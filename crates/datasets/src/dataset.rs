use std::fs;
use std::path::{self, Component, Path, PathBuf};

use log::debug;

use crate::error::{DatasetError, DatasetResult};
use crate::readme::Readme;
use crate::utils::{relpath, strip_cur_dir};

/// A directory whose README starts with a frontmatter block declaring
/// `dataset: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Dataset {
    /// The (absolute) root directory of the dataset.
    path: PathBuf,

    /// The directory the name is computed against.
    base_dir: PathBuf,

    /// The path relative to the base directory.
    name: String,

    /// A short blurb about the dataset.
    description: String,
}

impl Dataset {
    pub(crate) const README: &'static str = "README";

    /// Opens the dataset at `path`; the name is relative to the parent
    /// directory.
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let path = path::absolute(path)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.clone());

        Self::with_base_dir(path, base_dir)
    }

    /// Opens the dataset at `path`; the name is relative to `base_dir`.
    ///
    /// This function fails with [DatasetError::InvalidDataset], if the
    /// directory has no README or the README's frontmatter doesn't
    /// declare `dataset: true`.
    pub(crate) fn with_base_dir<P1, P2>(
        path: P1,
        base_dir: P2,
    ) -> DatasetResult<Self>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let path = path::absolute(path)?;
        let base_dir = path::absolute(base_dir)?;
        let readme = path.join(Self::README);

        if !readme.is_file() {
            return Err(DatasetError::invalid(format!(
                "invalid dataset {}: does not contain a README file.",
                path.display()
            )));
        }

        let frontmatter = Readme::from_path(&readme)
            .and_then(|readme| readme.frontmatter())
            .map_err(|e| match e {
                DatasetError::InvalidDataset(msg) => DatasetError::invalid(
                    format!("invalid dataset {}: {msg}", path.display()),
                ),
                e => e,
            })?;

        if !frontmatter.is_dataset() {
            return Err(DatasetError::invalid(format!(
                "invalid dataset {}: expected README YAML frontmatter \
                    to have 'dataset: true'.",
                path.display()
            )));
        }

        let name = relpath(&path, &base_dir)?;

        Ok(Self {
            path,
            base_dir,
            name,
            description: frontmatter.description(),
        })
    }

    /// Returns the root directory of the dataset.
    #[inline]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    /// Returns the immediate child directories, which are datasets
    /// themselves, sorted by name. Children share the base directory
    /// of `self`; invalid ones are skipped.
    pub(crate) fn subdatasets(&self) -> DatasetResult<Vec<Dataset>> {
        let mut dirs = vec![];
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }

        dirs.sort();

        retain_valid(
            dirs.into_iter()
                .map(|dir| Dataset::with_base_dir(dir, &self.base_dir)),
        )
    }
}

/// Keeps the successfully opened datasets and drops those, which
/// failed with [DatasetError::InvalidDataset]. Every other error is
/// passed on.
pub(crate) fn retain_valid<I>(results: I) -> DatasetResult<Vec<Dataset>>
where
    I: IntoIterator<Item = DatasetResult<Dataset>>,
{
    let mut datasets = vec![];
    for result in results {
        match result {
            Ok(dataset) => datasets.push(dataset),
            Err(DatasetError::InvalidDataset(msg)) => {
                debug!("skip {msg}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(datasets)
}

/// Resolves a dataset reference against the known root datasets.
///
/// Absolute references are opened directly. A relative reference
/// `root/sub/subsub` is looked up below the root dataset named `root`;
/// the resulting name equals the reference.
pub(crate) fn resolve(
    reference: &str,
    roots: &[Dataset],
) -> DatasetResult<Dataset> {
    let path = Path::new(reference);
    if path.is_absolute() {
        return Dataset::from_path(path);
    }

    let rel = strip_cur_dir(path);
    let head = match rel.components().next() {
        Some(Component::Normal(head)) => head,
        _ => {
            return Err(DatasetError::invalid(format!(
                "{reference} is not a dataset"
            )));
        }
    };

    for root in roots {
        if root.path().file_name() == Some(head) {
            let base_dir = root.path().parent().unwrap_or(root.path());
            return Dataset::with_base_dir(base_dir.join(&rel), base_dir);
        }
    }

    Err(DatasetError::invalid(format!("{reference} is not a dataset")))
}
