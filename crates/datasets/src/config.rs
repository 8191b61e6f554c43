use std::collections::BTreeSet;
use std::path::{self, Path, PathBuf};
use std::{env, fs};

use directories::BaseDirs;
use log::debug;
use serde::Deserialize;

use crate::dataset::{retain_valid, Dataset};
use crate::error::DatasetResult;

/// A `datasets` config file.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    /// The locations of the root datasets.
    #[serde(default)]
    pub(crate) datasets: Vec<PathBuf>,
}

impl Config {
    pub(crate) const FILENAME: &'static str = "datasets.yml";

    /// Loads a config from a path. Only the first YAML document of the
    /// file is read; an empty file yields the default config.
    pub(crate) fn from_path<P>(path: P) -> DatasetResult<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config = match serde_yaml::Deserializer::from_str(&content).next()
        {
            Some(document) => Self::deserialize(document)?,
            None => Self::default(),
        };

        Ok(config)
    }

    /// Returns the default config locations in order of priority: next
    /// to the executable, system-wide, per user and in the current
    /// directory.
    pub(crate) fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Some(dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            paths.push(dir.join(Self::FILENAME));
        }

        paths.push(PathBuf::from("/etc").join(Self::FILENAME));

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.home_dir().join(".datasets.yml"));
        }

        paths.push(PathBuf::from(".").join(Self::FILENAME));
        paths
    }
}

/// Reads every existing config in `paths` and returns the union of the
/// configured root datasets. Missing config files and entries, which
/// are not datasets, are skipped.
pub(crate) fn load_roots<I, P>(paths: I) -> DatasetResult<Vec<Dataset>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut roots = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            continue;
        }

        debug!("read config {}", path.display());
        let config = Config::from_path(path)?;
        for root in config.datasets {
            roots.insert(path::absolute(root)?);
        }
    }

    retain_valid(roots.into_iter().map(Dataset::from_path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::dataset::tests::{make_dataset, TestResult};

    #[test]
    fn config_first_document_only() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("datasets.yml");
        fs::write(
            &path,
            "---\ndatasets:\n  - /data/alpha\n---\ndatasets:\n  - /data/beta\n",
        )?;

        let config = Config::from_path(&path)?;
        assert_eq!(config.datasets, vec![PathBuf::from("/data/alpha")]);
        Ok(())
    }

    #[test]
    fn config_empty() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("datasets.yml");
        fs::write(&path, "")?;

        assert!(Config::from_path(&path)?.datasets.is_empty());

        fs::write(&path, "other: 1\n")?;
        assert!(Config::from_path(&path)?.datasets.is_empty());
        Ok(())
    }

    #[test]
    fn config_default_paths() {
        let paths = Config::default_paths();
        assert!(paths.contains(&PathBuf::from("/etc/datasets.yml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("./datasets.yml")));
    }

    #[test]
    fn load_roots_merge() -> TestResult {
        let tmp = TempDir::new()?;
        let alpha = tmp.path().join("alpha");
        let beta = tmp.path().join("beta");
        let gamma = tmp.path().join("gamma");
        make_dataset(&alpha, "Alpha set")?;
        make_dataset(&beta, "Beta set")?;
        fs::create_dir(&gamma)?;

        let first = tmp.path().join("first.yml");
        fs::write(
            &first,
            format!(
                "datasets:\n  - {}\n  - {}\n",
                alpha.display(),
                gamma.display()
            ),
        )?;

        let second = tmp.path().join("second.yml");
        fs::write(
            &second,
            format!(
                "datasets:\n  - {}\n  - {}\n",
                beta.display(),
                alpha.display()
            ),
        )?;

        let roots = load_roots([
            tmp.path().join("missing.yml"),
            first,
            second,
            tmp.path().join("missing/datasets.yml"),
        ])?;

        let names: Vec<_> = roots.iter().map(Dataset::name).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        Ok(())
    }

    #[test]
    fn load_roots_nothing() -> TestResult {
        let tmp = TempDir::new()?;
        let roots = load_roots([tmp.path().join("missing.yml")])?;
        assert!(roots.is_empty());
        Ok(())
    }
}
