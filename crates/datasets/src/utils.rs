use std::path::{Component, Path, PathBuf};
use std::{fs, io};

use crate::error::{DatasetError, DatasetResult};

/// Returns `path` relative to `prefix` as a string.
#[inline]
pub(crate) fn relpath<P1, P2>(path: P1, prefix: P2) -> DatasetResult<String>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let path = path.as_ref();
    let prefix = prefix.as_ref();

    path.strip_prefix(prefix)
        .map(|rel| rel.to_string_lossy().into_owned())
        .map_err(|_| {
            DatasetError::Other(format!(
                "{} is not located below {}",
                path.display(),
                prefix.display()
            ))
        })
}

/// Drops `.` components, so that `./foo/./bar` becomes `foo/bar`.
pub(crate) fn strip_cur_dir<P: AsRef<Path>>(path: P) -> PathBuf {
    path.as_ref()
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Returns the canonical, absolute form of `path`. A dangling symbolic
/// link is resolved one level, against its canonical parent directory.
pub(crate) fn realpath<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let path = path.as_ref();
    match fs::canonicalize(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let target = fs::read_link(path)?;
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };

            Ok(fs::canonicalize(parent)?.join(target))
        }
        result => result,
    }
}

#[cfg(unix)]
#[inline]
pub(crate) fn symlink<P: AsRef<Path>, Q: AsRef<Path>>(
    original: P,
    link: Q,
) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
pub(crate) fn symlink<P: AsRef<Path>, Q: AsRef<Path>>(
    original: P,
    link: Q,
) -> std::io::Result<()> {
    if original.as_ref().is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}
