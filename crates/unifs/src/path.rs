//! Pure path arithmetic with no I/O.

use std::path::{Component, Path, PathBuf};

/// Strips the root component from a path, if present
pub fn strip_root<P: AsRef<Path>>(path: P) -> PathBuf {
    path.as_ref()
        .components()
        .skip_while(|c| matches!(c, Component::RootDir))
        .collect()
}

/// Extracts the final component of a path as a string, if possible
pub fn basename<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref().components().last().and_then(|c| match c {
        Component::Normal(name) => Some(name.to_string_lossy().to_string()),
        _ => None,
    })
}

/// Extracts the directory component of a path as a pathbuf, if possible
pub fn dirname<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    path.as_ref().parent().map(|x| x.to_path_buf())
}

/// Joins two path fragments
pub fn join<P: AsRef<Path>, Q: AsRef<Path>>(base: P, rest: Q) -> PathBuf {
    base.as_ref().join(rest)
}

/// Expresses `path` relative to `base`, if `base` is a prefix of it.
/// The root path relativized against itself is the empty path.
pub fn relativize<P: AsRef<Path>, Q: AsRef<Path>>(base: P, path: Q) -> Option<PathBuf> {
    path.as_ref()
        .strip_prefix(base.as_ref())
        .ok()
        .map(|p| p.to_path_buf())
}
