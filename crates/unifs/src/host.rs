//! Read-only view of a real directory on the host filesystem.
//!
//! Virtual paths are absolute ("/src/lib.rs") and resolve beneath the mount
//! root, so the same filemod sees the same tree whether it runs over a host
//! mount or a memory snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::*;
use crate::path::strip_root;
use crate::tree::{Entry, EntryKind, TreeBackend};

pub struct HostTree {
    root: PathBuf,
}

impl HostTree {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        HostTree {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(strip_root(path))
    }

    fn virtualize(&self, path: &Path, host_path: &Path) -> PathBuf {
        match host_path.strip_prefix(&self.root) {
            Ok(rest) => Path::new("/").join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl TreeBackend for HostTree {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(self.resolve(path)).await.is_ok()
    }

    async fn is_directory(&self, path: &Path) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let host_path = self.resolve(path);
        let meta = tokio::fs::metadata(&host_path)
            .await
            .map_err(|e| Error::io(path, e))?;
        if meta.is_dir() {
            return Err(Error::not_a_file(path));
        }
        tokio::fs::read(&host_path)
            .await
            .map_err(|e| Error::io(path, e))
    }

    async fn read_directory(&self, path: &Path) -> Result<Vec<Entry>> {
        let host_path = self.resolve(path);
        let meta = tokio::fs::metadata(&host_path)
            .await
            .map_err(|e| Error::io(path, e))?;
        if !meta.is_dir() {
            return Err(Error::not_a_directory(path));
        }

        let mut reader = tokio::fs::read_dir(&host_path)
            .await
            .map_err(|e| Error::io(path, e))?;
        let mut entries = Vec::new();
        while let Some(dirent) = reader.next_entry().await.map_err(|e| Error::io(path, e))? {
            // Follows symlinks; a dangling link is skipped rather than failing
            // the whole listing.
            let Ok(meta) = tokio::fs::metadata(dirent.path()).await else {
                continue;
            };
            let kind = if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(Entry {
                path: self.virtualize(path, &dirent.path()),
                kind,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_host_tree_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/lib.rs"), "pub fn f() {}").unwrap();
        std::fs::write(tmp.path().join("README.md"), "# hi").unwrap();

        let tree = HostTree::new(tmp.path());
        assert!(tree.exists(Path::new("/src/lib.rs")).await);
        assert!(tree.is_directory(Path::new("/src")).await);
        assert_eq!(
            tree.read_file(Path::new("/src/lib.rs")).await.unwrap(),
            b"pub fn f() {}"
        );

        let entries = tree.read_directory(Path::new("/")).await.unwrap();
        assert_eq!(
            entries,
            vec![Entry::file("/README.md"), Entry::directory("/src")]
        );
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = HostTree::new(tmp.path());
        assert_eq!(
            tree.read_file(Path::new("/nope.txt")).await,
            Err(Error::not_found("/nope.txt"))
        );
    }
}
