use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// What a directory entry is, without reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Entry {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory<P: Into<PathBuf>>(path: P) -> Self {
        Entry {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// The storage backend of a unified filesystem view.
///
/// Implementations are lazy: nothing walks the whole tree up front, and
/// `read_file` fetches content on demand. Listings are sorted by name so
/// traversal order is a property of the view, not of the backing store.
#[async_trait]
pub trait TreeBackend: Send + Sync {
    async fn exists(&self, path: &std::path::Path) -> bool;

    async fn is_directory(&self, path: &std::path::Path) -> bool;

    /// Reads file content. A missing path is `Error::NotFound`, which is
    /// distinct from an empty file.
    async fn read_file(&self, path: &std::path::Path) -> Result<Vec<u8>>;

    /// Lists the immediate children of a directory, sorted by name.
    async fn read_directory(&self, path: &std::path::Path) -> Result<Vec<Entry>>;
}
