//! In-memory snapshot backend.
//!
//! Suitable for tests and for dry-runs over a captured tree. Directories are
//! implied by the file paths; a BTreeMap keeps listings sorted without extra
//! work.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::*;
use crate::tree::{Entry, EntryKind, TreeBackend};

pub struct MemoryTree {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

fn normalize(path: &Path) -> PathBuf {
    // Store every path in absolute form so "/a/b" and "a/b" agree.
    let mut normalized = PathBuf::from("/");
    for component in path.components() {
        if let Component::Normal(name) = component {
            normalized.push(name);
        }
    }
    normalized
}

impl MemoryTree {
    pub fn new() -> Self {
        MemoryTree {
            files: BTreeMap::new(),
        }
    }

    /// Builds a snapshot from (path, content) pairs.
    pub fn from_entries<P, B, I>(entries: I) -> Self
    where
        P: AsRef<Path>,
        B: AsRef<[u8]>,
        I: IntoIterator<Item = (P, B)>,
    {
        let mut tree = MemoryTree::new();
        for (path, content) in entries {
            tree.insert(path, content);
        }
        tree
    }

    pub fn insert<P: AsRef<Path>, B: AsRef<[u8]>>(&mut self, path: P, content: B) {
        self.files
            .insert(normalize(path.as_ref()), content.as_ref().to_vec());
    }

    fn is_implied_directory(&self, path: &Path) -> bool {
        let path = normalize(path);
        if path == Path::new("/") {
            return true;
        }
        self.files.keys().any(|file| file.starts_with(&path) && file != &path)
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TreeBackend for MemoryTree {
    async fn exists(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        self.files.contains_key(&normalized) || self.is_implied_directory(&normalized)
    }

    async fn is_directory(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        !self.files.contains_key(&normalized) && self.is_implied_directory(&normalized)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let normalized = normalize(path);
        if self.is_implied_directory(&normalized) {
            return Err(Error::not_a_file(path));
        }
        self.files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| Error::not_found(path))
    }

    async fn read_directory(&self, path: &Path) -> Result<Vec<Entry>> {
        let normalized = normalize(path);
        if self.files.contains_key(&normalized) {
            return Err(Error::not_a_directory(path));
        }
        if !self.is_implied_directory(&normalized) {
            return Err(Error::not_found(path));
        }

        // Children are the distinct next components below this directory.
        // BTreeMap iteration keeps them in lexicographic order.
        let mut entries: Vec<Entry> = Vec::new();
        for file in self.files.keys() {
            let Ok(rest) = file.strip_prefix(&normalized) else {
                continue;
            };
            let Some(Component::Normal(name)) = rest.components().next() else {
                continue;
            };
            let child = normalized.join(name);
            let kind = if child == *file {
                EntryKind::File
            } else {
                EntryKind::Directory
            };
            if entries.last().map(|e: &Entry| &e.path) != Some(&child) {
                entries.push(Entry { path: child, kind });
            }
        }
        Ok(entries)
    }
}
