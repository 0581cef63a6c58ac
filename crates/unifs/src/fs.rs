use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use diagnostics::debug;

use crate::error::*;
use crate::glob::GlobSet;
use crate::tree::{Entry, TreeBackend};

/// The unified, read-only view over some backing storage.
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct UnifiedFileSystem {
    backend: Arc<dyn TreeBackend>,
}

impl UnifiedFileSystem {
    pub fn new<B: TreeBackend + 'static>(backend: B) -> Self {
        UnifiedFileSystem {
            backend: Arc::new(backend),
        }
    }

    pub async fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.backend.exists(path.as_ref()).await
    }

    pub async fn is_directory<P: AsRef<Path>>(&self, path: P) -> bool {
        self.backend.is_directory(path.as_ref()).await
    }

    pub async fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        self.backend.read_file(path.as_ref()).await
    }

    pub async fn read_directory<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Entry>> {
        self.backend.read_directory(path.as_ref()).await
    }

    /// Collects every file beneath `root` selected by the glob set, in
    /// lexicographic depth-first pre-order. Matching is against the path
    /// relative to `root`, so "**/*.json" works regardless of where the
    /// target is mounted.
    pub async fn collect_matches<P: AsRef<Path>>(
        &self,
        root: P,
        globs: &GlobSet,
    ) -> Result<Vec<PathBuf>> {
        let root = root.as_ref().to_path_buf();
        let mut matched = Vec::new();

        if !self.is_directory(&root).await {
            // A single-file target is tested against the globs by name.
            let base = root.parent().map(|p| p.to_path_buf()).unwrap_or_default();
            if self.exists(&root).await && globs.matches(relative_to(&base, &root)) {
                matched.push(root);
            }
            return Ok(matched);
        }

        self.walk(&root, root.clone(), globs, &mut matched).await?;
        debug!(
            "collect_matches found {count} paths under {root}",
            count: matched.len(),
            root: root.display().to_string(),
        );
        Ok(matched)
    }

    fn walk<'a>(
        &'a self,
        root: &'a Path,
        dir: PathBuf,
        globs: &'a GlobSet,
        matched: &'a mut Vec<PathBuf>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            for entry in self.read_directory(&dir).await? {
                if entry.is_directory() {
                    self.walk(root, entry.path, globs, matched).await?;
                } else if globs.matches(relative_to(root, &entry.path)) {
                    matched.push(entry.path);
                }
            }
            Ok(())
        })
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    crate::path::relativize(root, path).unwrap_or_else(|| path.to_path_buf())
}

impl std::fmt::Debug for UnifiedFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnifiedFileSystem{{}}")
    }
}
