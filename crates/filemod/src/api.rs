use std::path::{Path, PathBuf};
use std::sync::Arc;

use unifs::{Entry, UnifiedFileSystem};

use crate::error::Result;

/// What a lifecycle hook may do: read the virtual tree, use path
/// arithmetic, and reach the dependencies bag the embedder injected
/// (typically the AST or transform engine the plugin wants).
///
/// There is deliberately no write surface here.
pub struct ExecutorApi<D> {
    ufs: UnifiedFileSystem,
    deps: Arc<D>,
}

impl<D> ExecutorApi<D> {
    pub fn new(ufs: UnifiedFileSystem, deps: Arc<D>) -> Self {
        ExecutorApi { ufs, deps }
    }

    pub fn dependencies(&self) -> &D {
        &self.deps
    }

    pub async fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.ufs.exists(path).await
    }

    pub async fn is_directory<P: AsRef<Path>>(&self, path: P) -> bool {
        self.ufs.is_directory(path).await
    }

    pub async fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        Ok(self.ufs.read_file(path).await?)
    }

    pub async fn read_directory<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Entry>> {
        Ok(self.ufs.read_directory(path).await?)
    }

    // Path arithmetic, re-exposed so plugins need no unifs dependency.

    pub fn dirname<P: AsRef<Path>>(&self, path: P) -> Option<PathBuf> {
        unifs::path::dirname(path)
    }

    pub fn basename<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        unifs::path::basename(path)
    }

    pub fn join<P: AsRef<Path>, Q: AsRef<Path>>(&self, base: P, rest: Q) -> PathBuf {
        unifs::path::join(base, rest)
    }
}
