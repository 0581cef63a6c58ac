//! The built-in suffix-rename filemod used by `codemill run`.

use std::path::Path;

use async_trait::async_trait;
use filemod::{ArgumentRecord, ExecutorApi, FileCommand, Filemod};

/// Renames every file ending in `from` so that it ends in `to` instead.
/// A pure rename: file contents are never touched.
pub struct SuffixRenameFilemod {
    from: String,
    to: String,
}

impl SuffixRenameFilemod {
    pub fn new<S: Into<String>, T: Into<String>>(from: S, to: T) -> Self {
        SuffixRenameFilemod {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[async_trait]
impl Filemod<()> for SuffixRenameFilemod {
    type State = ();

    fn include_patterns(&self) -> Vec<String> {
        vec![format!("**/*{}", self.from)]
    }

    async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<()> {
        Ok(())
    }

    async fn handle_file(
        &self,
        api: &ExecutorApi<()>,
        path: &Path,
        _options: &ArgumentRecord,
        _state: &mut Self::State,
    ) -> anyhow::Result<Vec<FileCommand>> {
        let Some(name) = api.basename(path) else {
            return Ok(vec![]);
        };
        let Some(stem) = name.strip_suffix(&self.from) else {
            return Ok(vec![]);
        };
        let new_name = format!("{stem}{}", self.to);
        Ok(vec![FileCommand::MoveFile {
            old_path: path.to_path_buf(),
            new_path: path.with_file_name(new_name),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use filemod::{Command, FilemodExecutor};
    use unifs::{MemoryTree, UnifiedFileSystem};

    #[tokio::test]
    async fn test_renames_matching_suffixes_only() {
        let tree = MemoryTree::from_entries([
            ("/docs/a.txt", "a"),
            ("/docs/deep/b.txt", "b"),
            ("/docs/keep.md", "m"),
        ]);
        let executor = FilemodExecutor::new(UnifiedFileSystem::new(tree), Arc::new(()));
        let filemod = SuffixRenameFilemod::new(".txt", ".md");

        let commands = executor
            .execute(&filemod, Path::new("/docs"), &ArgumentRecord::new())
            .await
            .unwrap();

        assert_eq!(
            commands,
            vec![
                Command::MoveFile {
                    old_path: PathBuf::from("/docs/a.txt"),
                    new_path: PathBuf::from("/docs/a.md"),
                },
                Command::MoveFile {
                    old_path: PathBuf::from("/docs/deep/b.txt"),
                    new_path: PathBuf::from("/docs/deep/b.md"),
                },
            ]
        );
    }
}
