use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use diagnostics::{debug, info};
use unifs::{GlobSet, UnifiedFileSystem};

use crate::api::ExecutorApi;
use crate::command::{Command, DataCommand, FileCommand};
use crate::error::{FilemodError, Result};
use crate::options::ArgumentRecord;
use crate::plugin::Filemod;

/// The run's speculative view of one path. Nothing here touches storage;
/// it only lets later hooks observe what earlier commands proposed.
#[derive(Debug, Clone)]
enum Overlay {
    Changed(Vec<u8>),
    Deleted,
}

/// Drives a [`Filemod`] over a virtual tree and accumulates the ordered
/// list of proposed commands.
pub struct FilemodExecutor<D> {
    ufs: UnifiedFileSystem,
    deps: Arc<D>,
}

impl<D: Send + Sync> FilemodExecutor<D> {
    pub fn new(ufs: UnifiedFileSystem, deps: Arc<D>) -> Self {
        FilemodExecutor { ufs, deps }
    }

    /// Computes the proposed command list for one run.
    ///
    /// Matched paths are visited in lexicographic depth-first pre-order, and
    /// the pass is sequential, so identical inputs always yield an identical
    /// ordered command list. Any hook failure aborts the run; no partial
    /// list is ever returned.
    pub async fn execute<F: Filemod<D>>(
        &self,
        filemod: &F,
        target: &Path,
        options: &ArgumentRecord,
    ) -> Result<Vec<Command>> {
        let includes = filemod.include_patterns();
        let excludes = filemod.exclude_patterns();
        let globs = GlobSet::new(&includes, &excludes)
            .map_err(|e| FilemodError::configuration(e.to_string()))?;

        let paths = self.ufs.collect_matches(target, &globs).await?;
        info!(
            "filemod run over {target} matched {count} paths",
            target: target.display().to_string(),
            count: paths.len(),
        );

        let api = ExecutorApi::new(self.ufs.clone(), self.deps.clone());
        let mut state = filemod
            .initialize_state(options)
            .await
            .map_err(|e| FilemodError::handler(target, e))?;

        let mut overlay: HashMap<PathBuf, Overlay> = HashMap::new();
        let mut commands = Vec::new();

        for path in &paths {
            let file_commands = filemod
                .handle_file(&api, path, options, &mut state)
                .await
                .map_err(|e| FilemodError::handler(path, e))?;
            debug!(
                "handle_file at {path} proposed {count} commands",
                path: path.display().to_string(),
                count: file_commands.len(),
            );

            for file_command in file_commands {
                match file_command {
                    FileCommand::UpsertFile { path: upsert_path } => {
                        let old_data = self.current_data(&overlay, &upsert_path).await?;
                        let existed = self.backing_file_exists(&upsert_path).await;

                        let data_command = filemod
                            .handle_data(&api, &upsert_path, &old_data, options, &mut state)
                            .await
                            .map_err(|e| FilemodError::handler(&upsert_path, e))?;

                        if let DataCommand::UpsertData(data) = data_command {
                            overlay.insert(upsert_path.clone(), Overlay::Changed(data.clone()));
                            commands.push(if existed {
                                Command::UpsertData {
                                    path: upsert_path,
                                    data,
                                }
                            } else {
                                Command::UpsertFile {
                                    path: upsert_path,
                                    data,
                                }
                            });
                        }
                    }
                    FileCommand::DeleteFile { path: delete_path } => {
                        overlay.insert(delete_path.clone(), Overlay::Deleted);
                        commands.push(Command::DeleteFile { path: delete_path });
                    }
                    FileCommand::MoveFile { old_path, new_path } => {
                        let data = self.current_data(&overlay, &old_path).await?;
                        overlay.insert(old_path.clone(), Overlay::Deleted);
                        overlay.insert(new_path.clone(), Overlay::Changed(data));
                        commands.push(Command::MoveFile { old_path, new_path });
                    }
                    FileCommand::CopyFile { old_path, new_path } => {
                        let data = self.current_data(&overlay, &old_path).await?;
                        overlay.insert(new_path.clone(), Overlay::Changed(data));
                        commands.push(Command::CopyFile { old_path, new_path });
                    }
                }
            }
        }

        info!("filemod run proposed {count} commands", count: commands.len());
        Ok(commands)
    }

    /// What the run currently believes a path holds: the speculative overlay
    /// first, the backing tree second, empty for absent (or deleted) paths.
    async fn current_data(
        &self,
        overlay: &HashMap<PathBuf, Overlay>,
        path: &Path,
    ) -> Result<Vec<u8>> {
        match overlay.get(path) {
            Some(Overlay::Changed(data)) => Ok(data.clone()),
            Some(Overlay::Deleted) => Ok(Vec::new()),
            None => match self.ufs.read_file(path).await {
                Ok(data) => Ok(data),
                Err(unifs::Error::NotFound(_)) | Err(unifs::Error::NotAFile(_)) => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            },
        }
    }

    async fn backing_file_exists(&self, path: &Path) -> bool {
        self.ufs.exists(path).await && !self.ufs.is_directory(path).await
    }
}
