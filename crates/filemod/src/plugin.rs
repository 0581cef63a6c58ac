use std::path::Path;

use async_trait::async_trait;

use crate::api::ExecutorApi;
use crate::command::{DataCommand, FileCommand};
use crate::options::ArgumentRecord;

/// The plugin contract a transformation author implements.
///
/// `D` is the dependencies bag the embedder injects (AST engine, formatter,
/// whatever the plugin family needs); `State` is the one piece of mutable
/// context threaded through the run. The engine treats `State` as opaque:
/// it owns the value, hands it to the hooks by `&mut`, and never looks
/// inside.
///
/// The default hooks reproduce the trivial filemod: every matched path is
/// upserted and left unchanged, so a plugin that only wants `handle_data`
/// can skip `handle_file` entirely.
#[async_trait]
pub trait Filemod<D: Send + Sync>: Send + Sync {
    type State: Send;

    /// Glob patterns selecting which paths are visited.
    fn include_patterns(&self) -> Vec<String>;

    fn exclude_patterns(&self) -> Vec<String> {
        Vec::new()
    }

    /// Builds the mutable context for the run.
    async fn initialize_state(&self, options: &ArgumentRecord) -> anyhow::Result<Self::State>;

    /// Called once per matched path. May read (never write) through `api`.
    async fn handle_file(
        &self,
        _api: &ExecutorApi<D>,
        path: &Path,
        _options: &ArgumentRecord,
        _state: &mut Self::State,
    ) -> anyhow::Result<Vec<FileCommand>> {
        Ok(vec![FileCommand::UpsertFile {
            path: path.to_path_buf(),
        }])
    }

    /// Decides the new content for a path selected by `handle_file`.
    async fn handle_data(
        &self,
        _api: &ExecutorApi<D>,
        _path: &Path,
        _old_data: &[u8],
        _options: &ArgumentRecord,
        _state: &mut Self::State,
    ) -> anyhow::Result<DataCommand> {
        Ok(DataCommand::Noop)
    }
}
