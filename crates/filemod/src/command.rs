//! The command model: what a run proposes, never what it performs.

use std::path::PathBuf;

/// Returned by `handle_file`: which paths the filemod wants touched.
/// Data payloads are decided later by `handle_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    UpsertFile { path: PathBuf },
    DeleteFile { path: PathBuf },
    MoveFile { old_path: PathBuf, new_path: PathBuf },
    CopyFile { old_path: PathBuf, new_path: PathBuf },
}

/// Returned by `handle_data`: the final payload for one upserted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataCommand {
    UpsertData(Vec<u8>),
    Noop,
}

/// One fully-resolved proposed file operation.
///
/// `UpsertFile` creates a path that the backing tree does not have;
/// `UpsertData` rewrites one it does. The executor emits these as pure data:
/// nothing in the engine ever applies them to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    UpsertFile { path: PathBuf, data: Vec<u8> },
    UpsertData { path: PathBuf, data: Vec<u8> },
    DeleteFile { path: PathBuf },
    MoveFile { old_path: PathBuf, new_path: PathBuf },
    CopyFile { old_path: PathBuf, new_path: PathBuf },
    Noop,
}

impl Command {
    /// The path a consumer would report this command against.
    pub fn primary_path(&self) -> Option<&PathBuf> {
        match self {
            Command::UpsertFile { path, .. }
            | Command::UpsertData { path, .. }
            | Command::DeleteFile { path } => Some(path),
            Command::MoveFile { old_path, .. } | Command::CopyFile { old_path, .. } => {
                Some(old_path)
            }
            Command::Noop => None,
        }
    }
}
