//! Command → Job encoding: from one run's absolute paths to a recording
//! that replays anywhere.

use std::path::{Path, PathBuf};

use filemod::Command;

use crate::digest::HashDigest;
use crate::job::{Job, JobOp};

/// Expresses a tree path as a target-root-relative URI. Paths outside the
/// target root keep their full (root-stripped) form; a relocated replay of
/// such a job is on its own, but the information is preserved.
fn tree_uri(target_root: &Path, path: &Path) -> String {
    let relative = unifs::path::relativize(target_root, path)
        .unwrap_or_else(|| unifs::path::strip_root(path));
    relative.to_string_lossy().into_owned()
}

/// Where a job's payload bytes live under the case output root.
fn data_uri(job_hash: &HashDigest) -> String {
    format!("data/{}", job_hash.to_hex())
}

/// Encodes one proposed command as a storage-agnostic job.
///
/// Total over every command variant; each variant maps to its own job code,
/// with `Noop` becoming `Nothing`. Payload bytes are not embedded: jobs
/// carry a `data/` URI, and [`materialize_payload`] puts the bytes there.
pub fn encode_command(target_root: &Path, command: &Command) -> Job {
    let hash_digest = HashDigest::random();
    let op = match command {
        Command::UpsertFile { path, .. } => JobOp::CreateFile {
            path: tree_uri(target_root, path),
            data: data_uri(&hash_digest),
        },
        Command::UpsertData { path, .. } => JobOp::UpdateFile {
            path: tree_uri(target_root, path),
            new_data: data_uri(&hash_digest),
        },
        Command::DeleteFile { path } => JobOp::DeleteFile {
            path: tree_uri(target_root, path),
        },
        Command::MoveFile { old_path, new_path } => JobOp::MoveFile {
            old_path: tree_uri(target_root, old_path),
            new_path: tree_uri(target_root, new_path),
        },
        Command::CopyFile { old_path, new_path } => JobOp::CopyFile {
            source: tree_uri(target_root, old_path),
            target: tree_uri(target_root, new_path),
        },
        Command::Noop => JobOp::Nothing,
    };
    Job { hash_digest, op }
}

/// Writes a command's payload bytes under `output_root` at the job's data
/// URI. Only upserts carry a payload; other commands return `None`.
pub async fn materialize_payload(
    output_root: &Path,
    job: &Job,
    command: &Command,
) -> std::io::Result<Option<PathBuf>> {
    let (uri, data) = match (&job.op, command) {
        (JobOp::CreateFile { data: uri, .. }, Command::UpsertFile { data, .. })
        | (JobOp::UpdateFile { new_data: uri, .. }, Command::UpsertData { data, .. }) => {
            (uri, data)
        }
        _ => return Ok(None),
    };
    let path = output_root.join(uri);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, data).await?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::CODE_NOTHING;

    fn root() -> &'static Path {
        Path::new("/opt/project")
    }

    #[test]
    fn test_every_command_variant_encodes() {
        let commands = vec![
            Command::UpsertFile {
                path: "/opt/project/new.txt".into(),
                data: b"x".to_vec(),
            },
            Command::UpsertData {
                path: "/opt/project/src/lib.rs".into(),
                data: b"y".to_vec(),
            },
            Command::DeleteFile {
                path: "/opt/project/gone.txt".into(),
            },
            Command::MoveFile {
                old_path: "/opt/project/a".into(),
                new_path: "/opt/project/b".into(),
            },
            Command::CopyFile {
                old_path: "/opt/project/a".into(),
                new_path: "/opt/project/c".into(),
            },
            Command::Noop,
        ];

        let mut codes: Vec<u8> = commands
            .iter()
            .map(|c| encode_command(root(), c).op.code())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        // Injective: six variants, six distinct codes.
        assert_eq!(codes.len(), commands.len());
    }

    #[test]
    fn test_paths_are_rerooted() {
        let job = encode_command(
            root(),
            &Command::UpsertData {
                path: "/opt/project/src/lib.rs".into(),
                data: b"z".to_vec(),
            },
        );
        match &job.op {
            JobOp::UpdateFile { path, new_data } => {
                assert_eq!(path, "src/lib.rs");
                assert_eq!(new_data, &format!("data/{}", job.hash_digest.to_hex()));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_noop_is_nothing() {
        assert_eq!(encode_command(root(), &Command::Noop).op.code(), CODE_NOTHING);
    }

    #[tokio::test]
    async fn test_materialize_writes_payload_at_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::UpsertFile {
            path: "/opt/project/new.txt".into(),
            data: b"payload".to_vec(),
        };
        let job = encode_command(root(), &command);

        let written = materialize_payload(dir.path(), &job, &command)
            .await
            .unwrap()
            .expect("upserts carry payloads");
        assert_eq!(
            written,
            dir.path().join(format!("data/{}", job.hash_digest.to_hex()))
        );
        assert_eq!(std::fs::read(&written).unwrap(), b"payload");

        let delete = Command::DeleteFile {
            path: "/opt/project/gone".into(),
        };
        let job = encode_command(root(), &delete);
        assert_eq!(materialize_payload(dir.path(), &job, &delete).await.unwrap(), None);
    }
}
