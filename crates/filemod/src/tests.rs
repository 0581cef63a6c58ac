use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::ExecutorApi;
use crate::command::{Command, DataCommand, FileCommand};
use crate::error::FilemodError;
use crate::executor::FilemodExecutor;
use crate::options::ArgumentRecord;
use crate::plugin::Filemod;

use unifs::{MemoryTree, UnifiedFileSystem};

/// No dependencies bag needed by these plugins.
type NoDeps = ();

fn executor(tree: MemoryTree) -> FilemodExecutor<NoDeps> {
    FilemodExecutor::new(UnifiedFileSystem::new(tree), Arc::new(()))
}

fn options_from(pairs: &[(&str, &str)]) -> ArgumentRecord {
    let mut record = ArgumentRecord::new();
    for (k, v) in pairs {
        record.insert(k.to_string(), Value::String(v.to_string()));
    }
    record
}

/// Rewrites sibling "c.json" whenever it sees "b.json": any option key
/// present in c.json's object replaces that entry's value.
struct JsonMergeFilemod;

#[async_trait]
impl Filemod<NoDeps> for JsonMergeFilemod {
    type State = ();

    fn include_patterns(&self) -> Vec<String> {
        vec!["**/*.json".to_string()]
    }

    async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<Self::State> {
        Ok(())
    }

    async fn handle_file(
        &self,
        api: &ExecutorApi<NoDeps>,
        path: &Path,
        _options: &ArgumentRecord,
        _state: &mut Self::State,
    ) -> anyhow::Result<Vec<FileCommand>> {
        if api.basename(path).as_deref() != Some("b.json") {
            return Ok(vec![]);
        }
        let dir = api.dirname(path).expect("matched paths have parents");
        Ok(vec![FileCommand::UpsertFile {
            path: api.join(dir, "c.json"),
        }])
    }

    async fn handle_data(
        &self,
        _api: &ExecutorApi<NoDeps>,
        _path: &Path,
        old_data: &[u8],
        options: &ArgumentRecord,
        _state: &mut Self::State,
    ) -> anyhow::Result<DataCommand> {
        let mut object: serde_json::Map<String, Value> = serde_json::from_slice(old_data)?;
        let mut changed = false;
        for (key, value) in options {
            if object.contains_key(key) {
                object.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        if !changed {
            return Ok(DataCommand::Noop);
        }
        Ok(DataCommand::UpsertData(serde_json::to_vec(&object)?))
    }
}

#[tokio::test]
async fn test_json_merge_with_matching_key() {
    let tree = MemoryTree::from_entries([
        ("/a/b.json", r#"{"old":1}"#),
        ("/a/c.json", r#"{"k":"v"}"#),
    ]);
    let commands = executor(tree)
        .execute(&JsonMergeFilemod, Path::new("/a"), &options_from(&[("k", "v2")]))
        .await
        .unwrap();

    assert_eq!(
        commands,
        vec![Command::UpsertData {
            path: PathBuf::from("/a/c.json"),
            data: br#"{"k":"v2"}"#.to_vec(),
        }]
    );
}

#[tokio::test]
async fn test_json_merge_with_no_mapped_keys_is_noop() {
    let tree = MemoryTree::from_entries([
        ("/a/b.json", r#"{"old":1}"#),
        ("/a/c.json", r#"{"k":"v"}"#),
    ]);
    let commands = executor(tree)
        .execute(
            &JsonMergeFilemod,
            Path::new("/a"),
            &options_from(&[("unmapped", "x")]),
        )
        .await
        .unwrap();

    assert_eq!(commands, vec![]);
}

#[tokio::test]
async fn test_upsert_of_absent_path_is_a_create() {
    // Without /a/c.json in the tree the same upsert becomes a creation,
    // and handle_data sees empty old data.
    struct CreateFilemod;

    #[async_trait]
    impl Filemod<NoDeps> for CreateFilemod {
        type State = ();

        fn include_patterns(&self) -> Vec<String> {
            vec!["**/*.json".to_string()]
        }

        async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<()> {
            Ok(())
        }

        async fn handle_file(
            &self,
            api: &ExecutorApi<NoDeps>,
            path: &Path,
            _options: &ArgumentRecord,
            _state: &mut Self::State,
        ) -> anyhow::Result<Vec<FileCommand>> {
            let dir = api.dirname(path).expect("parent");
            Ok(vec![FileCommand::UpsertFile {
                path: api.join(dir, "c.json"),
            }])
        }

        async fn handle_data(
            &self,
            _api: &ExecutorApi<NoDeps>,
            _path: &Path,
            old_data: &[u8],
            _options: &ArgumentRecord,
            _state: &mut Self::State,
        ) -> anyhow::Result<DataCommand> {
            assert_eq!(old_data, b"");
            Ok(DataCommand::UpsertData(b"{}".to_vec()))
        }
    }

    let tree = MemoryTree::from_entries([("/a/b.json", r#"{"old":1}"#)]);
    let commands = executor(tree)
        .execute(&CreateFilemod, Path::new("/a"), &ArgumentRecord::new())
        .await
        .unwrap();

    assert_eq!(
        commands,
        vec![Command::UpsertFile {
            path: PathBuf::from("/a/c.json"),
            data: b"{}".to_vec(),
        }]
    );
}

#[tokio::test]
async fn test_two_runs_produce_identical_command_lists() {
    let entries = [
        ("/p/one/b.json", r#"{"x":1}"#),
        ("/p/one/c.json", r#"{"k":"v"}"#),
        ("/p/two/b.json", r#"{"y":2}"#),
        ("/p/two/c.json", r#"{"k":"w"}"#),
    ];
    let options = options_from(&[("k", "z")]);

    let first = executor(MemoryTree::from_entries(entries))
        .execute(&JsonMergeFilemod, Path::new("/p"), &options)
        .await
        .unwrap();
    let second = executor(MemoryTree::from_entries(entries))
        .execute(&JsonMergeFilemod, Path::new("/p"), &options)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    // Pre-order: /p/one before /p/two.
    assert_eq!(
        first[0].primary_path(),
        Some(&PathBuf::from("/p/one/c.json"))
    );
    assert_eq!(
        first[1].primary_path(),
        Some(&PathBuf::from("/p/two/c.json"))
    );
}

#[tokio::test]
async fn test_run_never_mutates_the_backing_tree() {
    let tree = MemoryTree::from_entries([
        ("/a/b.json", r#"{"old":1}"#),
        ("/a/c.json", r#"{"k":"v"}"#),
    ]);
    let ufs = UnifiedFileSystem::new(tree);
    let runner: FilemodExecutor<NoDeps> = FilemodExecutor::new(ufs.clone(), Arc::new(()));

    let commands = runner
        .execute(&JsonMergeFilemod, Path::new("/a"), &options_from(&[("k", "v2")]))
        .await
        .unwrap();
    assert_eq!(commands.len(), 1);

    // The proposed rewrite exists only in the command list.
    assert_eq!(
        ufs.read_file("/a/c.json").await.unwrap(),
        br#"{"k":"v"}"#.to_vec()
    );
}

/// Renames every matched file by appending a running index from State.
struct RenumberFilemod;

#[async_trait]
impl Filemod<NoDeps> for RenumberFilemod {
    type State = u32;

    fn include_patterns(&self) -> Vec<String> {
        vec!["**/*.txt".to_string()]
    }

    async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<u32> {
        Ok(0)
    }

    async fn handle_file(
        &self,
        _api: &ExecutorApi<NoDeps>,
        path: &Path,
        _options: &ArgumentRecord,
        state: &mut u32,
    ) -> anyhow::Result<Vec<FileCommand>> {
        *state += 1;
        Ok(vec![FileCommand::MoveFile {
            old_path: path.to_path_buf(),
            new_path: path.with_extension(format!("{}.txt", state)),
        }])
    }
}

#[tokio::test]
async fn test_state_threads_through_the_whole_run() {
    let tree = MemoryTree::from_entries([("/d/a.txt", "1"), ("/d/b.txt", "2"), ("/d/c.txt", "3")]);
    let commands = executor(tree)
        .execute(&RenumberFilemod, Path::new("/d"), &ArgumentRecord::new())
        .await
        .unwrap();

    assert_eq!(
        commands,
        vec![
            Command::MoveFile {
                old_path: PathBuf::from("/d/a.txt"),
                new_path: PathBuf::from("/d/a.1.txt"),
            },
            Command::MoveFile {
                old_path: PathBuf::from("/d/b.txt"),
                new_path: PathBuf::from("/d/b.2.txt"),
            },
            Command::MoveFile {
                old_path: PathBuf::from("/d/c.txt"),
                new_path: PathBuf::from("/d/c.3.txt"),
            },
        ]
    );
}

#[tokio::test]
async fn test_hook_failure_aborts_with_path_attached() {
    struct FailingFilemod;

    #[async_trait]
    impl Filemod<NoDeps> for FailingFilemod {
        type State = ();

        fn include_patterns(&self) -> Vec<String> {
            vec!["**/*.txt".to_string()]
        }

        async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<()> {
            Ok(())
        }

        async fn handle_file(
            &self,
            _api: &ExecutorApi<NoDeps>,
            path: &Path,
            _options: &ArgumentRecord,
            _state: &mut Self::State,
        ) -> anyhow::Result<Vec<FileCommand>> {
            if path.ends_with("b.txt") {
                anyhow::bail!("boom");
            }
            Ok(vec![FileCommand::DeleteFile {
                path: path.to_path_buf(),
            }])
        }
    }

    let tree = MemoryTree::from_entries([("/d/a.txt", "1"), ("/d/b.txt", "2")]);
    let result = executor(tree)
        .execute(&FailingFilemod, Path::new("/d"), &ArgumentRecord::new())
        .await;

    match result {
        Err(FilemodError::Handler { path, source }) => {
            assert_eq!(path, PathBuf::from("/d/b.txt"));
            assert!(source.to_string().contains("boom"));
        }
        other => panic!("expected handler error, got {:?}", other.map(|c| c.len())),
    }
}

#[tokio::test]
async fn test_bad_include_pattern_is_a_configuration_error() {
    struct BadGlobFilemod;

    #[async_trait]
    impl Filemod<NoDeps> for BadGlobFilemod {
        type State = ();

        fn include_patterns(&self) -> Vec<String> {
            vec!["src/*a*b*.rs".to_string()]
        }

        async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<()> {
            Ok(())
        }
    }

    let tree = MemoryTree::from_entries([("/src/lib.rs", "")]);
    let result = executor(tree)
        .execute(&BadGlobFilemod, Path::new("/"), &ArgumentRecord::new())
        .await;

    assert!(matches!(result, Err(FilemodError::Configuration { .. })));
}

#[tokio::test]
async fn test_default_hooks_propose_nothing() {
    struct DefaultFilemod;

    #[async_trait]
    impl Filemod<NoDeps> for DefaultFilemod {
        type State = ();

        fn include_patterns(&self) -> Vec<String> {
            vec!["**/*.md".to_string()]
        }

        async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<()> {
            Ok(())
        }
    }

    let tree = MemoryTree::from_entries([("/README.md", "# hello")]);
    let commands = executor(tree)
        .execute(&DefaultFilemod, Path::new("/"), &ArgumentRecord::new())
        .await
        .unwrap();

    // Default handle_file upserts the path, default handle_data says noop.
    assert_eq!(commands, vec![]);
}

#[tokio::test]
async fn test_copy_then_rewrite_sees_overlay_data() {
    struct CopyThenEditFilemod;

    #[async_trait]
    impl Filemod<NoDeps> for CopyThenEditFilemod {
        type State = ();

        fn include_patterns(&self) -> Vec<String> {
            vec!["**/template.txt".to_string()]
        }

        async fn initialize_state(&self, _options: &ArgumentRecord) -> anyhow::Result<()> {
            Ok(())
        }

        async fn handle_file(
            &self,
            _api: &ExecutorApi<NoDeps>,
            path: &Path,
            _options: &ArgumentRecord,
            _state: &mut Self::State,
        ) -> anyhow::Result<Vec<FileCommand>> {
            let copy = path.with_file_name("copy.txt");
            Ok(vec![
                FileCommand::CopyFile {
                    old_path: path.to_path_buf(),
                    new_path: copy.clone(),
                },
                FileCommand::UpsertFile { path: copy },
            ])
        }

        async fn handle_data(
            &self,
            _api: &ExecutorApi<NoDeps>,
            _path: &Path,
            old_data: &[u8],
            _options: &ArgumentRecord,
            _state: &mut Self::State,
        ) -> anyhow::Result<DataCommand> {
            // The copy proposed a moment ago is already visible here.
            assert_eq!(old_data, b"base");
            Ok(DataCommand::UpsertData(b"base+edit".to_vec()))
        }
    }

    let tree = MemoryTree::from_entries([("/t/template.txt", "base")]);
    let commands = executor(tree)
        .execute(&CopyThenEditFilemod, Path::new("/t"), &ArgumentRecord::new())
        .await
        .unwrap();

    assert_eq!(
        commands,
        vec![
            Command::CopyFile {
                old_path: PathBuf::from("/t/template.txt"),
                new_path: PathBuf::from("/t/copy.txt"),
            },
            Command::UpsertFile {
                path: PathBuf::from("/t/copy.txt"),
                data: b"base+edit".to_vec(),
            },
        ]
    );
}
