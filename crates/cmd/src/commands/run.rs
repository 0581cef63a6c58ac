use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use serde_json::Value;

use caselog::{CaseHeader, CaseWriter, HashDigest, encode_command, materialize_payload};
use filemod::{FilemodExecutor, parse_argument_record};
use unifs::{HostTree, UnifiedFileSystem};

use crate::rename::SuffixRenameFilemod;

/// Dry-runs the built-in suffix-rename filemod over `target` and records
/// the case (plus any payload data) under `output`.
///
/// Nothing under `target` is modified; the only writes go to `output`.
pub async fn run_command(
    target: PathBuf,
    rename: &str,
    args: &[String],
    output: PathBuf,
) -> Result<()> {
    let (from, to) = rename
        .split_once('=')
        .ok_or_else(|| anyhow!("--rename takes the form OLD_SUFFIX=NEW_SUFFIX"))?;
    if from.is_empty() {
        return Err(anyhow!("--rename needs a non-empty old suffix"));
    }

    let mut arguments = parse_argument_record(args)?;
    arguments.insert("rename_from".to_string(), Value::String(from.to_string()));
    arguments.insert("rename_to".to_string(), Value::String(to.to_string()));

    // The host tree is virtualized at "/", so the run's target root is "/".
    let ufs = UnifiedFileSystem::new(HostTree::new(&target));
    let executor = FilemodExecutor::new(ufs, Arc::new(()));
    let filemod = SuffixRenameFilemod::new(from, to);
    let commands = executor
        .execute(&filemod, Path::new("/"), &arguments)
        .await?;

    let codemod_digest = HashDigest::of(format!("suffix-rename {rename}").as_bytes());
    let header = CaseHeader::new(codemod_digest, target.display().to_string(), arguments)?;

    tokio::fs::create_dir_all(&output).await?;
    let case_path = output.join("case");
    let file = tokio::fs::File::create(&case_path).await?;
    let mut writer = CaseWriter::new(file);
    writer.write_case(&header).await?;
    for command in &commands {
        let job = encode_command(Path::new("/"), command);
        materialize_payload(&output, &job, command).await?;
        writer.write_job(&job).await?;
    }
    writer.finish().await?;

    println!(
        "Recorded case {} ({} jobs) at {}",
        header.case_hash_digest,
        commands.len(),
        case_path.display()
    );
    Ok(())
}
