use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use caselog::{Job, JobOp, read_case};
use diagnostics::info;

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

async fn write_payload(data_root: &Path, uri: &str, dest: &Path) -> Result<()> {
    let payload = tokio::fs::read(data_root.join(uri)).await?;
    ensure_parent(dest).await?;
    tokio::fs::write(dest, payload).await?;
    Ok(())
}

async fn apply_job(root: &Path, data_root: &Path, job: &Job) -> Result<()> {
    match &job.op {
        JobOp::Nothing => {}
        JobOp::CreateFile { path, data } => {
            write_payload(data_root, data, &root.join(path)).await?;
        }
        JobOp::UpdateFile { path, new_data } => {
            write_payload(data_root, new_data, &root.join(path)).await?;
        }
        JobOp::MoveFile { old_path, new_path } => {
            let dest = root.join(new_path);
            ensure_parent(&dest).await?;
            tokio::fs::rename(root.join(old_path), dest).await?;
        }
        JobOp::MoveAndUpdateFile {
            old_path,
            new_path,
            new_data,
        } => {
            let dest = root.join(new_path);
            ensure_parent(&dest).await?;
            tokio::fs::rename(root.join(old_path), &dest).await?;
            write_payload(data_root, new_data, &dest).await?;
        }
        JobOp::DeleteFile { path } => {
            tokio::fs::remove_file(root.join(path)).await?;
        }
        JobOp::CopyFile { source, target } => {
            let dest = root.join(target);
            ensure_parent(&dest).await?;
            tokio::fs::copy(root.join(source), dest).await?;
        }
    }
    Ok(())
}

/// Replays a recorded case against `root`. This is the one place in the
/// tool where jobs touch a real file system.
pub async fn apply_command(case_path: &Path, root: PathBuf, allow_partial: bool) -> Result<()> {
    let file = tokio::fs::File::open(case_path).await?;
    let contents = read_case(file).await?;
    if !contents.complete && !allow_partial {
        return Err(anyhow!(
            "case {} is incomplete; pass --allow-partial to replay the {} recovered jobs",
            contents.header.case_hash_digest,
            contents.jobs.len()
        ));
    }

    // Payload data lives next to the case file.
    let data_root = case_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    for job in &contents.jobs {
        apply_job(&root, &data_root, job).await?;
        info!("applied job {job}", job: job.hash_digest.to_hex());
    }

    println!(
        "✅ applied {} jobs from case {} to {}",
        contents.jobs.len(),
        contents.header.case_hash_digest,
        root.display()
    );
    Ok(())
}
