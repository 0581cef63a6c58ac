use std::path::Path;

use anyhow::Result;

use caselog::{JobOp, read_case};

fn describe_op(op: &JobOp) -> String {
    match op {
        JobOp::Nothing => "nothing".to_string(),
        JobOp::CreateFile { path, data } => format!("create {path} <- {data}"),
        JobOp::UpdateFile { path, new_data } => format!("update {path} <- {new_data}"),
        JobOp::MoveFile { old_path, new_path } => format!("move {old_path} -> {new_path}"),
        JobOp::MoveAndUpdateFile {
            old_path,
            new_path,
            new_data,
        } => format!("move+update {old_path} -> {new_path} <- {new_data}"),
        JobOp::DeleteFile { path } => format!("delete {path}"),
        JobOp::CopyFile { source, target } => format!("copy {source} -> {target}"),
    }
}

/// Displays a recorded case, including partial captures.
pub async fn show_command(case_path: &Path) -> Result<()> {
    let file = tokio::fs::File::open(case_path).await?;
    let contents = read_case(file).await?;

    println!("case:      {}", contents.header.case_hash_digest);
    println!("codemod:   {}", contents.header.codemod_hash_digest);
    println!("created:   {}", contents.header.created_at.to_rfc3339());
    println!("target:    {}", contents.header.target_path);
    println!(
        "arguments: {}",
        serde_json::to_string(&contents.header.argument_record)?
    );
    println!("jobs:      {}", contents.jobs.len());
    for job in &contents.jobs {
        println!("  [{}] {}", job.hash_digest, describe_op(&job.op));
    }
    if !contents.complete {
        println!("(case is incomplete: the recording was cut off before it was sealed)");
    }
    Ok(())
}
