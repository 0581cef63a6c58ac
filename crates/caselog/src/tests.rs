use serde_json::Value;

use crate::digest::HashDigest;
use crate::error::CaseLogError;
use crate::header::CaseHeader;
use crate::job::{Job, JobOp};
use crate::reader::read_case;
use crate::writer::CaseWriter;

use filemod::ArgumentRecord;

fn sample_header() -> CaseHeader {
    let mut arguments = ArgumentRecord::new();
    arguments.insert("dry".to_string(), Value::Bool(true));
    arguments.insert("suffix".to_string(), Value::String(".bak".to_string()));
    CaseHeader::new(HashDigest::random(), "/opt/project", arguments).unwrap()
}

fn sample_jobs() -> Vec<Job> {
    vec![
        Job::new(JobOp::CreateFile {
            path: "src/new.rs".into(),
            data: "data/aa".into(),
        }),
        Job::new(JobOp::UpdateFile {
            path: "src/lib.rs".into(),
            new_data: "data/bb".into(),
        }),
        Job::new(JobOp::MoveFile {
            old_path: "old.txt".into(),
            new_path: "new.txt".into(),
        }),
        Job::new(JobOp::DeleteFile {
            path: "junk.tmp".into(),
        }),
        Job::new(JobOp::CopyFile {
            source: "a.cfg".into(),
            target: "b.cfg".into(),
        }),
        Job::new(JobOp::Nothing),
    ]
}

async fn write_sealed_case(header: &CaseHeader, jobs: &[Job]) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut writer = CaseWriter::new(&mut buffer);
    writer.write_case(header).await.unwrap();
    for job in jobs {
        writer.write_job(job).await.unwrap();
    }
    writer.finish().await.unwrap();
    buffer
}

#[tokio::test]
async fn test_sealed_case_round_trips() {
    let header = sample_header();
    let jobs = sample_jobs();
    let bytes = write_sealed_case(&header, &jobs).await;

    let contents = read_case(bytes.as_slice()).await.unwrap();
    assert!(contents.complete);
    assert_eq!(contents.header, header);
    assert_eq!(contents.jobs, jobs);
}

#[tokio::test]
async fn test_empty_case_round_trips() {
    let header = sample_header();
    let bytes = write_sealed_case(&header, &[]).await;

    let contents = read_case(bytes.as_slice()).await.unwrap();
    assert!(contents.complete);
    assert_eq!(contents.jobs, vec![]);
}

#[tokio::test]
async fn test_truncated_case_reads_back_partial() {
    let header = sample_header();
    let jobs = sample_jobs();
    let bytes = write_sealed_case(&header, &jobs).await;

    // Cut the file anywhere after the case record: the reader should stop
    // cleanly with the jobs that fully made it, never an error.
    let mut seen_complete = false;
    let mut seen_partial = false;
    for cut in 200..bytes.len() {
        let contents = read_case(&bytes[..cut]).await.unwrap();
        assert_eq!(contents.header, header);
        assert!(contents.jobs.len() <= jobs.len());
        assert_eq!(contents.jobs, jobs[..contents.jobs.len()]);
        if contents.complete {
            seen_complete = true;
        } else {
            seen_partial = true;
        }
    }
    assert!(seen_partial);
    // Only the full-length cut is complete.
    assert!(!seen_complete);

    let contents = read_case(bytes.as_slice()).await.unwrap();
    assert!(contents.complete);
}

#[tokio::test]
async fn test_corrupted_job_payload_is_a_hard_error() {
    let header = sample_header();
    let jobs = sample_jobs();
    let mut bytes = write_sealed_case(&header, &jobs).await;

    // Flip one byte well inside the first job record's inner content.
    let case_record_len = 4 + 2 + 20 + crate::wire::case_inner(&header).unwrap().len();
    let first_job_record = 8 + case_record_len;
    let target = first_job_record + 4 + 2 + 20 + 5;
    bytes[target] ^= 0xFF;

    assert!(matches!(
        read_case(bytes.as_slice()).await,
        Err(CaseLogError::ChecksumMismatch { section: "job" })
    ));
}

#[tokio::test]
async fn test_corrupted_postamble_digest_is_a_hard_error() {
    let header = sample_header();
    let mut bytes = write_sealed_case(&header, &sample_jobs()).await;
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    assert!(matches!(
        read_case(bytes.as_slice()).await,
        Err(CaseLogError::ChecksumMismatch { section: "postamble" })
    ));
}

#[tokio::test]
async fn test_wrong_preamble_is_rejected() {
    let bytes = vec![0u8; 64];
    assert!(matches!(
        read_case(bytes.as_slice()).await,
        Err(CaseLogError::InvalidMagic { section: "preamble" })
    ));
}

#[tokio::test]
async fn test_unsupported_version_is_rejected() {
    let header = sample_header();
    let mut bytes = write_sealed_case(&header, &[]).await;
    bytes[4] = 9;
    assert!(matches!(
        read_case(bytes.as_slice()).await,
        Err(CaseLogError::UnsupportedVersion([9, 0, 0, 0]))
    ));
}

#[tokio::test]
async fn test_writer_rejects_out_of_order_calls() {
    let mut buffer = Vec::new();
    let mut writer = CaseWriter::new(&mut buffer);

    // A job before the case record.
    let job = Job::new(JobOp::Nothing);
    assert!(matches!(
        writer.write_job(&job).await,
        Err(CaseLogError::State { .. })
    ));

    // Finishing before the case record.
    let writer2 = CaseWriter::new(Vec::new());
    assert!(matches!(
        writer2.finish().await,
        Err(CaseLogError::State { .. })
    ));

    // A second case record on the same writer.
    let header = sample_header();
    writer.write_case(&header).await.unwrap();
    assert!(matches!(
        writer.write_case(&header).await,
        Err(CaseLogError::State { .. })
    ));
}
