//! The binary case format, shared between writer and reader.
//!
//! File layout:
//!
//! ```text
//! preamble magic . format version
//! case record
//! job record *
//! postamble magic . 20-byte running digest of all records
//! ```
//!
//! Every record is `magic . u16-BE inner length . 20-byte inner digest .
//! inner bytes`; the running digest covers each record's full framed bytes.
//! Strings are u16-BE length-prefixed UTF-8, capped just under 16 KiB.

use sha2::{Digest, Sha256};

use crate::digest::{DIGEST_LEN, HashDigest};
use crate::error::{CaseLogError, Result};
use crate::header::{CaseHeader, millis_to_datetime};
use crate::job::{Job, JobOp};

pub(crate) const PREAMBLE: [u8; 4] = [0xAA, 0xBB, 0xCC, 0xDD];
pub(crate) const VERSION: [u8; 4] = [1, 0, 0, 0];
pub(crate) const CASE_MAGIC: [u8; 4] = [0xA1, 0xB1, 0xC1, 0xD1];
pub(crate) const JOB_MAGIC: [u8; 4] = [0xA2, 0xB2, 0xC2, 0xD2];
pub(crate) const POSTAMBLE: [u8; 4] = [0xDD, 0xCC, 0xBB, 0xAA];

const MAX_STRING_LEN: usize = 16 * 1024 - 1;

fn put_digest(buf: &mut Vec<u8>, digest: &HashDigest) {
    buf.extend_from_slice(digest.as_bytes());
}

fn put_string(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() > MAX_STRING_LEN {
        return Err(CaseLogError::StringTooLong { len: bytes.len() });
    }
    buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Frames `inner` as one record and folds the framed bytes into the running
/// digest.
pub(crate) fn frame_record(
    magic: &[u8; 4],
    inner: &[u8],
    running: &mut Sha256,
) -> Result<Vec<u8>> {
    if inner.len() > u16::MAX as usize {
        return Err(CaseLogError::RecordTooLong { len: inner.len() });
    }
    let mut framed = Vec::with_capacity(4 + 2 + DIGEST_LEN + inner.len());
    framed.extend_from_slice(magic);
    framed.extend_from_slice(&(inner.len() as u16).to_be_bytes());
    put_digest(&mut framed, &HashDigest::of(inner));
    framed.extend_from_slice(inner);
    running.update(&framed);
    Ok(framed)
}

pub(crate) fn case_inner(header: &CaseHeader) -> Result<Vec<u8>> {
    let mut inner = Vec::new();
    put_digest(&mut inner, &header.case_hash_digest);
    put_digest(&mut inner, &header.codemod_hash_digest);
    inner.extend_from_slice(&header.created_at.timestamp_millis().to_be_bytes());
    put_string(&mut inner, &header.target_path)?;
    put_string(&mut inner, &serde_json::to_string(&header.argument_record)?)?;
    Ok(inner)
}

pub(crate) fn job_inner(job: &Job) -> Result<Vec<u8>> {
    let mut inner = Vec::new();
    put_digest(&mut inner, &job.hash_digest);
    inner.push(job.op.code());
    for uri in job.op.uris() {
        put_string(&mut inner, uri)?;
    }
    Ok(inner)
}

/// Sequential reads over one record's inner bytes.
pub(crate) struct InnerReader<'a> {
    buf: &'a [u8],
    section: &'static str,
}

impl<'a> InnerReader<'a> {
    pub(crate) fn new(buf: &'a [u8], section: &'static str) -> Self {
        InnerReader { buf, section }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(CaseLogError::MalformedRecord {
                section: self.section,
            });
        }
        let (taken, rest) = self.buf.split_at(n);
        self.buf = rest;
        Ok(taken)
    }

    pub(crate) fn digest(&mut self) -> Result<HashDigest> {
        let bytes = self.take(DIGEST_LEN)?;
        let mut fixed = [0u8; DIGEST_LEN];
        fixed.copy_from_slice(bytes);
        Ok(HashDigest::from_bytes(fixed))
    }

    pub(crate) fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        let mut fixed = [0u8; 8];
        fixed.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(fixed))
    }

    pub(crate) fn string(&mut self) -> Result<String> {
        let len_bytes = self.take(2)?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

pub(crate) fn parse_case_inner(inner: &[u8]) -> Result<CaseHeader> {
    let mut reader = InnerReader::new(inner, "case");
    let case_hash_digest = reader.digest()?;
    let codemod_hash_digest = reader.digest()?;
    let created_at = millis_to_datetime(reader.i64()?)?;
    let target_path = reader.string()?;
    let argument_record = serde_json::from_str(&reader.string()?)?;
    Ok(CaseHeader {
        case_hash_digest,
        codemod_hash_digest,
        created_at,
        target_path,
        argument_record,
    })
}

pub(crate) fn parse_job_inner(inner: &[u8]) -> Result<Job> {
    let mut reader = InnerReader::new(inner, "job");
    let hash_digest = reader.digest()?;
    let code = reader.byte()?;
    let count = JobOp::uri_count(code)?;
    let mut uris = Vec::with_capacity(count);
    for _ in 0..count {
        uris.push(reader.string()?);
    }
    Ok(Job {
        hash_digest,
        op: JobOp::from_wire(code, uris)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_limit_enforced() {
        let mut buf = Vec::new();
        assert!(put_string(&mut buf, &"x".repeat(MAX_STRING_LEN)).is_ok());
        assert!(matches!(
            put_string(&mut Vec::new(), &"x".repeat(MAX_STRING_LEN + 1)),
            Err(CaseLogError::StringTooLong { .. })
        ));
    }

    #[test]
    fn test_job_inner_round_trips() {
        let job = Job::new(JobOp::MoveFile {
            old_path: "a/b".into(),
            new_path: "a/c".into(),
        });
        let inner = job_inner(&job).unwrap();
        assert_eq!(parse_job_inner(&inner).unwrap(), job);
    }

    #[test]
    fn test_truncated_inner_is_malformed() {
        let job = Job::new(JobOp::DeleteFile { path: "a".into() });
        let inner = job_inner(&job).unwrap();
        assert!(matches!(
            parse_job_inner(&inner[..inner.len() - 1]),
            Err(CaseLogError::MalformedRecord { section: "job" })
        ));
    }
}
