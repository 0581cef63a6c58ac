use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

use diagnostics::debug;

use crate::digest::{DIGEST_LEN, HashDigest};
use crate::error::{CaseLogError, Result};
use crate::header::CaseHeader;
use crate::job::Job;
use crate::wire::{CASE_MAGIC, JOB_MAGIC, POSTAMBLE, PREAMBLE, VERSION, parse_case_inner, parse_job_inner};

/// One case as read back from storage.
///
/// `complete` is true only when the postamble was present and its running
/// digest matched. A case cut off mid-recording (the writing process died)
/// reads back with whatever jobs made it to disk and `complete: false`.
#[derive(Debug)]
pub struct CaseContents {
    pub header: CaseHeader,
    pub jobs: Vec<Job>,
    pub complete: bool,
}

async fn read_array<R: AsyncRead + Unpin, const N: usize>(reader: &mut R) -> std::io::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes).await?;
    Ok(bytes)
}

/// Reads a framed record body (length, inner digest, inner bytes), verifies
/// the digest, and folds the full framed bytes into the running digest.
async fn read_record_body<R: AsyncRead + Unpin>(
    reader: &mut R,
    magic: &[u8; 4],
    section: &'static str,
    running: &mut Sha256,
) -> std::io::Result<Result<Vec<u8>>> {
    let len_bytes: [u8; 2] = read_array(reader).await?;
    let len = u16::from_be_bytes(len_bytes) as usize;
    let digest_bytes: [u8; DIGEST_LEN] = read_array(reader).await?;
    let mut inner = vec![0u8; len];
    reader.read_exact(&mut inner).await?;

    if HashDigest::of(&inner) != HashDigest::from_bytes(digest_bytes) {
        return Ok(Err(CaseLogError::ChecksumMismatch { section }));
    }
    running.update(magic);
    running.update(len_bytes);
    running.update(digest_bytes);
    running.update(&inner);
    Ok(Ok(inner))
}

fn is_truncation(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::UnexpectedEof
}

/// Reads one case from a stream.
///
/// The preamble, version, and case record must be intact. After that,
/// truncation is tolerated: the jobs read so far are returned with
/// `complete: false`. Corruption is not tolerated anywhere: a wrong magic
/// or a failed checksum is a hard error.
pub async fn read_case<R: AsyncRead + Unpin>(mut reader: R) -> Result<CaseContents> {
    let preamble: [u8; 4] = read_array(&mut reader).await?;
    if preamble != PREAMBLE {
        return Err(CaseLogError::InvalidMagic { section: "preamble" });
    }
    let version: [u8; 4] = read_array(&mut reader).await?;
    if version != VERSION {
        return Err(CaseLogError::UnsupportedVersion(version));
    }

    let mut running = Sha256::default();

    let case_magic: [u8; 4] = read_array(&mut reader).await?;
    if case_magic != CASE_MAGIC {
        return Err(CaseLogError::InvalidMagic { section: "case" });
    }
    let inner = read_record_body(&mut reader, &CASE_MAGIC, "case", &mut running).await??;
    let header = parse_case_inner(&inner)?;

    let mut jobs = Vec::new();
    let mut complete = false;
    loop {
        let magic: [u8; 4] = match read_array(&mut reader).await {
            Ok(magic) => magic,
            Err(e) if is_truncation(&e) => break,
            Err(e) => return Err(e.into()),
        };
        if magic == JOB_MAGIC {
            let inner =
                match read_record_body(&mut reader, &JOB_MAGIC, "job", &mut running).await {
                    Ok(result) => result?,
                    Err(e) if is_truncation(&e) => break,
                    Err(e) => return Err(e.into()),
                };
            jobs.push(parse_job_inner(&inner)?);
        } else if magic == POSTAMBLE {
            let digest_bytes: [u8; DIGEST_LEN] = match read_array(&mut reader).await {
                Ok(bytes) => bytes,
                Err(e) if is_truncation(&e) => break,
                Err(e) => return Err(e.into()),
            };
            if HashDigest::finalize(running) != HashDigest::from_bytes(digest_bytes) {
                return Err(CaseLogError::ChecksumMismatch { section: "postamble" });
            }
            complete = true;
            break;
        } else {
            return Err(CaseLogError::InvalidMagic { section: "record" });
        }
    }

    debug!(
        "read case {case}: {count} jobs, complete={complete}",
        case: header.case_hash_digest.to_hex(),
        count: jobs.len(),
        complete: complete,
    );
    Ok(CaseContents {
        header,
        jobs,
        complete,
    })
}
