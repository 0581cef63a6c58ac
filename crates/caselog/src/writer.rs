use sha2::Sha256;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use diagnostics::debug;

use crate::digest::HashDigest;
use crate::error::{CaseLogError, Result};
use crate::header::CaseHeader;
use crate::job::Job;
use crate::wire::{CASE_MAGIC, JOB_MAGIC, POSTAMBLE, PREAMBLE, VERSION, case_inner, frame_record, job_inner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Idle,
    HeaderWritten,
    Finished,
}

impl WriterState {
    fn name(self) -> &'static str {
        match self {
            WriterState::Idle => "idle",
            WriterState::HeaderWritten => "header written",
            WriterState::Finished => "finished",
        }
    }
}

/// Appends one case to an output stream.
///
/// The call order is fixed: [`write_case`](CaseWriter::write_case) once,
/// [`write_job`](CaseWriter::write_job) zero or more times,
/// [`finish`](CaseWriter::finish) once. Driving the writer out of order is
/// an error, not a silent reorder, so a half-written case can never look
/// intact.
pub struct CaseWriter<W> {
    writer: W,
    state: WriterState,
    running: Sha256,
    jobs_written: usize,
}

impl<W: AsyncWrite + Unpin + Send> CaseWriter<W> {
    pub fn new(writer: W) -> Self {
        CaseWriter {
            writer,
            state: WriterState::Idle,
            running: Sha256::default(),
            jobs_written: 0,
        }
    }

    fn expect_state(&self, expected: WriterState) -> Result<()> {
        if self.state != expected {
            return Err(CaseLogError::State {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    pub async fn write_case(&mut self, header: &CaseHeader) -> Result<()> {
        self.expect_state(WriterState::Idle)?;
        self.writer.write_all(&PREAMBLE).await?;
        self.writer.write_all(&VERSION).await?;
        let record = frame_record(&CASE_MAGIC, &case_inner(header)?, &mut self.running)?;
        self.writer.write_all(&record).await?;
        self.state = WriterState::HeaderWritten;
        debug!(
            "case {case} opened for {target}",
            case: header.case_hash_digest.to_hex(),
            target: header.target_path.clone(),
        );
        Ok(())
    }

    pub async fn write_job(&mut self, job: &Job) -> Result<()> {
        self.expect_state(WriterState::HeaderWritten)?;
        let record = frame_record(&JOB_MAGIC, &job_inner(job)?, &mut self.running)?;
        self.writer.write_all(&record).await?;
        self.jobs_written += 1;
        Ok(())
    }

    /// Seals the case with the postamble and running digest, then flushes
    /// and shuts the stream down.
    pub async fn finish(mut self) -> Result<()> {
        self.expect_state(WriterState::HeaderWritten)?;
        self.writer.write_all(&POSTAMBLE).await?;
        let digest = HashDigest::finalize(self.running);
        self.writer.write_all(digest.as_bytes()).await?;
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        self.state = WriterState::Finished;
        debug!("case sealed with {count} jobs", count: self.jobs_written);
        Ok(())
    }
}
