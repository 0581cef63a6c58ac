//! caselog - durable, replayable recordings of codemod runs.
//!
//! A case is one execution: a [`CaseHeader`] saying what ran and where,
//! followed by the [`Job`]s it proposed, encoded free of any machine-local
//! paths so the recording replays anywhere. The format is append-only and
//! checksummed; a reader can always tell a sealed case from one whose
//! writer died mid-stream.

mod digest;
mod encode;
mod error;
mod header;
mod job;
mod reader;
mod wire;
mod writer;

#[cfg(test)]
mod tests;

pub use digest::{DIGEST_LEN, HashDigest};
pub use encode::{encode_command, materialize_payload};
pub use error::{CaseLogError, Result};
pub use header::CaseHeader;
pub use job::{Job, JobOp};
pub use reader::{CaseContents, read_case};
pub use writer::CaseWriter;
