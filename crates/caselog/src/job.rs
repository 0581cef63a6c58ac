//! Storage-agnostic jobs: what a recorded case says should happen, with no
//! reference to the machine the original run happened on.

use crate::digest::HashDigest;
use crate::error::{CaseLogError, Result};

// Job codes are a crossing of these aspect flags. The crossing is sparse:
// only the combinations below are meaningful.
const FLAG_PATH: u8 = 1 << 0;
const FLAG_DATA: u8 = 1 << 1;
const FLAG_CREATED: u8 = 1 << 2;
const FLAG_CHANGED: u8 = 1 << 3;
const FLAG_DELETED: u8 = 1 << 4;
const FLAG_COPIED: u8 = 1 << 5;

pub const CODE_NOTHING: u8 = 0;
pub const CODE_CREATE_FILE: u8 = FLAG_CREATED | FLAG_PATH | FLAG_DATA;
pub const CODE_UPDATE_FILE: u8 = FLAG_CHANGED | FLAG_DATA;
pub const CODE_MOVE_FILE: u8 = FLAG_CHANGED | FLAG_PATH;
pub const CODE_MOVE_AND_UPDATE_FILE: u8 = FLAG_CHANGED | FLAG_PATH | FLAG_DATA;
pub const CODE_DELETE_FILE: u8 = FLAG_DELETED | FLAG_PATH;
pub const CODE_COPY_FILE: u8 = FLAG_COPIED | FLAG_PATH;

/// One recorded operation. Every location is a URI: tree paths are relative
/// to the case's target root, payloads live under `data/` in the case
/// output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOp {
    /// A run that proposed nothing still records that it ran.
    Nothing,
    CreateFile {
        path: String,
        data: String,
    },
    UpdateFile {
        path: String,
        new_data: String,
    },
    MoveFile {
        old_path: String,
        new_path: String,
    },
    /// Accepted on decode for compatibility with recordings that fuse a move
    /// with a rewrite; the encoder never produces it.
    MoveAndUpdateFile {
        old_path: String,
        new_path: String,
        new_data: String,
    },
    DeleteFile {
        path: String,
    },
    CopyFile {
        source: String,
        target: String,
    },
}

impl JobOp {
    pub fn code(&self) -> u8 {
        match self {
            JobOp::Nothing => CODE_NOTHING,
            JobOp::CreateFile { .. } => CODE_CREATE_FILE,
            JobOp::UpdateFile { .. } => CODE_UPDATE_FILE,
            JobOp::MoveFile { .. } => CODE_MOVE_FILE,
            JobOp::MoveAndUpdateFile { .. } => CODE_MOVE_AND_UPDATE_FILE,
            JobOp::DeleteFile { .. } => CODE_DELETE_FILE,
            JobOp::CopyFile { .. } => CODE_COPY_FILE,
        }
    }

    /// The URI strings in wire order for this op.
    pub fn uris(&self) -> Vec<&str> {
        match self {
            JobOp::Nothing => vec![],
            JobOp::CreateFile { path, data } => vec![path, data],
            JobOp::UpdateFile { path, new_data } => vec![path, new_data],
            JobOp::MoveFile { old_path, new_path } => vec![old_path, new_path],
            JobOp::MoveAndUpdateFile {
                old_path,
                new_path,
                new_data,
            } => vec![old_path, new_path, new_data],
            JobOp::DeleteFile { path } => vec![path],
            JobOp::CopyFile { source, target } => vec![source, target],
        }
    }

    /// Rebuilds an op from its code and wire-order URI strings.
    pub fn from_wire(code: u8, mut uris: Vec<String>) -> Result<Self> {
        let mut next = || {
            if uris.is_empty() {
                String::new()
            } else {
                uris.remove(0)
            }
        };
        match code {
            CODE_NOTHING => Ok(JobOp::Nothing),
            CODE_CREATE_FILE => Ok(JobOp::CreateFile {
                path: next(),
                data: next(),
            }),
            CODE_UPDATE_FILE => Ok(JobOp::UpdateFile {
                path: next(),
                new_data: next(),
            }),
            CODE_MOVE_FILE => Ok(JobOp::MoveFile {
                old_path: next(),
                new_path: next(),
            }),
            CODE_MOVE_AND_UPDATE_FILE => Ok(JobOp::MoveAndUpdateFile {
                old_path: next(),
                new_path: next(),
                new_data: next(),
            }),
            CODE_DELETE_FILE => Ok(JobOp::DeleteFile { path: next() }),
            CODE_COPY_FILE => Ok(JobOp::CopyFile {
                source: next(),
                target: next(),
            }),
            other => Err(CaseLogError::UnknownJobCode(other)),
        }
    }

    /// How many URI strings the wire form of `code` carries.
    pub fn uri_count(code: u8) -> Result<usize> {
        match code {
            CODE_NOTHING => Ok(0),
            CODE_DELETE_FILE => Ok(1),
            CODE_CREATE_FILE | CODE_UPDATE_FILE | CODE_MOVE_FILE | CODE_COPY_FILE => Ok(2),
            CODE_MOVE_AND_UPDATE_FILE => Ok(3),
            other => Err(CaseLogError::UnknownJobCode(other)),
        }
    }
}

/// One job record: a minted identity plus the operation itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub hash_digest: HashDigest,
    pub op: JobOp,
}

impl Job {
    pub fn new(op: JobOp) -> Self {
        Job {
            hash_digest: HashDigest::random(),
            op,
        }
    }
}
