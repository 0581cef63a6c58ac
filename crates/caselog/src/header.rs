use chrono::{DateTime, Utc};
use filemod::ArgumentRecord;

use crate::digest::HashDigest;
use crate::error::{CaseLogError, Result};

/// The case record: which codemod ran, where, when, and with what
/// arguments. Written once at the head of every case file.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseHeader {
    pub case_hash_digest: HashDigest,
    pub codemod_hash_digest: HashDigest,
    pub created_at: DateTime<Utc>,
    pub target_path: String,
    pub argument_record: ArgumentRecord,
}

impl CaseHeader {
    /// Builds a header for a run starting now, with a freshly minted case
    /// id. The timestamp is kept at millisecond precision, which is what
    /// the wire carries.
    pub fn new<S: Into<String>>(
        codemod_hash_digest: HashDigest,
        target_path: S,
        argument_record: ArgumentRecord,
    ) -> Result<Self> {
        let now = Utc::now().timestamp_millis();
        Ok(CaseHeader {
            case_hash_digest: HashDigest::random(),
            codemod_hash_digest,
            created_at: millis_to_datetime(now)?,
            target_path: target_path.into(),
            argument_record,
        })
    }
}

pub(crate) fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(CaseLogError::InvalidTimestamp(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_timestamp_has_millisecond_precision() {
        let header = CaseHeader::new(HashDigest::random(), "/p", ArgumentRecord::new()).unwrap();
        assert_eq!(
            header.created_at.timestamp_subsec_nanos() % 1_000_000,
            0,
            "sub-millisecond precision would not survive the wire"
        );
    }

    #[test]
    fn test_invalid_millis_rejected() {
        assert!(millis_to_datetime(i64::MAX).is_err());
    }
}
