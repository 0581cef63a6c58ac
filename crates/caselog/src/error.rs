pub type Result<T> = std::result::Result<T, CaseLogError>;

#[derive(Debug, thiserror::Error)]
pub enum CaseLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The writer was driven out of order. The sequence is fixed:
    /// one case record, then jobs, then finish.
    #[error("Invalid writer state: expected {expected}, was {actual}")]
    State {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid magic bytes in {section}")]
    InvalidMagic { section: &'static str },

    #[error("Unsupported case format version {0:?}")]
    UnsupportedVersion([u8; 4]),

    #[error("Checksum mismatch in {section}")]
    ChecksumMismatch { section: &'static str },

    #[error("Malformed {section} record")]
    MalformedRecord { section: &'static str },

    #[error("String of {len} bytes exceeds the record limit")]
    StringTooLong { len: usize },

    #[error("Record payload of {len} bytes exceeds the record limit")]
    RecordTooLong { len: usize },

    #[error("Invalid UTF-8 in record string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Unknown job code {0}")]
    UnknownJobCode(u8),

    #[error("Invalid timestamp {0}")]
    InvalidTimestamp(i64),

    #[error("Malformed argument record: {0}")]
    MalformedArguments(#[from] serde_json::Error),
}
