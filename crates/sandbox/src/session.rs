use std::fmt;

use chrono::{DateTime, Utc};

/// Identifies one capability session. Minted fresh for every sandboxed
/// call; uuid7 keeps ids unique and roughly time-ordered, which makes
/// session logs pleasant to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid7::Uuid);

impl SessionId {
    pub fn mint() -> Self {
        SessionId(uuid7::uuid7())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sandboxed call's identity: id, start time, and a human label
/// (the guest module's name).
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
    pub label: String,
}

impl Session {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Session {
            id: SessionId::mint(),
            started_at: Utc::now(),
            label: label.into(),
        }
    }
}
