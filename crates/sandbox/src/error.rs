use std::time::Duration;

use crate::session::SessionId;

/// Broker-level failures. Both variants are loud on purpose: a capability
/// that cannot be resolved must never degrade into a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("Session {session} already has capabilities installed")]
    SessionCollision { session: SessionId },

    #[error("Capability '{name}' is unavailable for session {session}")]
    Unavailable { session: SessionId, name: String },
}

/// Everything that can go wrong across one sandboxed call.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Unknown module: '{name}'")]
    UnknownModule { name: String },

    /// The guest's entry point failed. Whatever the guest raised is
    /// normalized into one message here; no guest value crosses the
    /// boundary on failure.
    #[error("Guest module failed: {message}")]
    Guest { message: String },

    #[error("Guest module exceeded the {timeout:?} execution budget")]
    Timeout { timeout: Duration },

    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
