//! sandbox - capability-gated execution of untrusted transform modules.
//!
//! Guest code never touches the host directly: each call gets a fresh
//! session, a [`CapabilityRegistry`] granted for exactly that session, and a
//! [`CapabilityPort`] as its only line back to the host. The
//! [`SandboxedModule`] host enforces a wall-clock budget and revokes the
//! session's capabilities on every exit path.

mod capability;
mod error;
mod module;
mod session;


pub use capability::{CapabilityBroker, CapabilityPort, CapabilityRegistry, OUTPUT_CAPABILITY};
pub use error::{CapabilityError, Result, SandboxError};
pub use module::{GuestModule, SandboxedModule};
pub use session::{Session, SessionId};
