//! Guest modules and the host that runs them.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{Map, Value};

use diagnostics::{info, warn};

use crate::capability::{CapabilityBroker, CapabilityPort, CapabilityRegistry};
use crate::error::{Result, SandboxError};
use crate::session::Session;

/// The isolation boundary. A guest implements its entry points against the
/// [`CapabilityPort`] alone: no ambient host state, no real file system, no
/// way to reach another session's capabilities.
#[async_trait]
pub trait GuestModule: Send + Sync {
    /// The main entry point.
    async fn invoke(
        &self,
        port: &CapabilityPort<'_>,
        inputs: &Map<String, Value>,
    ) -> anyhow::Result<Value>;

    /// The introspection entry point: what the module is and what inputs it
    /// wants. Modules with nothing to say can keep the default.
    async fn describe(
        &self,
        _port: &CapabilityPort<'_>,
        _inputs: &Map<String, Value>,
    ) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }
}

enum EntryPoint {
    Invoke,
    Describe,
}

/// Runs registered guest modules under a wall-clock budget, one fresh
/// capability session per call.
///
/// Every call follows the same shape regardless of outcome: mint a session,
/// install the caller's capabilities, execute the entry point under
/// `tokio::time::timeout`, then uninstall. Success, guest failure, guest
/// panic, and timeout all pass through the uninstall, so a finished call
/// never leaves capabilities behind.
pub struct SandboxedModule {
    modules: HashMap<String, Arc<dyn GuestModule>>,
    broker: CapabilityBroker,
    timeout: Duration,
}

impl SandboxedModule {
    pub fn new(timeout: Duration) -> Self {
        SandboxedModule {
            modules: HashMap::new(),
            broker: CapabilityBroker::new(),
            timeout,
        }
    }

    pub fn register_module<S: Into<String>>(&mut self, name: S, module: Arc<dyn GuestModule>) {
        self.modules.insert(name.into(), module);
    }

    pub fn broker(&self) -> &CapabilityBroker {
        &self.broker
    }

    pub async fn invoke(
        &self,
        name: &str,
        inputs: &Map<String, Value>,
        capabilities: CapabilityRegistry,
    ) -> Result<Value> {
        self.run(name, inputs, capabilities, EntryPoint::Invoke).await
    }

    pub async fn describe(
        &self,
        name: &str,
        inputs: &Map<String, Value>,
        capabilities: CapabilityRegistry,
    ) -> Result<Value> {
        self.run(name, inputs, capabilities, EntryPoint::Describe).await
    }

    async fn run(
        &self,
        name: &str,
        inputs: &Map<String, Value>,
        capabilities: CapabilityRegistry,
        entry: EntryPoint,
    ) -> Result<Value> {
        let module = self
            .modules
            .get(name)
            .cloned()
            .ok_or_else(|| SandboxError::UnknownModule {
                name: name.to_string(),
            })?;

        let session = Session::new(name);
        self.broker.install(session.id, capabilities).await?;
        info!(
            "sandbox session {session} started for module {module}",
            session: session.id.to_string(),
            module: name,
        );

        let port = CapabilityPort::new(&self.broker, session.id);
        let started = Instant::now();
        // catch_unwind turns a panicking guest into an error outcome, so the
        // uninstall below runs no matter how the entry point exits.
        let outcome = tokio::time::timeout(
            self.timeout,
            AssertUnwindSafe(async {
                match entry {
                    EntryPoint::Invoke => module.invoke(&port, inputs).await,
                    EntryPoint::Describe => module.describe(&port, inputs).await,
                }
            })
            .catch_unwind(),
        )
        .await;

        // Revocation happens before the outcome is inspected.
        self.broker.uninstall(session.id).await;

        let elapsed = started.elapsed();
        match outcome {
            Err(_) => {
                warn!(
                    "sandbox session {session} timed out after {elapsed}",
                    session: session.id.to_string(),
                    elapsed: format!("{elapsed:?}"),
                );
                Err(SandboxError::Timeout {
                    timeout: self.timeout,
                })
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic);
                warn!(
                    "sandbox session {session} panicked after {elapsed}: {error}",
                    session: session.id.to_string(),
                    elapsed: format!("{elapsed:?}"),
                    error: message.clone(),
                );
                Err(SandboxError::Guest { message })
            }
            Ok(Ok(Err(e))) => {
                warn!(
                    "sandbox session {session} failed after {elapsed}: {error}",
                    session: session.id.to_string(),
                    elapsed: format!("{elapsed:?}"),
                    error: e.to_string(),
                );
                Err(SandboxError::Guest {
                    message: e.to_string(),
                })
            }
            Ok(Ok(Ok(value))) => {
                info!(
                    "sandbox session {session} finished in {elapsed}",
                    session: session.id.to_string(),
                    elapsed: format!("{elapsed:?}"),
                );
                Ok(value)
            }
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "guest panicked".to_string()
    }
}
