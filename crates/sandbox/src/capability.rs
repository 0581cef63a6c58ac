//! Capability resolution: the only channel between guest code and the host.
//!
//! A [`CapabilityRegistry`] maps capability names to boxed async handlers.
//! The [`CapabilityBroker`] owns one registry per installed session; guests
//! reach it through a [`CapabilityPort`] scoped to their own session id, so
//! concurrent sessions can never observe each other's handlers.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use diagnostics::debug;

use crate::error::CapabilityError;
use crate::session::SessionId;

/// The `output` capability is the guest's reporting channel; its payload is
/// passed through untouched so the host sees exactly what the guest said.
pub const OUTPUT_CAPABILITY: &str = "output";

const METADATA_FIELD: &str = "$metadata";

type CapabilityHandler =
    Box<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Named host functions granted to one session.
#[derive(Default)]
pub struct CapabilityRegistry {
    handlers: HashMap<String, CapabilityHandler>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        CapabilityRegistry::default()
    }

    /// Registers a handler under `name`, replacing any previous one.
    pub fn register<S, F, Fut>(&mut self, name: S, handler: F)
    where
        S: Into<String>,
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.handlers.insert(
            name.into(),
            Box::new(move |payload| -> BoxFuture<'static, anyhow::Result<Value>> {
                Box::pin(handler(payload))
            }),
        );
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    fn get(&self, name: &str) -> Option<&CapabilityHandler> {
        self.handlers.get(name)
    }
}

/// Session-keyed arena of capability registries.
///
/// An explicitly owned value, not a global: whoever builds the sandbox owns
/// the broker, and dropping the sandbox drops every granted capability with
/// it.
#[derive(Default)]
pub struct CapabilityBroker {
    sessions: Mutex<HashMap<SessionId, Arc<CapabilityRegistry>>>,
}

impl CapabilityBroker {
    pub fn new() -> Self {
        CapabilityBroker::default()
    }

    /// Grants `registry` to `session`. A second install under the same id is
    /// refused and the first registry stays untouched.
    pub async fn install(
        &self,
        session: SessionId,
        registry: CapabilityRegistry,
    ) -> std::result::Result<(), CapabilityError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session) {
            return Err(CapabilityError::SessionCollision { session });
        }
        debug!(
            "installed {count} capabilities for session {session}",
            count: registry.handlers.len(),
            session: session.to_string(),
        );
        sessions.insert(session, Arc::new(registry));
        Ok(())
    }

    /// Revokes everything granted to `session`. Returns whether the session
    /// was installed; revoking an absent session is not an error so that
    /// cleanup paths can call this unconditionally.
    pub async fn uninstall(&self, session: SessionId) -> bool {
        let removed = self.sessions.lock().await.remove(&session).is_some();
        if removed {
            debug!("uninstalled capabilities for session {session}", session: session.to_string());
        }
        removed
    }

    pub async fn installed(&self, session: SessionId) -> bool {
        self.sessions.lock().await.contains_key(&session)
    }

    /// Resolves and runs a capability on behalf of `session`.
    ///
    /// Except for [`OUTPUT_CAPABILITY`], the `$metadata` field is stripped
    /// from object payloads before the handler sees them. A handler failure
    /// comes back to the guest as the value `{"error": message}` rather than
    /// as a host error.
    pub async fn invoke(
        &self,
        session: SessionId,
        name: &str,
        payload: Value,
    ) -> std::result::Result<Value, CapabilityError> {
        let registry = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(&session)
                .cloned()
                .ok_or_else(|| CapabilityError::Unavailable {
                    session,
                    name: name.to_string(),
                })?
        };
        let handler = registry.get(name).ok_or_else(|| CapabilityError::Unavailable {
            session,
            name: name.to_string(),
        })?;

        let payload = if name == OUTPUT_CAPABILITY {
            payload
        } else {
            strip_metadata(payload)
        };

        match handler(payload).await {
            Ok(value) => Ok(value),
            Err(e) => Ok(json!({ "error": e.to_string() })),
        }
    }
}

fn strip_metadata(payload: Value) -> Value {
    match payload {
        Value::Object(mut object) => {
            object.remove(METADATA_FIELD);
            Value::Object(object)
        }
        other => other,
    }
}

/// A guest's one and only handle on the host: the broker plus the guest's
/// own session id. Nothing else crosses the boundary.
pub struct CapabilityPort<'a> {
    broker: &'a CapabilityBroker,
    session: SessionId,
}

impl<'a> CapabilityPort<'a> {
    pub fn new(broker: &'a CapabilityBroker, session: SessionId) -> Self {
        CapabilityPort { broker, session }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub async fn call(
        &self,
        name: &str,
        payload: Value,
    ) -> std::result::Result<Value, CapabilityError> {
        self.broker.invoke(self.session, name, payload).await
    }
}
