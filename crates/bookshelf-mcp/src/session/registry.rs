//! Session registry: id → owning stream connection.
//!
//! A session exists exactly as long as its [`SessionHandle`]: the handle is
//! moved into the stream body, and dropping the body (peer disconnect) drops
//! the handle, which releases the id.
//!
//! Ids are 128 bits from the OS RNG. There is no collision check; with that
//! key space a clash between live sessions is treated as impossible.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::transport::StreamConnection;

/// Generate a fresh 128-bit session id, hex-encoded (32 chars).
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Live sessions, owned by the server instance and shared by handle.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<StreamConnection>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under a new id. The session lives until the
    /// returned handle is dropped.
    pub fn allocate(self: &Arc<Self>, connection: Arc<StreamConnection>) -> SessionHandle {
        let id = generate_session_id();
        self.sessions.write().insert(id.clone(), connection);
        tracing::info!(session = %id, "Session opened");
        SessionHandle {
            id,
            registry: Arc::downgrade(self),
        }
    }

    /// The connection for `id`, if the session is live.
    pub fn lookup(&self, id: &str) -> Option<Arc<StreamConnection>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session. Returns whether it was present; repeat calls are no-ops.
    pub fn release(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Snapshot of every live session.
    pub fn connections(&self) -> Vec<(String, Arc<StreamConnection>)> {
        self.sessions
            .read()
            .iter()
            .map(|(id, conn)| (id.clone(), conn.clone()))
            .collect()
    }
}

/// Ownership token for one session; releases the id when dropped.
#[derive(Debug)]
pub struct SessionHandle {
    id: String,
    registry: Weak<SessionRegistry>,
}

impl SessionHandle {
    /// The session id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.release(&self.id) {
                tracing::info!(session = %self.id, "Session closed");
            }
        }
    }
}
