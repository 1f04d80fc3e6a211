//! Session registry implementation.

use crate::error::{EngineError, Result};
use crate::types::{ConnectionId, Session};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// Maps display names to sessions and resolves connection identity.
///
/// The registry only tracks name ownership and connection binding; whether
/// a session survives a disconnect is decided by the engine, which can see
/// booking ownership. That split keeps the ordering invariant (release
/// connection-owned locks first, decide retention second) out of any event
/// handler and in one place.
pub struct SessionRegistry {
    /// Active sessions by display name.
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Claim a display name.
    ///
    /// Fails with `NameTaken` while the name belongs to any active session,
    /// connected or detached. The new session is bound to no connection;
    /// the transport calls [`associate`](Self::associate) once its
    /// real-time connection is up.
    pub fn login(&self, name: &str) -> Result<Session> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(name) {
            return Err(EngineError::NameTaken(name.to_string()));
        }

        let session = Session::detached(name);
        sessions.insert(name.to_string(), session.clone());
        info!(user = %name, "logged in");
        Ok(session)
    }

    /// Bind a connection identity to an existing session.
    ///
    /// Used both on first connect and to re-establish identity after a
    /// reconnect, so name-keyed booking ownership keeps working.
    pub fn associate(&self, name: &str, conn: ConnectionId) -> Result<()> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(name)
            .ok_or_else(|| EngineError::SessionNotFound(name.to_string()))?;

        session.connection = Some(conn);
        info!(user = %name, conn = %conn, "connection associated");
        Ok(())
    }

    /// Resolve which session owns a connection.
    pub fn resolve_connection(&self, conn: ConnectionId) -> Option<String> {
        self.sessions
            .read()
            .values()
            .find(|s| s.connection == Some(conn))
            .map(|s| s.name.clone())
    }

    /// Unbind a dying connection from its session.
    ///
    /// Returns the owning display name so the engine can make the retention
    /// decision. The session itself is left in place, detached.
    pub fn disconnect(&self, conn: ConnectionId) -> Option<String> {
        let mut sessions = self.sessions.write();
        let session = sessions.values_mut().find(|s| s.connection == Some(conn))?;

        session.connection = None;
        debug!(user = %session.name, conn = %conn, "connection unbound");
        Some(session.name.clone())
    }

    /// Delete a session, releasing the name for reuse.
    pub fn remove(&self, name: &str) {
        if self.sessions.write().remove(name).is_some() {
            info!(user = %name, "session removed");
        }
    }

    /// Get a session by name.
    pub fn get(&self, name: &str) -> Option<Session> {
        self.sessions.read().get(name).cloned()
    }

    /// Whether a name is currently claimed.
    pub fn contains(&self, name: &str) -> bool {
        self.sessions.read().contains_key(name)
    }

    /// Number of active sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
