//! In-memory session management
//!
//! Maps opaque session tokens to authenticated identities. `TokenSession`
//! adapts a (registry, token) pair to the `SessionProvider` port so services
//! can resolve "who is calling" without knowing about tokens.

use std::collections::HashMap;
use std::sync::Arc;

use fieldmachine_core::profile::ports::SessionProvider;
use fieldmachine_domain::AuthIdentity;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

/// Registry of active sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, AuthIdentity>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for an identity, returning the opaque token.
    pub fn sign_in(&self, identity: AuthIdentity) -> String {
        let token = Uuid::new_v4().to_string();
        info!(auth_user_id = %identity, "session opened");
        self.sessions.write().insert(token.clone(), identity);
        token
    }

    /// Close the session for a token. Unknown tokens are ignored.
    pub fn sign_out(&self, token: &str) {
        if let Some(identity) = self.sessions.write().remove(token) {
            info!(auth_user_id = %identity, "session closed");
        }
    }

    /// Resolve the identity behind a token, if the session is still open.
    pub fn resolve(&self, token: &str) -> Option<AuthIdentity> {
        self.sessions.read().get(token).cloned()
    }
}

/// A `SessionProvider` bound to one token against a shared registry.
pub struct TokenSession {
    registry: Arc<SessionRegistry>,
    token: Option<String>,
}

impl TokenSession {
    pub fn new(registry: Arc<SessionRegistry>, token: Option<String>) -> Self {
        Self { registry, token }
    }

    /// A provider that always reports "not signed in".
    pub fn anonymous(registry: Arc<SessionRegistry>) -> Self {
        Self { registry, token: None }
    }
}

impl SessionProvider for TokenSession {
    fn current_identity(&self) -> Option<AuthIdentity> {
        self.token.as_deref().and_then(|token| self.registry.resolve(token))
    }
}
