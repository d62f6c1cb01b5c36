//! Admin gate and session persistence.
//!
//! The gate is a shared-secret check in front of the QR issuance pages. It is
//! explicitly not a trust boundary: the secret only gates the UI.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

/// Fixed cookie name the authenticated flag travels under.
pub const SESSION_COOKIE: &str = "seatrack_admin_session_v1";

/// The insecure admin secret shipped for development setups.
pub const DEFAULT_ADMIN_PASSWORD: &str = "seatrackadmindefault";

/// Storage-medium-independent access to admin sessions.
pub trait SessionRepository: Send + Sync {
    /// Whether the token belongs to an authenticated session.
    fn get(&self, token: &str) -> bool;

    /// Mark a token as authenticated.
    fn set(&self, token: &str);

    /// Forget a token.
    fn clear(&self, token: &str);
}

/// Session repository held in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionRepository {
    tokens: Mutex<HashSet<String>>,
}

impl MemorySessionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for MemorySessionRepository {
    fn get(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .expect("session lock poisoned")
            .contains(token)
    }

    fn set(&self, token: &str) {
        self.tokens
            .lock()
            .expect("session lock poisoned")
            .insert(token.to_string());
    }

    fn clear(&self, token: &str) {
        self.tokens
            .lock()
            .expect("session lock poisoned")
            .remove(token);
    }
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The secret matched; the token identifies the new session.
    Authenticated {
        /// Opaque session token handed to the browser.
        token: String,
    },

    /// The secret did not match. Callers surface a generic error that does
    /// not distinguish "wrong" from "unset".
    Incorrect,
}

/// Shared-secret check guarding the QR issuance pages.
pub struct AdminGate {
    secret: String,
    sessions: Arc<dyn SessionRepository>,
}

impl AdminGate {
    /// Create a gate over the configured secret and a session repository.
    pub fn new(secret: String, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { secret, sessions }
    }

    /// Compare an attempted secret (exact, case-sensitive) and open a session
    /// on match.
    pub fn login(&self, attempt: &str) -> LoginOutcome {
        if attempt == self.secret {
            let token = Uuid::new_v4().to_string();
            self.sessions.set(&token);
            info!("Admin session opened");
            LoginOutcome::Authenticated { token }
        } else {
            warn!("Admin login failed");
            LoginOutcome::Incorrect
        }
    }

    /// Whether the token restored from a persisted cookie is authenticated.
    pub fn is_authenticated(&self, token: Option<&str>) -> bool {
        token.is_some_and(|token| self.sessions.get(token))
    }

    /// Close a session.
    pub fn logout(&self, token: &str) {
        self.sessions.clear(token);
    }

    /// Whether the configured secret is still the insecure default.
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_ADMIN_PASSWORD
    }
}
