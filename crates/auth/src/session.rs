use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::token::AuthToken;

/// What the client knows about the signed-in user.
///
/// A default session is anonymous: no token, no identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: Option<AuthToken>,
    username: Option<String>,
    /// Wallet balance reported at login.
    balance: Option<f64>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(token: AuthToken, username: impl Into<String>, balance: Option<f64>) -> Self {
        Self {
            token: Some(token),
            username: Some(username.into()),
            balance,
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn balance(&self) -> Option<f64> {
        self.balance
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

/// Holder of the current session.
///
/// Readers take a snapshot; nothing downstream mutates the session through it.
pub trait SessionStore: Send + Sync {
    fn current(&self) -> Session;

    fn replace(&self, session: Session);

    /// Forget the token and identity.
    fn logout(&self) {
        self.replace(Session::anonymous());
    }
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Session>,
}

impl InMemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn current(&self) -> Session {
        match self.inner.read() {
            Ok(session) => session.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn replace(&self, session: Session) {
        let signed_in = session.is_signed_in();
        match self.inner.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
        tracing::debug!(signed_in, "session replaced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> Session {
        Session::signed_in(AuthToken::new("tok").unwrap(), "crio.do", Some(5000.0))
    }

    #[test]
    fn anonymous_session_has_no_token() {
        let session = Session::anonymous();
        assert!(!session.is_signed_in());
        assert!(session.token().is_none());
        assert_eq!(session.username(), None);
    }

    #[test]
    fn signed_in_session_exposes_identity() {
        let session = signed_in();
        assert_eq!(session.token().map(AuthToken::expose), Some("tok"));
        assert_eq!(session.username(), Some("crio.do"));
        assert_eq!(session.balance(), Some(5000.0));
    }

    #[test]
    fn store_returns_snapshots() {
        let store = InMemorySessionStore::new(signed_in());
        let snapshot = store.current();
        store.replace(Session::anonymous());
        assert!(snapshot.is_signed_in());
        assert!(!store.current().is_signed_in());
    }

    #[test]
    fn logout_clears_everything() {
        let store = InMemorySessionStore::new(signed_in());
        store.logout();
        assert_eq!(store.current(), Session::anonymous());
    }

    #[test]
    fn session_serializes_token_for_persistence() {
        let json = serde_json::to_value(signed_in()).unwrap();
        assert_eq!(json["username"], "crio.do");
        assert_eq!(json["token"], "tok");
    }
}
