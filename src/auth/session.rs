//! Per-session login state.
//!
//! Each connected user gets their own [`Session`], looked up by an opaque
//! id handed out at login time. Nothing here is process-global: concurrent
//! users never observe each other's state.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use ulid::Ulid;

use crate::auth::config::CredentialSet;
use crate::auth::verifier;
use crate::errors::Error;

/// One user's login state. Starts anonymous; only a successful login sets
/// both fields, and logout clears both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
    username: String,
}

impl Session {
    /// Attempt the `Anonymous -> Authenticated` transition.
    ///
    /// Fires only when the username exists in the credential set AND the
    /// password verifies. On any failure the session is left untouched.
    ///
    /// # Errors
    /// [`Error::UnknownUser`], [`Error::BadPassword`], or
    /// [`Error::HashFormat`].
    pub fn login(
        &mut self,
        credentials: &CredentialSet,
        username: &str,
        password: &str,
    ) -> Result<(), Error> {
        let stored_hash = credentials.hash_for(username).ok_or(Error::UnknownUser)?;

        verifier::verify(password, stored_hash)?;

        self.authenticated = true;
        self.username = username.to_string();

        Ok(())
    }

    /// `Authenticated -> Anonymous`.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.username.clear();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

struct Entry {
    session: Session,
    expires_at: Instant,
}

/// Registry of live sessions keyed by the opaque id stored in the cookie.
///
/// The only mutable shared state in the process; everything else is loaded
/// once and read-only.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Entry>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Verify the credentials and, on success, register a fresh session.
    ///
    /// # Errors
    /// Same as [`Session::login`]; no session is created on failure.
    pub async fn login(
        &self,
        credentials: &CredentialSet,
        username: &str,
        password: &str,
    ) -> Result<String, Error> {
        let mut session = Session::default();
        session.login(credentials, username, password)?;

        let id = Ulid::new().to_string();
        let entry = Entry {
            session,
            expires_at: Instant::now() + self.ttl,
        };

        self.sessions.lock().await.insert(id.clone(), entry);

        debug!("session opened for {username}");

        Ok(id)
    }

    /// Resolve a session id into its session, dropping it when expired.
    pub async fn authenticate(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;

        match sessions.get(id) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.session.clone()),
            Some(_) => {
                sessions.remove(id);
                None
            }
            None => None,
        }
    }

    /// Drop a session. Unknown ids are a no-op so logout is idempotent.
    pub async fn logout(&self, id: &str) {
        if let Some(entry) = self.sessions.lock().await.remove(id) {
            debug!("session closed for {}", entry.session.username());
        }
    }

    /// Number of live entries, counting not-yet-purged expired ones.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CredentialSet {
        let hash = verifier::hash("senha123").unwrap();
        CredentialSet::new(
            vec!["João Silva".into()],
            vec!["joao".into()],
            vec![hash],
            "consulta_cookie".into(),
            "signing-key".into(),
            30,
        )
        .unwrap()
    }

    #[test]
    fn successful_login_sets_identity() {
        let creds = credentials();
        let mut session = Session::default();

        session.login(&creds, "joao", "senha123").unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.username(), "joao");
    }

    #[test]
    fn wrong_password_keeps_session_anonymous() {
        let creds = credentials();
        let mut session = Session::default();

        let err = session.login(&creds, "joao", "wrong").unwrap_err();

        assert!(matches!(err, Error::BadPassword));
        assert!(!session.is_authenticated());
        assert_eq!(session.username(), "");
    }

    #[test]
    fn unknown_user_keeps_session_anonymous() {
        let creds = credentials();
        let mut session = Session::default();

        let err = session.login(&creds, "maria", "senha123").unwrap_err();

        assert!(matches!(err, Error::UnknownUser));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_both_fields() {
        let creds = credentials();
        let mut session = Session::default();
        session.login(&creds, "joao", "senha123").unwrap();

        session.logout();

        assert!(!session.is_authenticated());
        assert_eq!(session.username(), "");
    }

    #[test]
    fn malformed_stored_hash_surfaces_distinctly() {
        let creds = CredentialSet::new(
            vec!["João".into()],
            vec!["joao".into()],
            vec!["not-a-hash".into()],
            "c".into(),
            "k".into(),
            30,
        )
        .unwrap();
        let mut session = Session::default();

        let err = session.login(&creds, "joao", "senha123").unwrap_err();

        assert!(matches!(err, Error::HashFormat));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn store_login_then_authenticate() {
        let creds = credentials();
        let store = SessionStore::new(Duration::from_secs(60));

        let id = store.login(&creds, "joao", "senha123").await.unwrap();
        let session = store.authenticate(&id).await.unwrap();

        assert_eq!(session.username(), "joao");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn failed_login_registers_nothing() {
        let creds = credentials();
        let store = SessionStore::new(Duration::from_secs(60));

        assert!(store.login(&creds, "joao", "wrong").await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn expired_session_no_longer_authenticates() {
        let creds = credentials();
        let store = SessionStore::new(Duration::from_secs(0));

        let id = store.login(&creds, "joao", "senha123").await.unwrap();

        assert!(store.authenticate(&id).await.is_none());
        assert!(store.is_empty().await, "expired entry is purged on access");
    }

    #[tokio::test]
    async fn logout_invalidates_the_id() {
        let creds = credentials();
        let store = SessionStore::new(Duration::from_secs(60));

        let id = store.login(&creds, "joao", "senha123").await.unwrap();
        store.logout(&id).await;

        assert!(store.authenticate(&id).await.is_none());

        // Idempotent.
        store.logout(&id).await;
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let hash = verifier::hash("senha123").unwrap();
        let creds = CredentialSet::new(
            vec!["João".into(), "Maria".into()],
            vec!["joao".into(), "maria".into()],
            vec![hash.clone(), hash],
            "c".into(),
            "k".into(),
            30,
        )
        .unwrap();
        let store = SessionStore::new(Duration::from_secs(60));

        let a = store.login(&creds, "joao", "senha123").await.unwrap();
        let b = store.login(&creds, "maria", "senha123").await.unwrap();
        assert_ne!(a, b);

        store.logout(&a).await;

        assert!(store.authenticate(&a).await.is_none());
        let still = store.authenticate(&b).await.unwrap();
        assert_eq!(still.username(), "maria");
    }
}
