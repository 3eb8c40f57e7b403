//! Who is using the client, and the token that proves it.

use std::sync::{Arc, Mutex};

use tracing::{info, instrument, warn};

use crate::backend::LeaveBackend;
use crate::domain::User;
use crate::error::{LeaveError, Result};

/// Where the bearer token lives between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    user: User,
    must_change_password: bool,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        let must_change_password = user.must_change_password;
        Self {
            token: token.into(),
            user,
            must_change_password,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// HR managers and HR executives may approve and reject.
    pub fn is_hr(&self) -> bool {
        self.user.is_hr()
    }

    pub fn must_change_password(&self) -> bool {
        self.must_change_password
    }
}

/// Owns the session lifecycle: hydrate from a stored token, log in, tear
/// down. Handed to whoever needs to know who is acting.
#[derive(Clone)]
pub struct SessionContext {
    backend: Arc<dyn LeaveBackend>,
    store: Arc<dyn TokenStore>,
}

impl SessionContext {
    pub fn new(backend: Arc<dyn LeaveBackend>, store: Arc<dyn TokenStore>) -> Self {
        Self { backend, store }
    }

    /// Restore the previous session if its token still checks out.
    ///
    /// A token the server refuses is removed from the store.
    #[instrument(skip(self))]
    pub async fn init(&self) -> Result<Option<Session>> {
        let Some(token) = self.store.load()? else {
            return Ok(None);
        };

        match self.backend.me(&token).await {
            Ok(user) => {
                info!(user_id = user.id, "session restored");
                Ok(Some(Session::new(token, user)))
            }
            Err(LeaveError::Unauthenticated(msg)) | Err(LeaveError::Forbidden(msg)) => {
                warn!(%msg, "stored token rejected, clearing it");
                self.store.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self.backend.login(email, password).await?;
        self.store.save(&response.token)?;
        info!(user_id = response.user.id, "logged in");

        let mut session = Session::new(response.token, response.user);
        session.must_change_password |= response.must_change_password;
        Ok(session)
    }

    /// Forget the token and the cached user.
    pub fn teardown(&self, session: Option<Session>) -> Result<()> {
        drop(session);
        self.store.clear()?;
        info!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;

    #[tokio::test]
    async fn init_without_token_is_logged_out() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let ctx = SessionContext::new(backend, Arc::new(MemoryTokenStore::new()));
        assert!(ctx.init().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn login_persists_token_and_init_restores_it() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = Arc::new(MemoryTokenStore::new());
        let ctx = SessionContext::new(backend, store.clone());

        let session = ctx
            .login(InMemoryBackend::HR_EMAIL, InMemoryBackend::PASSWORD)
            .await
            .unwrap();
        assert!(session.is_hr());
        assert_eq!(store.load().unwrap().as_deref(), Some(session.token()));

        let restored = ctx.init().await.unwrap().expect("session restored");
        assert_eq!(restored.user().id, session.user().id);
    }

    #[tokio::test]
    async fn rejected_token_is_cleared() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = Arc::new(MemoryTokenStore::with_token("stale-token"));
        let ctx = SessionContext::new(backend, store.clone());

        assert!(ctx.init().await.unwrap().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn bad_password_is_an_authentication_error() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = Arc::new(MemoryTokenStore::new());
        let ctx = SessionContext::new(backend, store.clone());

        let err = ctx
            .login(InMemoryBackend::EMPLOYEE_EMAIL, "wrong")
            .await
            .unwrap_err();
        assert!(err.is_unauthenticated());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn teardown_clears_store() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = Arc::new(MemoryTokenStore::new());
        let ctx = SessionContext::new(backend, store.clone());
        let session = ctx
            .login(InMemoryBackend::EMPLOYEE_EMAIL, InMemoryBackend::PASSWORD)
            .await
            .unwrap();
        assert!(!session.is_hr());

        ctx.teardown(Some(session)).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
