//! SessionStore: owns the single active credential and its persisted copy.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::model::Session;
use super::validation;
use crate::api::Backend;
use crate::error::{ApiError, AuthError, Error, Result};
use crate::store::{KeyValueStore, save_json, storage_keys};

/// Where the session lifecycle currently stands.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// `load()` has not run yet.
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Holds the active session. All writes go through this type; last write wins.
pub struct SessionStore {
    backend: Arc<dyn Backend>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

/// Turn a backend failure on an auth exchange into an authentication error.
/// Configuration and transport failures pass through unchanged.
fn auth_failure(err: Error, fallback: &str) -> Error {
    match err {
        Error::Api(ApiError::Status { message, .. }) => AuthError::Rejected { message }.into(),
        Error::Api(ApiError::InvalidResponse { endpoint, reason }) => {
            tracing::warn!(%endpoint, %reason, "Unreadable auth response");
            AuthError::Rejected {
                message: fallback.to_string(),
            }
            .into()
        }
        other => other,
    }
}

impl SessionStore {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            store,
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// Restore the persisted credential, if any.
    ///
    /// Never fails: an unreadable or corrupt entry is logged, removed, and
    /// treated as signed out.
    pub async fn load(&self) -> Option<Session> {
        let loaded = match self.store.get(storage_keys::SESSION).await {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding corrupt persisted session");
                    if let Err(e) = self.store.remove(storage_keys::SESSION).await {
                        tracing::warn!(error = %e, "Failed to remove corrupt session entry");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted session");
                None
            }
        };

        let mut state = self.state.write().await;
        *state = match &loaded {
            Some(session) => SessionState::SignedIn(session.clone()),
            None => SessionState::SignedOut,
        };
        tracing::debug!(signed_in = loaded.is_some(), "Session loaded");
        loaded
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }

    pub async fn is_loaded(&self) -> bool {
        !self.state.read().await.is_loading()
    }

    /// Exchange email and password for a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validation::email(email)?;
        validation::password(password)?;

        let session = self
            .backend
            .login(email.trim(), password)
            .await
            .map_err(|e| auth_failure(e, "Login failed"))?;

        tracing::info!(email = email.trim(), "Logged in");
        self.activate(session.clone()).await;
        Ok(session)
    }

    /// Verify the emailed one-time code; success signs the user in.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<Session> {
        validation::email(email)?;
        validation::otp(code)?;

        let session = self
            .backend
            .verify_otp(email.trim(), code)
            .await
            .map_err(|e| auth_failure(e, "OTP verification failed"))?;

        tracing::info!(email = email.trim(), "Email verified");
        self.activate(session.clone()).await;
        Ok(session)
    }

    /// Create a pending account. The user must verify their email before a
    /// session exists, so this never touches the active session.
    pub async fn signup(&self, email: &str, username: &str, password: &str) -> Result<Value> {
        validation::email(email)?;
        validation::username(username)?;
        validation::new_password(password)?;

        self.backend
            .signup(email.trim(), username.trim(), password)
            .await
            .map_err(|e| auth_failure(e, "Signup failed"))
    }

    pub async fn request_otp(&self, email: &str) -> Result<Value> {
        validation::email(email)?;
        self.backend
            .request_otp(email.trim())
            .await
            .map_err(|e| auth_failure(e, "Failed to request OTP"))
    }

    /// Ask the backend to resend a fresh verification code.
    pub async fn refresh_otp(&self, email: &str) -> Result<Value> {
        validation::email(email)?;
        self.backend
            .refresh_otp(email.trim())
            .await
            .map_err(|e| auth_failure(e, "Failed to refresh OTP"))
    }

    /// Clear the active session and its persisted copy. Idempotent.
    pub async fn logout(&self) {
        *self.state.write().await = SessionState::SignedOut;
        if let Err(e) = self.store.remove(storage_keys::SESSION).await {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
        tracing::info!("Logged out");
    }

    /// Make `session` the active one and persist it. A persistence failure
    /// leaves the in-memory session active.
    async fn activate(&self, session: Session) {
        if let Err(e) = save_json(self.store.as_ref(), storage_keys::SESSION, &session).await {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        *self.state.write().await = SessionState::SignedIn(session);
    }
}
