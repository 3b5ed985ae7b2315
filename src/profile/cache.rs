//! In-memory profile cache. The backend is authoritative: updates replace the
//! cached value with whatever the backend returns, never a local merge.
//!
//! A cached profile belongs to the session that fetched it. Once the active
//! credential changes the entry is treated as absent and refetched.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::model::{Profile, ProfileUpdate};
use crate::api::Backend;
use crate::error::{Error, Result};
use crate::session::{Session, SessionStore};

struct CachedProfile {
    owner: Session,
    profile: Profile,
}

pub struct ProfileCache {
    backend: Arc<dyn Backend>,
    sessions: Arc<SessionStore>,
    entry: RwLock<Option<CachedProfile>>,
}

impl ProfileCache {
    pub fn new(backend: Arc<dyn Backend>, sessions: Arc<SessionStore>) -> Self {
        Self {
            backend,
            sessions,
            entry: RwLock::new(None),
        }
    }

    /// Fetch the current profile and replace the cache.
    pub async fn fetch(&self) -> Result<Profile> {
        let session = self.sessions.current().await.ok_or(Error::Unauthenticated)?;
        let profile = self.backend.fetch_profile(&session).await?;
        tracing::debug!(user_id = %profile.id, "Profile fetched");
        self.store(session, profile.clone()).await;
        Ok(profile)
    }

    /// Cached profile, fetching it first if the cache is empty or was filled
    /// under another session.
    pub async fn get_or_fetch(&self) -> Result<Profile> {
        if let Some(profile) = self.current().await {
            return Ok(profile);
        }
        self.fetch().await
    }

    /// Send a partial update; the cache becomes the backend's response.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile> {
        let session = self.sessions.current().await.ok_or(Error::Unauthenticated)?;
        let profile = self.backend.update_profile(&session, update).await?;
        tracing::info!(user_id = %profile.id, "Profile updated");
        self.store(session, profile.clone()).await;
        Ok(profile)
    }

    /// The cached profile, if it was fetched under the active session.
    pub async fn current(&self) -> Option<Profile> {
        let session = self.sessions.current().await?;
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|entry| entry.owner.same_credential(&session))
            .map(|entry| entry.profile.clone())
    }

    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }

    async fn store(&self, owner: Session, profile: Profile) {
        *self.entry.write().await = Some(CachedProfile { owner, profile });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{GOOD_OTP, GOOD_PASSWORD, StubBackend};
    use crate::store::MemoryStore;

    async fn cache(signed_in: bool) -> (ProfileCache, Arc<StubBackend>) {
        let (cache, backend, _) = cache_with_sessions(signed_in).await;
        (cache, backend)
    }

    async fn cache_with_sessions(
        signed_in: bool,
    ) -> (ProfileCache, Arc<StubBackend>, Arc<SessionStore>) {
        let backend = StubBackend::new();
        let sessions = Arc::new(SessionStore::new(
            backend.clone(),
            Arc::new(MemoryStore::new()),
        ));
        sessions.load().await;
        if signed_in {
            sessions.login("ada@example.com", GOOD_PASSWORD).await.unwrap();
        }
        (
            ProfileCache::new(backend.clone(), sessions.clone()),
            backend,
            sessions,
        )
    }

    #[tokio::test]
    async fn fetch_without_session_is_unauthenticated() {
        let (cache, backend) = cache(false).await;
        assert!(matches!(cache.fetch().await, Err(Error::Unauthenticated)));
        assert!(matches!(
            cache.update(&ProfileUpdate::default()).await,
            Err(Error::Unauthenticated)
        ));
        assert!(!backend.calls().contains(&"fetch_profile".to_string()));
    }

    #[tokio::test]
    async fn fetch_sends_credential_and_caches() {
        let (cache, backend) = cache(true).await;
        assert!(cache.current().await.is_none());

        let profile = cache.fetch().await.unwrap();
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(cache.current().await, Some(profile));
        assert_eq!(
            backend.last_auth.lock().unwrap().as_deref(),
            Some("Bearer login-token")
        );
    }

    #[tokio::test]
    async fn update_replaces_with_backend_representation() {
        let (cache, _) = cache(true).await;
        cache.fetch().await.unwrap();

        let update = ProfileUpdate {
            industry: Some("tech".to_string()),
            ..Default::default()
        };
        let updated = cache.update(&update).await.unwrap();
        // Backend uppercased it; the cache follows the backend, not the request.
        assert_eq!(updated.industry.as_deref(), Some("TECH"));
        assert_eq!(
            cache.current().await.unwrap().industry.as_deref(),
            Some("TECH")
        );
    }

    #[tokio::test]
    async fn get_or_fetch_hits_backend_once() {
        let (cache, backend) = cache(true).await;
        cache.get_or_fetch().await.unwrap();
        cache.get_or_fetch().await.unwrap();
        let fetches = backend
            .calls()
            .iter()
            .filter(|c| *c == "fetch_profile")
            .count();
        assert_eq!(fetches, 1);

        cache.clear().await;
        assert!(cache.current().await.is_none());
    }

    #[tokio::test]
    async fn new_session_refetches_profile() {
        let (cache, backend, sessions) = cache_with_sessions(true).await;
        assert_eq!(cache.get_or_fetch().await.unwrap().email, "ada@example.com");

        {
            let mut profile = backend.profile.lock().unwrap();
            profile.email = "bob@example.com".to_string();
            profile.username = "Bob".to_string();
        }
        // Same credential: still served from the cache.
        assert_eq!(cache.get_or_fetch().await.unwrap().email, "ada@example.com");

        sessions
            .verify_code("bob@example.com", GOOD_OTP)
            .await
            .unwrap();
        assert!(cache.current().await.is_none());
        let profile = cache.get_or_fetch().await.unwrap();
        assert_eq!(profile.email, "bob@example.com");
        assert_eq!(
            backend.last_auth.lock().unwrap().as_deref(),
            Some("Bearer verified-token")
        );
    }

    #[tokio::test]
    async fn signed_out_cache_reports_nothing() {
        let (cache, _, sessions) = cache_with_sessions(true).await;
        cache.fetch().await.unwrap();
        sessions.logout().await;
        assert!(cache.current().await.is_none());
    }
}
