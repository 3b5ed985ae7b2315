//! Application wiring: owns the services and the cross-service flows
//! (post-login landing, logout).

use std::sync::Arc;

use crate::api::{Backend, HttpBackend};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::guard::{Decision, Page, guard};
use crate::onboarding::OnboardingManager;
use crate::profile::ProfileCache;
use crate::roadmap::{Roadmap, load_stored_roadmap};
use crate::session::SessionStore;
use crate::store::{FileStore, KeyValueStore, save_json, storage_keys};

pub struct App {
    store: Arc<dyn KeyValueStore>,
    backend: Arc<dyn Backend>,
    sessions: Arc<SessionStore>,
    profiles: Arc<ProfileCache>,
    onboarding: Arc<OnboardingManager>,
}

impl App {
    /// Build the production stack: file storage under the data directory,
    /// the HTTP backend, and the persisted session restored.
    pub async fn init(config: &ClientConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone()));
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config)?);
        if config.backend_url.is_none() {
            tracing::warn!("No backend URL configured; network operations will fail");
        }
        Ok(Self::with_parts(backend, store).await)
    }

    /// Wire services over any backend and store, then load the session.
    pub async fn with_parts(backend: Arc<dyn Backend>, store: Arc<dyn KeyValueStore>) -> Self {
        let sessions = Arc::new(SessionStore::new(backend.clone(), store.clone()));
        let profiles = Arc::new(ProfileCache::new(backend.clone(), sessions.clone()));
        let onboarding = Arc::new(OnboardingManager::new(
            backend.clone(),
            sessions.clone(),
            profiles.clone(),
            store.clone(),
        ));
        sessions.load().await;
        Self {
            store,
            backend,
            sessions,
            profiles,
            onboarding,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn profiles(&self) -> &ProfileCache {
        &self.profiles
    }

    pub fn onboarding(&self) -> &OnboardingManager {
        &self.onboarding
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Route-guard decision for `page` in the current session state.
    pub async fn navigate(&self, page: Page) -> Decision {
        guard(page, &self.sessions.state().await)
    }

    /// Where a freshly authenticated user goes: their existing roadmap if the
    /// backend has one (persisted locally on the way), onboarding otherwise.
    pub async fn landing_page(&self) -> Result<Page> {
        let session = self.sessions.current().await.ok_or(Error::Unauthenticated)?;
        let profile = self.profiles.fetch().await?;

        match self
            .backend
            .career_path_for_user(&session, &profile.id)
            .await?
        {
            Some(roadmap) => {
                if let Err(e) =
                    save_json(self.store.as_ref(), storage_keys::CAREER_PATH, &roadmap).await
                {
                    tracing::warn!(error = %e, "Failed to persist career path");
                }
                tracing::info!(user_id = %profile.id, "Existing career path found");
                Ok(Page::CareerPath)
            }
            None => {
                tracing::info!(user_id = %profile.id, "No career path yet");
                Ok(Page::Onboarding)
            }
        }
    }

    /// The locally persisted roadmap, if it is usable.
    pub async fn stored_roadmap(&self) -> Option<Roadmap> {
        load_stored_roadmap(self.store.as_ref()).await
    }

    /// Sign out: drop the session, the cached profile, and any wizard progress.
    pub async fn logout(&self) {
        self.sessions.logout().await;
        self.profiles.clear().await;
        self.onboarding.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::stub::{GOOD_PASSWORD, StubBackend};
    use crate::store::MemoryStore;

    async fn app() -> (App, Arc<StubBackend>, Arc<MemoryStore>) {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        let app = App::with_parts(backend.clone(), store.clone()).await;
        (app, backend, store)
    }

    #[tokio::test]
    async fn starts_signed_out_and_guards() {
        let (app, _, _) = app().await;
        assert!(app.sessions().is_loaded().await);
        assert_eq!(
            app.navigate(Page::CareerPath).await,
            Decision::Redirect(Page::Login)
        );
        assert_eq!(app.navigate(Page::Login).await, Decision::Show);
    }

    #[tokio::test]
    async fn landing_requires_session() {
        let (app, _, _) = app().await;
        assert!(matches!(
            app.landing_page().await,
            Err(Error::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn landing_without_roadmap_goes_to_onboarding() {
        let (app, backend, store) = app().await;
        app.sessions()
            .login("ada@example.com", GOOD_PASSWORD)
            .await
            .unwrap();

        assert_eq!(app.landing_page().await.unwrap(), Page::Onboarding);
        assert_eq!(
            backend.calls(),
            vec!["login", "fetch_profile", "career_path_for_user"]
        );
        assert!(store.get(storage_keys::CAREER_PATH).await.unwrap().is_none());
        assert_eq!(app.navigate(Page::Login).await, Decision::Redirect(Page::Onboarding));
    }

    #[tokio::test]
    async fn landing_with_roadmap_persists_it() {
        let (app, backend, _) = app().await;
        *backend.roadmap.lock().unwrap() =
            Some(json!({"career_roadmap": {"stage_4_readiness": {"title": "Almost"}}}));
        app.sessions()
            .login("ada@example.com", GOOD_PASSWORD)
            .await
            .unwrap();

        assert_eq!(app.landing_page().await.unwrap(), Page::CareerPath);
        let roadmap = app.stored_roadmap().await.unwrap();
        assert_eq!(roadmap.stage(4).unwrap().header().title, "Almost");
    }

    #[tokio::test]
    async fn logout_clears_session_profile_and_wizard() {
        let (app, _, _) = app().await;
        app.sessions()
            .login("ada@example.com", GOOD_PASSWORD)
            .await
            .unwrap();
        app.profiles().fetch().await.unwrap();
        app.onboarding().select_option("Yes").await.unwrap();

        app.logout().await;
        assert!(app.sessions().current().await.is_none());
        assert!(app.profiles().current().await.is_none());
        assert!(app.onboarding().snapshot().await.answers().is_empty());
    }

    #[tokio::test]
    async fn init_without_backend_url_fails_on_use() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::default().with_data_dir(dir.path());
        let app = App::init(&config).await.unwrap();

        let err = app
            .sessions()
            .login("ada@example.com", GOOD_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(crate::error::ConfigError::MissingBackendUrl)
        ));
    }
}
