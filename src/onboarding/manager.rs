//! OnboardingManager drives the wizard against the backend (resume upload and
//! roadmap generation) and persists the generated roadmap.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;

use super::state::OnboardingWizard;
use crate::api::{Backend, UploadReceipt};
use crate::error::{Error, Result, UploadError, WizardError};
use crate::profile::ProfileCache;
use crate::session::SessionStore;
use crate::store::{KeyValueStore, save_json, storage_keys};

/// Coordinates the onboarding flow. The wizard lock is never held across a
/// backend call; results that come back after a [`reset`](Self::reset) are
/// dropped.
pub struct OnboardingManager {
    backend: Arc<dyn Backend>,
    sessions: Arc<SessionStore>,
    profiles: Arc<ProfileCache>,
    store: Arc<dyn KeyValueStore>,
    wizard: RwLock<OnboardingWizard>,
    epoch: AtomicU64,
}

impl OnboardingManager {
    pub fn new(
        backend: Arc<dyn Backend>,
        sessions: Arc<SessionStore>,
        profiles: Arc<ProfileCache>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::with_wizard(
            backend,
            sessions,
            profiles,
            store,
            OnboardingWizard::with_default_steps(),
        )
    }

    pub fn with_wizard(
        backend: Arc<dyn Backend>,
        sessions: Arc<SessionStore>,
        profiles: Arc<ProfileCache>,
        store: Arc<dyn KeyValueStore>,
        wizard: OnboardingWizard,
    ) -> Self {
        Self {
            backend,
            sessions,
            profiles,
            store,
            wizard: RwLock::new(wizard),
            epoch: AtomicU64::new(0),
        }
    }

    /// Copy of the wizard for display.
    pub async fn snapshot(&self) -> OnboardingWizard {
        self.wizard.read().await.clone()
    }

    pub async fn select_option(&self, value: &str) -> Result<usize> {
        Ok(self.wizard.write().await.select_option(value)?)
    }

    pub async fn next_step(&self) -> Result<usize> {
        Ok(self.wizard.write().await.next_step()?)
    }

    pub async fn prev_step(&self) -> usize {
        self.wizard.write().await.prev_step()
    }

    /// Read a resume from disk and upload it for the current file step.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadReceipt> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::ReadFailed {
                path: path.display().to_string(),
                reason: "not a file path".to_string(),
            })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        self.upload_bytes(&file_name, bytes).await
    }

    /// Upload `bytes` as the current file step's answer. The step completes
    /// only when the backend accepts the file; any failure clears the pick.
    /// Backend refusals surface as `UploadError::Rejected`, while configuration
    /// errors are returned as they are.
    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReceipt> {
        let session = self.sessions.current().await.ok_or(Error::Unauthenticated)?;

        let (step, epoch) = {
            let mut wizard = self.wizard.write().await;
            let step = wizard.begin_upload(file_name)?;
            (step, self.epoch.load(Ordering::SeqCst))
        };
        tracing::debug!(step, file_name, size = bytes.len(), "Uploading resume");

        let outcome = self.backend.upload_cv(&session, file_name, bytes).await;

        let mut wizard = self.wizard.write().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(file_name, "Discarding upload from a reset onboarding");
            return Err(WizardError::Superseded.into());
        }
        match outcome {
            Ok(receipt) => {
                wizard.complete_upload(step, file_name);
                tracing::info!(file_name, "Resume uploaded");
                Ok(receipt)
            }
            Err(Error::Api(api)) => {
                let reason = api.to_string();
                wizard.fail_upload(step, &reason);
                tracing::warn!(file_name, error = %reason, "Resume upload failed");
                Err(UploadError::Rejected {
                    file_name: file_name.to_string(),
                    reason,
                }
                .into())
            }
            // Not a verdict on the file: the request never reached the backend.
            Err(e) => {
                wizard.cancel_upload(step);
                tracing::warn!(file_name, error = %e, "Resume upload not attempted");
                Err(e)
            }
        }
    }

    /// Submit the collected answers. On success the raw roadmap payload is
    /// persisted under the career-path key and returned; on failure every
    /// answer is kept for a retry.
    pub async fn submit(&self) -> Result<Value> {
        let session = self.sessions.current().await.ok_or(Error::Unauthenticated)?;

        let (email, full_name) = match self.profiles.get_or_fetch().await {
            Ok(profile) => (profile.email, profile.username),
            Err(e) => {
                tracing::warn!(error = %e, "Submitting without profile details");
                (String::new(), String::new())
            }
        };

        let (request, epoch) = {
            let mut wizard = self.wizard.write().await;
            let request = wizard.begin_submission(&email, &full_name)?;
            (request, self.epoch.load(Ordering::SeqCst))
        };
        tracing::info!(industry = %request.industry, "Generating career path");

        let outcome = self.backend.generate_career_path(&session, &request).await;

        let mut wizard = self.wizard.write().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("Discarding career path from a reset onboarding");
            return Err(WizardError::Superseded.into());
        }
        match outcome {
            Ok(roadmap) => {
                if let Err(e) =
                    save_json(self.store.as_ref(), storage_keys::CAREER_PATH, &roadmap).await
                {
                    tracing::warn!(error = %e, "Failed to persist career path");
                }
                wizard.finish_submission();
                Ok(roadmap)
            }
            Err(e) => {
                wizard.abort_submission();
                tracing::warn!(error = %e, "Career path generation failed");
                Err(e)
            }
        }
    }

    /// Start over. Any upload or submission still in flight is ignored when it
    /// returns.
    pub async fn reset(&self) {
        let mut wizard = self.wizard.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let steps = wizard.steps().to_vec();
        *wizard = OnboardingWizard::new(steps).unwrap_or_default();
    }
}
