//! Backend collaborator interface.
//!
//! [`Backend`] is the seam every service talks through; [`HttpBackend`] is the
//! reqwest implementation against the real service. Tests substitute stubs.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{CareerPathRequest, UploadReceipt};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::profile::{Profile, ProfileUpdate};
use crate::session::Session;

/// Every backend endpoint the client consumes.
///
/// Implementations fail with `Error::Config` when no backend is configured,
/// `Error::Api` for transport/status/decoding failures.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/auth/signup`: create a pending account.
    async fn signup(&self, email: &str, username: &str, password: &str) -> Result<Value>;

    /// `POST /api/auth/login`: exchange credentials for a session.
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    /// `POST /api/auth/request-otp`
    async fn request_otp(&self, email: &str) -> Result<Value>;

    /// `POST /api/auth/verify-otp`: verify the emailed code, yielding a session.
    async fn verify_otp(&self, email: &str, code: &str) -> Result<Session>;

    /// `POST /api/auth/refresh-otp`: resend a fresh code.
    async fn refresh_otp(&self, email: &str) -> Result<Value>;

    /// `GET /api/profile/me`
    async fn fetch_profile(&self, session: &Session) -> Result<Profile>;

    /// `PUT /api/profile/me`: returns the backend's updated representation.
    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<Profile>;

    /// `POST /api/cv/upload` (multipart).
    async fn upload_cv(
        &self,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt>;

    /// `POST /api/career-path/generate`: returns the raw roadmap payload.
    async fn generate_career_path(
        &self,
        session: &Session,
        request: &CareerPathRequest,
    ) -> Result<Value>;

    /// `GET /api/career-path/for-user/{id}`: `Ok(None)` when the backend
    /// answers 404 (the user has no roadmap yet).
    async fn career_path_for_user(&self, session: &Session, user_id: &str)
    -> Result<Option<Value>>;
}

#[cfg(test)]
pub(crate) mod stub;
