//! Scripted in-process backend for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use super::{Backend, CareerPathRequest, UploadReceipt};
use crate::error::{ApiError, Result};
use crate::profile::{Profile, ProfileUpdate};
use crate::session::Session;

pub(crate) const GOOD_PASSWORD: &str = "hunter22";
pub(crate) const GOOD_OTP: &str = "123456";

pub(crate) struct StubBackend {
    pub calls: Mutex<Vec<String>>,
    pub profile: Mutex<Profile>,
    pub roadmap: Mutex<Option<Value>>,
    pub generate_response: Mutex<Value>,
    pub last_request: Mutex<Option<CareerPathRequest>>,
    pub last_auth: Mutex<Option<String>>,
    pub fail_upload: AtomicBool,
    pub fail_generate: AtomicBool,
    /// When set, `generate_career_path` and `upload_cv` wait for a notification.
    pub gate: Mutex<Option<Arc<Notify>>>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            profile: Mutex::new(sample_profile()),
            roadmap: Mutex::new(None),
            generate_response: Mutex::new(json!({
                "career_roadmap": {"stage_1_mirror": {"title": "Engineer"}}
            })),
            last_request: Mutex::new(None),
            last_auth: Mutex::new(None),
            fail_upload: AtomicBool::new(false),
            fail_generate: AtomicBool::new(false),
            gate: Mutex::new(None),
        }
    }
}

pub(crate) fn sample_profile() -> Profile {
    Profile {
        id: "user-7".to_string(),
        username: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        is_verified: true,
        industry: None,
        experience_years: None,
        current_role: None,
        career_goals: None,
        location: None,
        immigration_status: None,
        visa_status: None,
    }
}

fn status(status: u16, message: &str) -> crate::error::Error {
    ApiError::Status {
        status,
        message: message.to_string(),
    }
    .into()
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn record_auth(&self, session: &Session) {
        *self.last_auth.lock().unwrap() = Some(session.authorization());
    }

    async fn wait_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn signup(&self, email: &str, _username: &str, _password: &str) -> Result<Value> {
        self.record("signup");
        if email.starts_with("taken") {
            return Err(status(409, "Email already registered"));
        }
        Ok(json!({"message": "OTP sent"}))
    }

    async fn login(&self, _email: &str, password: &str) -> Result<Session> {
        self.record("login");
        if password != GOOD_PASSWORD {
            return Err(status(401, "Invalid email or password"));
        }
        Ok(Session::new("login-token", "Bearer"))
    }

    async fn request_otp(&self, _email: &str) -> Result<Value> {
        self.record("request_otp");
        Ok(json!({"message": "sent"}))
    }

    async fn verify_otp(&self, _email: &str, code: &str) -> Result<Session> {
        self.record("verify_otp");
        if code != GOOD_OTP {
            return Err(status(400, "Invalid or expired OTP"));
        }
        Ok(Session::new("verified-token", "Bearer"))
    }

    async fn refresh_otp(&self, _email: &str) -> Result<Value> {
        self.record("refresh_otp");
        Ok(json!({"message": "resent"}))
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Profile> {
        self.record("fetch_profile");
        self.record_auth(session);
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<Profile> {
        self.record("update_profile");
        self.record_auth(session);
        let mut profile = self.profile.lock().unwrap();
        if let Some(location) = &update.location {
            profile.location = Some(location.clone());
        }
        if let Some(role) = &update.current_role {
            profile.current_role = Some(role.clone());
        }
        // The backend normalizes industry names.
        if let Some(industry) = &update.industry {
            profile.industry = Some(industry.to_uppercase());
        }
        Ok(profile.clone())
    }

    async fn upload_cv(
        &self,
        session: &Session,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadReceipt> {
        self.record("upload_cv");
        self.record_auth(session);
        self.wait_gate().await;
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(status(413, "File too large"));
        }
        Ok(UploadReceipt {
            file_name: file_name.to_string(),
            response: json!({"filename": file_name}),
        })
    }

    async fn generate_career_path(
        &self,
        session: &Session,
        request: &CareerPathRequest,
    ) -> Result<Value> {
        self.record("generate_career_path");
        self.record_auth(session);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.wait_gate().await;
        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(status(500, "Failed to generate career path"));
        }
        Ok(self.generate_response.lock().unwrap().clone())
    }

    async fn career_path_for_user(
        &self,
        session: &Session,
        _user_id: &str,
    ) -> Result<Option<Value>> {
        self.record("career_path_for_user");
        self.record_auth(session);
        Ok(self.roadmap.lock().unwrap().clone())
    }
}
