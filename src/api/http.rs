//! reqwest-backed [`Backend`] implementation.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Backend;
use super::types::{
    CareerPathRequest, EmailRequest, LoginRequest, SignupRequest, UploadReceipt,
    VerifyOtpRequest, error_message,
};
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, Error, Result};
use crate::profile::{Profile, ProfileUpdate};
use crate::session::Session;

/// A backend route plus the message shown when a failure carries no reason.
struct Endpoint {
    method: Method,
    path: &'static str,
    fallback: &'static str,
}

mod endpoints {
    use super::Endpoint;
    use reqwest::Method;

    pub(super) static SIGNUP: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/auth/signup",
        fallback: "Signup failed",
    };
    pub(super) static LOGIN: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/auth/login",
        fallback: "Login failed",
    };
    pub(super) static REQUEST_OTP: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/auth/request-otp",
        fallback: "Failed to request OTP",
    };
    pub(super) static VERIFY_OTP: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/auth/verify-otp",
        fallback: "OTP verification failed",
    };
    pub(super) static REFRESH_OTP: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/auth/refresh-otp",
        fallback: "Failed to refresh OTP",
    };
    pub(super) static PROFILE_GET: Endpoint = Endpoint {
        method: Method::GET,
        path: "/api/profile/me",
        fallback: "Failed to fetch user profile",
    };
    pub(super) static PROFILE_PUT: Endpoint = Endpoint {
        method: Method::PUT,
        path: "/api/profile/me",
        fallback: "Failed to update user profile",
    };
    pub(super) static CV_UPLOAD: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/cv/upload",
        fallback: "Failed to upload CV",
    };
    pub(super) static GENERATE: Endpoint = Endpoint {
        method: Method::POST,
        path: "/api/career-path/generate",
        fallback: "Failed to generate career path",
    };
    pub(super) static FOR_USER: Endpoint = Endpoint {
        method: Method::GET,
        path: "/api/career-path/for-user",
        fallback: "Failed to fetch career path",
    };
}

/// HTTP client for the career-path backend.
pub struct HttpBackend {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client".to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: config.backend_url.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> std::result::Result<String, ConfigError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or(ConfigError::MissingBackendUrl)?;
        Ok(format!("{base}{path}"))
    }

    fn request(
        &self,
        endpoint: &Endpoint,
        suffix: Option<&str>,
        session: Option<&Session>,
    ) -> Result<RequestBuilder> {
        let path = match suffix {
            Some(suffix) => format!("{}/{suffix}", endpoint.path),
            None => endpoint.path.to_string(),
        };
        let mut builder = self
            .client
            .request(endpoint.method.clone(), self.url(&path)?);
        if let Some(session) = session {
            builder = builder.header(AUTHORIZATION, session.authorization());
        }
        Ok(builder)
    }

    /// Send a request and return the status plus the decoded JSON body.
    /// Empty bodies decode as `Value::Null`.
    async fn send(
        &self,
        endpoint: &Endpoint,
        builder: RequestBuilder,
    ) -> Result<(StatusCode, Value)> {
        let resp = builder.send().await.map_err(|e| {
            tracing::warn!(endpoint = endpoint.path, error = %e, "Backend request failed");
            ApiError::Transport {
                endpoint: endpoint.path.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.path.to_string(),
            reason: e.to_string(),
        })?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                // Non-JSON error pages still carry a usable status.
                Err(_) if !status.is_success() => Value::Null,
                Err(e) => {
                    return Err(ApiError::InvalidResponse {
                        endpoint: endpoint.path.to_string(),
                        reason: format!("body is not JSON: {e}"),
                    }
                    .into());
                }
            }
        };

        Ok((status, body))
    }

    /// Map a non-success status into `ApiError::Status`.
    fn check(endpoint: &Endpoint, status: StatusCode, body: &Value) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }
        let message = error_message(body).unwrap_or_else(|| endpoint.fallback.to_string());
        tracing::warn!(
            endpoint = endpoint.path,
            status = status.as_u16(),
            %message,
            "Backend returned error status"
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    fn decode<T: DeserializeOwned>(endpoint: &Endpoint, body: Value) -> Result<T> {
        serde_json::from_value(body).map_err(|e| {
            Error::from(ApiError::InvalidResponse {
                endpoint: endpoint.path.to_string(),
                reason: e.to_string(),
            })
        })
    }

    async fn call_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        session: Option<&Session>,
        body: Option<&B>,
    ) -> Result<Value> {
        let mut builder = self.request(endpoint, None, session)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let (status, value) = self.send(endpoint, builder).await?;
        Self::check(endpoint, status, &value)?;
        Ok(value)
    }
}

/// `verify-otp` nests the credential under `user`; accept it at top level too.
fn session_from_verify(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("user") => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn signup(&self, email: &str, username: &str, password: &str) -> Result<Value> {
        let body = SignupRequest {
            email,
            username,
            password,
        };
        let value = self
            .call_json(&endpoints::SIGNUP, None, Some(&body))
            .await?;
        tracing::info!(email, "Signup accepted, verification pending");
        Ok(value)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = LoginRequest { email, password };
        let value = self.call_json(&endpoints::LOGIN, None, Some(&body)).await?;
        Self::decode(&endpoints::LOGIN, value)
    }

    async fn request_otp(&self, email: &str) -> Result<Value> {
        self.call_json(&endpoints::REQUEST_OTP, None, Some(&EmailRequest { email }))
            .await
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<Session> {
        let body = VerifyOtpRequest { email, code };
        let value = self
            .call_json(&endpoints::VERIFY_OTP, None, Some(&body))
            .await?;
        Self::decode(&endpoints::VERIFY_OTP, session_from_verify(value))
    }

    async fn refresh_otp(&self, email: &str) -> Result<Value> {
        self.call_json(&endpoints::REFRESH_OTP, None, Some(&EmailRequest { email }))
            .await
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Profile> {
        let value = self
            .call_json::<()>(&endpoints::PROFILE_GET, Some(session), None)
            .await?;
        Self::decode(&endpoints::PROFILE_GET, value)
    }

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<Profile> {
        let value = self
            .call_json(&endpoints::PROFILE_PUT, Some(session), Some(update))
            .await?;
        Self::decode(&endpoints::PROFILE_PUT, value)
    }

    async fn upload_cv(
        &self,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt> {
        let endpoint = &endpoints::CV_UPLOAD;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let builder = self.request(endpoint, None, Some(session))?.multipart(form);
        let (status, response) = self.send(endpoint, builder).await?;
        Self::check(endpoint, status, &response)?;

        tracing::info!(file_name, "CV uploaded");
        Ok(UploadReceipt {
            file_name: file_name.to_string(),
            response,
        })
    }

    async fn generate_career_path(
        &self,
        session: &Session,
        request: &CareerPathRequest,
    ) -> Result<Value> {
        let value = self
            .call_json(&endpoints::GENERATE, Some(session), Some(request))
            .await?;
        if value.is_null() {
            return Err(ApiError::InvalidResponse {
                endpoint: endpoints::GENERATE.path.to_string(),
                reason: "empty body".to_string(),
            }
            .into());
        }
        Ok(value)
    }

    async fn career_path_for_user(
        &self,
        session: &Session,
        user_id: &str,
    ) -> Result<Option<Value>> {
        let endpoint = &endpoints::FOR_USER;
        let builder = self.request(endpoint, Some(user_id), Some(session))?;
        let (status, value) = self.send(endpoint, builder).await?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(user_id, "No career path stored for user");
            return Ok(None);
        }
        Self::check(endpoint, status, &value)?;
        Ok((!value.is_null()).then_some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> HttpBackend {
        HttpBackend::new(&ClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn every_call_fails_fast_without_backend_url() {
        let backend = unconfigured();
        let session = Session::new("tok", "Bearer");

        assert!(matches!(
            backend.login("a@b.co", "secret").await,
            Err(Error::Config(ConfigError::MissingBackendUrl))
        ));
        assert!(matches!(
            backend.fetch_profile(&session).await,
            Err(Error::Config(ConfigError::MissingBackendUrl))
        ));
        assert!(matches!(
            backend.career_path_for_user(&session, "1").await,
            Err(Error::Config(ConfigError::MissingBackendUrl))
        ));
        assert!(matches!(
            backend.upload_cv(&session, "cv.pdf", vec![1, 2, 3]).await,
            Err(Error::Config(ConfigError::MissingBackendUrl))
        ));
    }

    #[test]
    fn verify_body_unwraps_user() {
        let body = serde_json::json!({
            "user": {"access_token": "t", "token_type": "Bearer"},
            "ok": true
        });
        assert_eq!(session_from_verify(body)["access_token"], "t");

        let flat = serde_json::json!({"access_token": "t"});
        assert_eq!(session_from_verify(flat.clone()), flat);
    }

    #[test]
    fn check_uses_backend_reason_then_fallback() {
        let err = HttpBackend::check(
            &endpoints::LOGIN,
            StatusCode::UNAUTHORIZED,
            &serde_json::json!({"message": "Wrong password"}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Api(ApiError::Status { status: 401, ref message }) if message == "Wrong password"
        ));

        let err = HttpBackend::check(&endpoints::LOGIN, StatusCode::BAD_GATEWAY, &Value::Null)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Api(ApiError::Status { status: 502, ref message }) if message == "Login failed"
        ));

        assert!(HttpBackend::check(&endpoints::LOGIN, StatusCode::OK, &Value::Null).is_ok());
    }
}
