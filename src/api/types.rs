//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

/// Body of `POST /api/career-path/generate`, reshaped from the wizard answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerPathRequest {
    pub industry: String,
    pub years_experience: String,
    pub current_role: String,
    pub career_goal: String,
    pub career_goals_text: String,
    pub education_level: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_filename: Option<String>,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// Result of a resume upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// File name recorded as the wizard answer.
    pub file_name: String,
    /// Raw backend response, kept for diagnostics.
    pub response: Value,
}

/// Pull a human-readable reason out of a backend error body.
///
/// Understands `{"message": ..}`, `{"detail": ..}` (string, or a list of
/// `{msg}` objects), and `{"error": ..}` (string or `{message}`).
pub fn error_message(body: &Value) -> Option<String> {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    if let Some(msg) = body.get("message").and_then(Value::as_str) {
        return non_empty(msg);
    }

    match body.get("detail") {
        Some(Value::String(detail)) => return non_empty(detail),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            if let Some(msg) = non_empty(&joined) {
                return Some(msg);
            }
        }
        _ => {}
    }

    match body.get("error") {
        Some(Value::String(err)) => non_empty(err),
        Some(obj @ Value::Object(_)) => obj
            .get("message")
            .and_then(Value::as_str)
            .and_then(non_empty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_field_wins() {
        let body = json!({"message": "Invalid credentials", "detail": "ignored"});
        assert_eq!(error_message(&body).as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn detail_string_and_list() {
        assert_eq!(
            error_message(&json!({"detail": "OTP expired"})).as_deref(),
            Some("OTP expired")
        );
        let list = json!({"detail": [{"msg": "email invalid"}, {"msg": "password short"}]});
        assert_eq!(
            error_message(&list).as_deref(),
            Some("email invalid; password short")
        );
    }

    #[test]
    fn nested_error_object() {
        let body = json!({"error": {"code": "NOT_FOUND", "message": "No such user"}});
        assert_eq!(error_message(&body).as_deref(), Some("No such user"));
    }

    #[test]
    fn blank_or_missing_reason_is_none() {
        assert!(error_message(&json!({"message": "   "})).is_none());
        assert!(error_message(&json!({"status": 500})).is_none());
        assert!(error_message(&Value::Null).is_none());
    }

    #[test]
    fn career_path_request_wire_names() {
        let req = CareerPathRequest {
            industry: "Tech".to_string(),
            user_email: "ada@example.com".to_string(),
            full_name: "Ada".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userEmail"], "ada@example.com");
        assert_eq!(json["fullName"], "Ada");
        assert_eq!(json["industry"], "Tech");
        assert!(json.get("cv_filename").is_none());
    }
}
