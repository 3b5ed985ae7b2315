//! User profile data models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deserialize an identifier that the backend may send as a string or a number.
fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// The authenticated user's profile as reported by the backend.
///
/// Domain fields are optional; the backend fills them in as the user
/// progresses. Field names accept both camelCase and snake_case on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default, alias = "isVerified")]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(
        default,
        alias = "experienceYears",
        alias = "years_experience",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_years: Option<String>,
    #[serde(default, alias = "currentRole", skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, alias = "careerGoals", skip_serializing_if = "Option::is_none")]
    pub career_goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        alias = "immigrationStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub immigration_status: Option<String>,
    #[serde(default, alias = "visaStatus", skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<String>,
}

/// Partial profile update. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immigration_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<String>,
}

impl ProfileUpdate {
    /// True when no field is set (the request would be a no-op).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
