//! Session credential model.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The authenticated credential pair identifying the user to the backend.
///
/// The access token is held as a [`SecretString`] so it never shows up in
/// `Debug` output or log lines. On disk it is stored as plain JSON under
/// [`crate::store::storage_keys::SESSION`], matching the backend's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    pub access_token: SecretString,
    pub token_type: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            token_type: token_type.into(),
        }
    }

    /// Value for the `Authorization` header: `<token_type> <access_token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.expose_secret())
    }

    /// Whether two sessions carry the same credential.
    pub fn same_credential(&self, other: &Session) -> bool {
        self.token_type == other.token_type
            && self.access_token.expose_secret() == other.access_token.expose_secret()
    }
}

/// Wire/disk representation of a [`Session`]. Unknown fields returned by the
/// backend alongside the token are ignored.
#[derive(Serialize, Deserialize)]
struct SessionRecord {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Session::new(record.access_token, record.token_type)
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        SessionRecord {
            access_token: session.access_token.expose_secret().to_string(),
            token_type: session.token_type,
        }
    }
}
