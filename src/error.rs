//! Error types for the career-path client.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Roadmap error: {0}")]
    Roadmap(#[from] RoadmapError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Onboarding error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Not signed in")]
    Unauthenticated,
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Backend URL not configured (set CAREER_PATH_BACKEND_URL)")]
    MissingBackendUrl,

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Credential and verification failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend refused the exchange. `message` is the backend's reason
    /// or a fixed fallback for the operation.
    #[error("{message}")]
    Rejected { message: String },

    #[error("{field}: {message}")]
    InvalidInput { field: String, message: String },
}

/// Failures talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Non-success status. `message` carries the backend's reason when the
    /// error body had one, otherwise the operation's fallback text.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl ApiError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Durable client storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Roadmap payload could not be turned into something renderable.
#[derive(Debug, thiserror::Error)]
pub enum RoadmapError {
    #[error("Legacy career_path payloads are not supported")]
    LegacyShape,

    #[error("Payload has neither career_roadmap nor career_path")]
    UnrecognizedShape,

    #[error("Malformed roadmap data: {0}")]
    Malformed(String),
}

/// Resume upload failures. The local file selection is dropped on any of these.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Could not read {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Upload of {file_name} failed: {reason}")]
    Rejected { file_name: String, reason: String },

    #[error("No upload pending")]
    NotPending,
}

/// Onboarding wizard rule violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("A value is required for step {step}")]
    EmptySelection { step: usize },

    #[error("{value:?} is not an option for step {step}")]
    UnknownOption { step: usize, value: String },

    #[error("Step {step} takes a file upload, not a typed value")]
    FileStepRequiresUpload { step: usize },

    #[error("Step {step} is not a file step")]
    NotAFileStep { step: usize },

    #[error("Step {step} is not complete")]
    StepIncomplete { step: usize },

    #[error("Submission is only possible on the final step")]
    NotOnFinalStep,

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Onboarding needs at least one step")]
    NoSteps,

    #[error("Onboarding was restarted while the request was in flight")]
    Superseded,
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
