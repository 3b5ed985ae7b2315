//! Onboarding wizard: the first-run questionnaire that collects the inputs
//! for roadmap generation.
//!
//! [`OnboardingWizard`] is the pure state machine over a fixed list of
//! [`Step`]s. [`OnboardingManager`] wraps it with the backend calls (resume
//! upload, roadmap generation) and persists the generated roadmap.

pub mod manager;
pub mod model;
pub mod state;

pub use manager::OnboardingManager;
pub use model::{Step, StepField, StepKind, default_steps};
pub use state::{OnboardingAnswers, OnboardingWizard, UploadState};
