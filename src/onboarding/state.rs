//! Onboarding wizard state machine: tracks the current step, the answers
//! collected so far, and per-step upload status.
//!
//! Steps progress linearly `0..N-1`. Choice steps advance as soon as a value
//! is picked; text and file steps wait for an explicit `next_step`. Going
//! back never forgets an answer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::model::{Step, StepField, StepKind, default_steps};
use crate::api::CareerPathRequest;
use crate::error::WizardError;

/// Answers keyed by step index.
pub type OnboardingAnswers = BTreeMap<usize, String>;

/// Upload status for a file step. Tracked apart from the answer map because
/// the upload is an async side effect with its own success/failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Pending {
        file_name: String,
    },
    Uploaded {
        file_name: String,
        uploaded_at: DateTime<Utc>,
    },
    /// The selection was cleared; the user has to pick a file again.
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    steps: Vec<Step>,
    current_step: usize,
    answers: OnboardingAnswers,
    uploads: BTreeMap<usize, UploadState>,
    submitting: bool,
}

impl OnboardingWizard {
    pub fn new(steps: Vec<Step>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        Ok(Self {
            steps,
            current_step: 0,
            answers: BTreeMap::new(),
            uploads: BTreeMap::new(),
            submitting: false,
        })
    }

    pub fn with_default_steps() -> Self {
        Self {
            steps: default_steps(),
            current_step: 0,
            answers: BTreeMap::new(),
            uploads: BTreeMap::new(),
            submitting: false,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The step currently shown.
    pub fn current(&self) -> &Step {
        &self.steps[self.current_step]
    }

    pub fn terminal_step(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn is_terminal(&self) -> bool {
        self.current_step == self.terminal_step()
    }

    pub fn answers(&self) -> &OnboardingAnswers {
        &self.answers
    }

    pub fn answer(&self, step: usize) -> Option<&str> {
        self.answers.get(&step).map(String::as_str)
    }

    pub fn upload_state(&self, step: usize) -> UploadState {
        self.uploads.get(&step).cloned().unwrap_or_default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Record `value` for the current step. Choice steps then advance by one
    /// unless already on the final step. Returns the resulting step index.
    pub fn select_option(&mut self, value: &str) -> Result<usize, WizardError> {
        let step = self.current_step;
        let current = &self.steps[step];

        match current.kind {
            StepKind::File => return Err(WizardError::FileStepRequiresUpload { step }),
            kind if kind.is_choice() => {
                if value.trim().is_empty() {
                    return Err(WizardError::EmptySelection { step });
                }
                if !current.has_option(value) {
                    return Err(WizardError::UnknownOption {
                        step,
                        value: value.to_string(),
                    });
                }
            }
            _ => {}
        }

        let auto_advance = current.kind.auto_advances();
        self.answers.insert(step, value.to_string());

        if auto_advance && !self.is_terminal() {
            self.current_step += 1;
        }
        Ok(self.current_step)
    }

    /// Explicit "Next". Requires the current step to be complete; a no-op on
    /// the final step.
    pub fn next_step(&mut self) -> Result<usize, WizardError> {
        if !self.is_step_complete(self.current_step) {
            return Err(WizardError::StepIncomplete {
                step: self.current_step,
            });
        }
        if !self.is_terminal() {
            self.current_step += 1;
        }
        Ok(self.current_step)
    }

    /// Go back one step. No-op on the first step; answers are kept.
    pub fn prev_step(&mut self) -> usize {
        self.current_step = self.current_step.saturating_sub(1);
        self.current_step
    }

    /// Completion predicate for a step.
    pub fn is_step_complete(&self, step: usize) -> bool {
        let Some(definition) = self.steps.get(step) else {
            return false;
        };
        match definition.kind {
            StepKind::Binary | StepKind::Grid | StepKind::Dropdown => {
                self.answers.get(&step).is_some_and(|v| !v.is_empty())
            }
            StepKind::Text => self
                .answers
                .get(&step)
                .is_some_and(|v| !v.trim().is_empty()),
            StepKind::File => matches!(self.uploads.get(&step), Some(UploadState::Uploaded { .. })),
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.is_terminal() && !self.submitting && self.is_step_complete(self.current_step)
    }

    // ── File upload sub-flow ────────────────────────────────────────

    /// A file was picked on the current (file) step. The step stays
    /// incomplete until [`Self::complete_upload`].
    pub fn begin_upload(&mut self, file_name: &str) -> Result<usize, WizardError> {
        let step = self.current_step;
        if self.steps[step].kind != StepKind::File {
            return Err(WizardError::NotAFileStep { step });
        }
        if matches!(self.uploads.get(&step), Some(UploadState::Pending { .. })) {
            return Err(WizardError::UploadInProgress);
        }
        self.answers.remove(&step);
        self.uploads.insert(
            step,
            UploadState::Pending {
                file_name: file_name.to_string(),
            },
        );
        Ok(step)
    }

    /// The upload for `step` succeeded; its file name becomes the answer.
    pub fn complete_upload(&mut self, step: usize, file_name: &str) {
        self.answers.insert(step, file_name.to_string());
        self.uploads.insert(
            step,
            UploadState::Uploaded {
                file_name: file_name.to_string(),
                uploaded_at: Utc::now(),
            },
        );
    }

    /// The upload for `step` failed; the selection is dropped.
    pub fn fail_upload(&mut self, step: usize, reason: &str) {
        self.answers.remove(&step);
        self.uploads.insert(
            step,
            UploadState::Failed {
                reason: reason.to_string(),
            },
        );
    }

    /// The upload for `step` never reached the backend; back to idle.
    pub fn cancel_upload(&mut self, step: usize) {
        self.uploads.remove(&step);
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Lock the wizard for submission and build the request body.
    pub fn begin_submission(
        &mut self,
        user_email: &str,
        full_name: &str,
    ) -> Result<CareerPathRequest, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmissionInProgress);
        }
        if !self.is_terminal() {
            return Err(WizardError::NotOnFinalStep);
        }
        if !self.is_step_complete(self.current_step) {
            return Err(WizardError::StepIncomplete {
                step: self.current_step,
            });
        }
        self.submitting = true;
        Ok(self.build_request(user_email, full_name))
    }

    /// Submission succeeded: the answers have been handed off, start over.
    pub fn finish_submission(&mut self) {
        self.submitting = false;
        self.answers.clear();
        self.uploads.clear();
        self.current_step = 0;
    }

    /// Submission failed: unlock, keep every answer for a retry.
    pub fn abort_submission(&mut self) {
        self.submitting = false;
    }

    /// Reshape the answers into the backend's field names.
    pub fn build_request(&self, user_email: &str, full_name: &str) -> CareerPathRequest {
        let mut request = CareerPathRequest {
            user_email: user_email.to_string(),
            full_name: full_name.to_string(),
            ..Default::default()
        };
        for (index, step) in self.steps.iter().enumerate() {
            let Some(value) = self.answers.get(&index) else {
                continue;
            };
            let value = value.clone();
            match step.field {
                StepField::Location => request.location = value,
                StepField::Industry => request.industry = value,
                StepField::EducationLevel => request.education_level = value,
                StepField::YearsExperience => request.years_experience = value,
                StepField::CurrentRole => request.current_role = value,
                StepField::CareerGoals => {
                    request.career_goal = value.clone();
                    request.career_goals_text = value;
                }
                StepField::Resume => request.cv_filename = Some(value),
            }
        }
        request
    }
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::with_default_steps()
    }
}
